use crate::{
	consts::JPEG_QUALITY,
	error::{Error, Result},
	format_image,
};

use std::{
	fs,
	io::{self, BufWriter, Seek, Write},
	panic,
	path::Path,
};

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, ColorType, DynamicImage, ImageFormat};
use tempfile::NamedTempFile;
use tokio::{sync::oneshot, task::spawn_blocking};
use tracing::{instrument, trace};
use vh_utils::error::FileIOError;

/// Scales and crops `img` so it covers exactly `width`x`height`.
#[must_use]
pub fn resize_to_fill(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
	if img.width() == width && img.height() == height {
		return img.clone();
	}

	img.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Encodes `img` to `output_path`, picking the format from the path extension.
///
/// JPEG output drops the alpha channel and is written at [`JPEG_QUALITY`]. The image is
/// encoded into a temporary file next to `output_path` which then replaces it, so a
/// failed encode leaves any previous file untouched.
pub fn write_image(img: &DynamicImage, output_path: &Path) -> Result<()> {
	let parent = output_path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));
	fs::create_dir_all(parent).map_err(|e| FileIOError::from((parent, e)))?;

	let format = ImageFormat::from_path(output_path).map_err(Error::Encode)?;

	let mut pending = NamedTempFile::new_in(parent)
		.map_err(|e| FileIOError::from((parent, e, "creating pending image")))?;
	{
		let mut writer = BufWriter::new(pending.as_file_mut());
		encode(img, format, &mut writer)?;
		writer
			.flush()
			.map_err(|e| FileIOError::from((output_path, e, "flushing pending image")))?;
	}

	pending
		.persist(output_path)
		.map_err(|e| FileIOError::from((output_path, e.error, "replacing stored image")))?;

	Ok(())
}

fn encode<W: Write + Seek>(img: &DynamicImage, format: ImageFormat, writer: &mut W) -> Result<()> {
	if format == ImageFormat::Jpeg {
		let rgb = img.to_rgb8();
		JpegEncoder::new_with_quality(writer, JPEG_QUALITY)
			.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
			.map_err(Error::Encode)
	} else {
		img.write_to(writer, format).map_err(Error::Encode)
	}
}

fn inner_process_image(input_path: &Path, output_path: &Path, width: u32, height: u32) -> Result<()> {
	let img = format_image(input_path)?;
	trace!(
		source_width = img.width(),
		source_height = img.height(),
		"Decoded source image"
	);

	write_image(&resize_to_fill(&img, width, height), output_path)
}

/// Resizes the image at `input_path` to exactly `width`x`height` and writes it to `output_path`.
///
/// Unless `keep_original` is set, the source file is removed once the output has been written.
#[instrument(
	skip_all,
	fields(
		input_path = %input_path.as_ref().display(),
		output_path = %output_path.as_ref().display(),
		%width,
		%height,
	)
)]
pub async fn process_image(
	input_path: impl AsRef<Path> + Send,
	output_path: impl AsRef<Path> + Send,
	(width, height): (u32, u32),
	keep_original: bool,
) -> Result<()> {
	let input_path = input_path.as_ref().to_path_buf();
	let output_path = output_path.as_ref().to_path_buf();

	if is_same_file(&input_path, &output_path).await? {
		return Err(Error::SamePath(input_path));
	}

	if width == 0 || height == 0 {
		return Err(Error::InvalidDimensions { width, height });
	}

	let (tx, rx) = oneshot::channel();

	// Using channel instead of waiting the JoinHandle as for some reason
	// the JoinHandle can take some extra time to complete
	let handle = spawn_blocking({
		let input_path = input_path.clone();
		let output_path = output_path.clone();

		move || {
			// Handling error on receiver side
			let _ = tx.send(
				panic::catch_unwind(|| {
					inner_process_image(&input_path, &output_path, width, height)
				})
				.unwrap_or_else(|_| {
					Err(Error::Panic(
						input_path.clone(),
						"Internal panic on third party crate".to_string(),
					))
				}),
			);
		}
	});

	if let Ok(res) = rx.await {
		res?;
	} else {
		return Err(match handle.await {
			Err(e) => Error::BackgroundTaskFailed(e),
			Ok(()) => Error::Panic(input_path, "processing task dropped its result".to_string()),
		});
	}

	trace!("Wrote processed image to disk");

	if !keep_original {
		remove_source(&input_path).await?;
	}

	Ok(())
}

/// Whether both paths name the same file on disk, whatever their spelling.
/// An output that doesn't exist yet can't be the input.
async fn is_same_file(input_path: &Path, output_path: &Path) -> Result<bool> {
	if input_path == output_path {
		return Ok(true);
	}

	let output = match tokio::fs::canonicalize(output_path).await {
		Ok(output) => output,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
		Err(e) => return Err(FileIOError::from((output_path, e)).into()),
	};

	let input = tokio::fs::canonicalize(input_path)
		.await
		.map_err(|e| FileIOError::from((input_path, e)))?;

	Ok(input == output)
}

async fn remove_source(input_path: &Path) -> Result<()> {
	tokio::fs::remove_file(input_path)
		.await
		.map_err(|e| FileIOError::from((input_path, e, "removing processed source image")).into())
}
