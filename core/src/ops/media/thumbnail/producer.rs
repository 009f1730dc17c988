//! Producers write the image bytes described by a thumbnail record

use super::ProducerError;
use crate::domain::ImageSize;

use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio::fs;
use tracing::{debug, instrument, trace};
use uuid::Uuid;
use vh_ffmpeg::Thumbnailer;
use vh_images::{is_supported_extension, process_image};
use vh_utils::error::{report_error, FileIOError};

/// Extension given to intermediate files when the source doesn't hint at one
const PENDING_EXTENSION: &str = "jpg";

/// Work a producer has to perform, one variant per image source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Production {
	/// Resize an image already on local disk into `output`
	LocalFile {
		input: PathBuf,
		output: PathBuf,
		keep_original: bool,
	},
	/// Download `url` and store it as `base_path/filename`
	RemoteUrl {
		url: String,
		base_path: PathBuf,
		filename: String,
	},
	/// Grab a frame of the video at `input` and store it as `base_path/filename`
	VideoFrame {
		input: PathBuf,
		base_path: PathBuf,
		filename: String,
	},
}

#[async_trait]
pub trait ThumbnailProducer: Send + Sync {
	/// Writes an image of exactly `size`. Errors are returned untouched to the caller.
	async fn produce(&self, production: &Production, size: ImageSize) -> Result<(), ProducerError>;
}

#[async_trait]
impl<T: ThumbnailProducer + ?Sized> ThumbnailProducer for Arc<T> {
	async fn produce(&self, production: &Production, size: ImageSize) -> Result<(), ProducerError> {
		(**self).produce(production, size).await
	}
}

/// Producer backed by the local filesystem, an HTTP client and ffmpeg
#[derive(Debug, Clone, Default)]
pub struct FsProducer {
	client: Client,
	thumbnailer: Thumbnailer,
}

impl FsProducer {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_client(mut self, client: Client) -> Self {
		self.client = client;
		self
	}

	#[must_use]
	pub fn with_thumbnailer(mut self, thumbnailer: Thumbnailer) -> Self {
		self.thumbnailer = thumbnailer;
		self
	}

	#[instrument(skip(self, base_path), fields(base_path = %base_path.display()))]
	async fn download_image(
		&self,
		url: &str,
		base_path: &Path,
		filename: &str,
		size: ImageSize,
	) -> Result<(), ProducerError> {
		let parsed = Url::parse(url).map_err(|_| ProducerError::InvalidUrl(url.to_string()))?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ProducerError::InvalidUrl(url.to_string()));
		}

		let response = self
			.client
			.get(parsed.clone())
			.send()
			.await
			.map_err(|source| ProducerError::Download {
				url: url.to_string(),
				source,
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(ProducerError::HttpStatus {
				url: url.to_string(),
				status,
			});
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|source| ProducerError::Download {
				url: url.to_string(),
				source,
			})?;
		trace!(len = bytes.len(), "Downloaded image bytes");

		let pending_path = pending_path(base_path, pending_extension(&parsed));
		create_dir(base_path).await?;
		write_pending(&pending_path, &bytes).await?;

		finish_pending(&pending_path, &base_path.join(filename), size).await
	}

	#[instrument(
		skip(self, input, base_path),
		fields(input = %input.display(), base_path = %base_path.display())
	)]
	async fn generate_image_from_video(
		&self,
		input: &Path,
		base_path: &Path,
		filename: &str,
		size: ImageSize,
	) -> Result<(), ProducerError> {
		let pending_path = pending_path(base_path, PENDING_EXTENSION);

		if let Err(e) = self.thumbnailer.process(input, &pending_path).await {
			remove_pending(&pending_path).await;
			return Err(e.into());
		}

		finish_pending(&pending_path, &base_path.join(filename), size).await
	}
}

#[async_trait]
impl ThumbnailProducer for FsProducer {
	async fn produce(&self, production: &Production, size: ImageSize) -> Result<(), ProducerError> {
		match production {
			Production::LocalFile {
				input,
				output,
				keep_original,
			} => process_image(input, output, size.as_tuple(), *keep_original)
				.await
				.map_err(Into::into),
			Production::RemoteUrl {
				url,
				base_path,
				filename,
			} => self.download_image(url, base_path, filename, size).await,
			Production::VideoFrame {
				input,
				base_path,
				filename,
			} => {
				self.generate_image_from_video(input, base_path, filename, size)
					.await
			}
		}
	}
}

fn pending_extension(url: &Url) -> &str {
	Path::new(url.path())
		.extension()
		.filter(|ext| is_supported_extension(ext))
		.and_then(|ext| ext.to_str())
		.unwrap_or(PENDING_EXTENSION)
}

fn pending_path(base_path: &Path, extension: &str) -> PathBuf {
	base_path.join(format!("pending-{}.{extension}", Uuid::new_v4()))
}

async fn create_dir(dir: &Path) -> Result<(), ProducerError> {
	fs::create_dir_all(dir)
		.await
		.map_err(|e| FileIOError::from((dir, e)).into())
}

/// Writes downloaded bytes to `pending_path`, removing whatever was written on failure
async fn write_pending(pending_path: &Path, bytes: &[u8]) -> Result<(), ProducerError> {
	if let Err(e) = fs::write(pending_path, bytes).await {
		remove_pending(pending_path).await;
		return Err(FileIOError::from((pending_path, e, "writing downloaded image")).into());
	}

	Ok(())
}

/// Resizes an intermediate file into its final location, consuming it
async fn finish_pending(
	pending_path: &Path,
	output_path: &Path,
	size: ImageSize,
) -> Result<(), ProducerError> {
	if let Err(e) = process_image(pending_path, output_path, size.as_tuple(), false).await {
		remove_pending(pending_path).await;
		return Err(e.into());
	}

	debug!(output_path = %output_path.display(), "Stored thumbnail");
	Ok(())
}

async fn remove_pending(pending_path: &Path) {
	let res = match fs::remove_file(pending_path).await {
		Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
			Err(FileIOError::from((pending_path, e, "removing pending image")))
		}
		_ => Ok(()),
	};

	report_error(&res);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pending_extension_follows_supported_url_extension() {
		let png = Url::parse("https://cdn.example/covers/a.PNG?x=1").unwrap();
		let none = Url::parse("https://cdn.example/covers/a").unwrap();
		let video = Url::parse("https://cdn.example/covers/a.mp4").unwrap();

		assert_eq!(pending_extension(&png), "PNG");
		assert_eq!(pending_extension(&none), "jpg");
		assert_eq!(pending_extension(&video), "jpg");
	}

	#[tokio::test]
	async fn non_http_urls_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let production = Production::RemoteUrl {
			url: "file:///etc/passwd".to_string(),
			base_path: dir.path().to_path_buf(),
			filename: "a.jpg".to_string(),
		};

		let err = FsProducer::new()
			.produce(&production, ImageSize::new(10, 10))
			.await
			.unwrap_err();

		assert!(matches!(err, ProducerError::InvalidUrl(_)));
	}

	#[cfg(target_os = "linux")]
	#[tokio::test]
	async fn failed_pending_write_is_cleaned_up() {
		let dir = tempfile::tempdir().unwrap();
		let pending = dir.path().join("pending-full.png");
		// Every write to /dev/full fails with ENOSPC
		std::os::unix::fs::symlink("/dev/full", &pending).unwrap();

		let err = write_pending(&pending, b"image bytes").await.unwrap_err();

		assert!(matches!(err, ProducerError::FileIO(_)));
		assert!(fs::symlink_metadata(&pending).await.is_err());
	}
}
