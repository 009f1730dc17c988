use crate::{probe_duration, ThumbnailerError};

use std::{
	ffi::OsString,
	path::{Path, PathBuf},
	time::Duration,
};

use tokio::{fs, process::Command};
use tracing::{instrument, trace};
use vh_utils::error::FileIOError;

/// `Thumbnailer` struct holds data from a `ThumbnailerBuilder`, exposing methods
/// to extract a still frame from video files.
#[derive(Debug, Clone)]
pub struct Thumbnailer {
	builder: ThumbnailerBuilder,
}

impl Default for Thumbnailer {
	fn default() -> Self {
		ThumbnailerBuilder::default().build()
	}
}

impl Thumbnailer {
	/// Processes a video input file and writes a single frame to `output_thumbnail_path`.
	///
	/// The image format follows the extension of `output_thumbnail_path`.
	#[instrument(
		skip_all,
		fields(
			video_file_path = %video_file_path.as_ref().display(),
			output_thumbnail_path = %output_thumbnail_path.as_ref().display(),
		)
	)]
	pub async fn process(
		&self,
		video_file_path: impl AsRef<Path> + Send,
		output_thumbnail_path: impl AsRef<Path> + Send,
	) -> Result<(), ThumbnailerError> {
		let video_file_path = video_file_path.as_ref();
		let output_thumbnail_path = output_thumbnail_path.as_ref();

		// Missing inputs would otherwise surface as an opaque ffmpeg exit status
		fs::metadata(video_file_path)
			.await
			.map_err(|e| FileIOError::from((video_file_path, e, "reading video file")))?;

		if let Some(parent) = output_thumbnail_path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| FileIOError::from((parent, e)))?;
		}

		let seek = match probe_duration(&self.builder.ffprobe_path, video_file_path).await? {
			Some(duration) => duration.mul_f32(self.builder.seek_percentage),
			None => Duration::ZERO,
		};
		trace!(?seek, "Extracting frame");

		let output = Command::new(&self.builder.ffmpeg_path)
			.args(self.frame_args(seek, video_file_path, output_thumbnail_path))
			.kill_on_drop(true)
			.output()
			.await
			.map_err(|source| ThumbnailerError::Spawn {
				binary: self.builder.ffmpeg_path.clone(),
				source,
			})?;

		if !output.status.success() {
			return Err(ThumbnailerError::CommandFailed {
				binary: self.builder.ffmpeg_path.display().to_string(),
				status: output.status,
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}

		match fs::metadata(output_thumbnail_path).await {
			Ok(metadata) if metadata.len() > 0 => Ok(()),
			_ => Err(ThumbnailerError::NoFrameProduced(
				output_thumbnail_path.to_path_buf(),
			)),
		}
	}

	/// Arguments handed to ffmpeg to grab one frame at `seek`
	pub(crate) fn frame_args(
		&self,
		seek: Duration,
		video_file_path: &Path,
		output_thumbnail_path: &Path,
	) -> Vec<OsString> {
		vec![
			"-hide_banner".into(),
			"-loglevel".into(),
			"error".into(),
			"-y".into(),
			"-ss".into(),
			format!("{:.3}", seek.as_secs_f64()).into(),
			"-i".into(),
			video_file_path.into(),
			"-frames:v".into(),
			"1".into(),
			output_thumbnail_path.into(),
		]
	}
}

/// `ThumbnailerBuilder` struct holds data to build a `Thumbnailer` struct, exposing many methods
/// to configure how a frame must be extracted.
#[derive(Debug, Clone)]
pub struct ThumbnailerBuilder {
	ffmpeg_path: PathBuf,
	ffprobe_path: PathBuf,
	seek_percentage: f32,
}

impl Default for ThumbnailerBuilder {
	fn default() -> Self {
		Self {
			ffmpeg_path: PathBuf::from("ffmpeg"),
			ffprobe_path: PathBuf::from("ffprobe"),
			seek_percentage: 0.5,
		}
	}
}

impl ThumbnailerBuilder {
	/// Creates a new `ThumbnailerBuilder` with default values:
	/// - `ffmpeg_path`: `ffmpeg` looked up in `PATH`
	/// - `ffprobe_path`: `ffprobe` looked up in `PATH`
	/// - `seek_percentage`: 50%
	pub fn new() -> Self {
		Default::default()
	}

	/// Location of the `ffmpeg` executable
	pub fn ffmpeg_path(mut self, ffmpeg_path: impl Into<PathBuf>) -> Self {
		self.ffmpeg_path = ffmpeg_path.into();
		self
	}

	/// Location of the `ffprobe` executable
	pub fn ffprobe_path(mut self, ffprobe_path: impl Into<PathBuf>) -> Self {
		self.ffprobe_path = ffprobe_path.into();
		self
	}

	/// Seek percentage must be a value between 0.0 and 1.0
	pub fn seek_percentage(mut self, seek_percentage: f32) -> Result<Self, ThumbnailerError> {
		if !(0.0..=1.0).contains(&seek_percentage) {
			return Err(ThumbnailerError::InvalidSeekPercentage(seek_percentage));
		}
		self.seek_percentage = seek_percentage;
		Ok(self)
	}

	/// Builds a `Thumbnailer` struct
	pub fn build(self) -> Thumbnailer {
		Thumbnailer { builder: self }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use tempfile::tempdir;

	#[test]
	fn rejects_out_of_range_seek_percentage() {
		assert!(matches!(
			ThumbnailerBuilder::new().seek_percentage(1.5),
			Err(ThumbnailerError::InvalidSeekPercentage(_))
		));
		assert!(ThumbnailerBuilder::new().seek_percentage(0.0).is_ok());
	}

	#[test]
	fn frame_args_seek_to_timestamp() {
		let args = Thumbnailer::default().frame_args(
			Duration::from_millis(61_250),
			Path::new("/videos/a-720.mp4"),
			Path::new("/previews/tmp.jpg"),
		);
		let args = args
			.iter()
			.map(|arg| arg.to_string_lossy().into_owned())
			.collect::<Vec<_>>();

		assert_eq!(
			args,
			[
				"-hide_banner",
				"-loglevel",
				"error",
				"-y",
				"-ss",
				"61.250",
				"-i",
				"/videos/a-720.mp4",
				"-frames:v",
				"1",
				"/previews/tmp.jpg",
			]
		);
	}

	#[test]
	fn frame_args_keep_video_resolution() {
		let args = Thumbnailer::default().frame_args(
			Duration::ZERO,
			Path::new("in.webm"),
			Path::new("out.jpg"),
		);

		assert!(!args.iter().any(|arg| arg == "-vf"));
		assert_eq!(args.last().map(OsString::as_os_str), Some(Path::new("out.jpg").as_os_str()));
	}

	#[tokio::test]
	async fn missing_video_file_is_reported_before_spawning() {
		let dir = tempdir().unwrap();

		let err = Thumbnailer::default()
			.process(dir.path().join("missing.mp4"), dir.path().join("out.jpg"))
			.await
			.unwrap_err();

		assert!(matches!(err, ThumbnailerError::FileIO(e) if e.is_not_found()));
	}

	#[tokio::test]
	async fn unknown_binary_is_a_spawn_error() {
		let dir = tempdir().unwrap();
		let video = dir.path().join("clip.mp4");
		fs::write(&video, b"not really a video").await.unwrap();

		let err = ThumbnailerBuilder::new()
			.ffprobe_path(dir.path().join("no-such-ffprobe"))
			.build()
			.process(&video, dir.path().join("out.jpg"))
			.await
			.unwrap_err();

		assert!(matches!(err, ThumbnailerError::Spawn { .. }));
	}
}
