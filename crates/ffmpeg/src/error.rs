use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;
use vh_utils::error::FileIOError;

/// Error type for the library.
#[derive(Error, Debug)]
pub enum ThumbnailerError {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("Failed to spawn {binary:?}: {source}")]
	Spawn {
		binary: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("`{binary}` exited with {status}: {stderr}")]
	CommandFailed {
		binary: String,
		status: ExitStatus,
		stderr: String,
	},
	#[error("Could not read the duration reported by ffprobe: {0:?}")]
	InvalidDuration(String),
	#[error("ffmpeg finished without writing a frame to {0:#?}")]
	NoFrameProduced(PathBuf),
	#[error("Received an invalid seek percentage: {0}")]
	InvalidSeekPercentage(f32),
}
