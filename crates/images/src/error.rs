use std::path::PathBuf;

use tokio::task::JoinError;
use vh_utils::error::FileIOError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("error while loading the image (via the `image` crate): {0}")]
	Image(#[from] image::ImageError),
	#[error("error while encoding the image (via the `image` crate): {0}")]
	Encode(#[source] image::ImageError),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("the image provided is unsupported")]
	Unsupported,
	#[error("the image provided is too large ({0} bytes, over 24MiB)")]
	TooLarge(u64),
	#[error("invalid path provided (it had no file extension)")]
	NoExtension,
	#[error("input and output must be different paths: {0:?}")]
	SamePath(PathBuf),
	#[error("invalid target dimensions: {width}x{height}")]
	InvalidDimensions { width: u32, height: u32 },
	#[error("panic while processing image <path='{0:?}'>: {1}")]
	Panic(PathBuf, String),
	#[error("background task failed: {0}")]
	BackgroundTaskFailed(#[from] JoinError),
}
