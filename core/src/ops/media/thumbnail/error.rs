use crate::domain::{OwnerKind, ThumbnailType};

use thiserror::Error;
use vh_utils::error::FileIOError;

pub type ThumbnailResult<T> = Result<T, ThumbnailError>;

#[derive(Error, Debug)]
pub enum ThumbnailError {
	/// No naming/storage rule exists for this owner and kind. This is a caller bug.
	#[error("{kind} thumbnails are not supported for a {owner}")]
	UnsupportedKind {
		owner: OwnerKind,
		kind: ThumbnailType,
	},
	#[error(transparent)]
	Producer(#[from] ProducerError),
}

/// Failure while writing the image bytes of a thumbnail
#[derive(Error, Debug)]
pub enum ProducerError {
	#[error("image processing failed: {0}")]
	Image(#[from] vh_images::Error),
	#[error("frame extraction failed: {0}")]
	VideoFrame(#[from] vh_ffmpeg::ThumbnailerError),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("refusing to download from {0:?}: only http(s) urls are supported")]
	InvalidUrl(String),
	#[error("failed to download image from {url}: {source}")]
	Download {
		url: String,
		#[source]
		source: reqwest::Error,
	},
	#[error("unexpected HTTP status {status} while downloading {url}")]
	HttpStatus {
		url: String,
		status: reqwest::StatusCode,
	},
	#[error("{0}")]
	Other(String),
}

impl ProducerError {
	pub fn other(message: impl Into<String>) -> Self {
		Self::Other(message.into())
	}
}
