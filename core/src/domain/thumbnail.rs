use crate::config::ThumbnailConfig;

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use uuid::Uuid;

/// Kind of image attached to a video or playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ThumbnailType {
	/// Small cover image
	Miniature = 1,
	/// Larger image shown before playback
	Preview = 2,
}

impl ThumbnailType {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Miniature => "miniature",
			Self::Preview => "preview",
		}
	}
}

impl fmt::Display for ThumbnailType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown thumbnail type: {0:?}")]
pub struct UnknownThumbnailType(String);

impl FromStr for ThumbnailType {
	type Err = UnknownThumbnailType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"miniature" => Ok(Self::Miniature),
			"preview" => Ok(Self::Preview),
			_ => Err(UnknownThumbnailType(s.to_string())),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
	pub width: u32,
	pub height: u32,
}

impl ImageSize {
	pub const fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}

	pub const fn as_tuple(&self) -> (u32, u32) {
		(self.width, self.height)
	}
}

/// Size requested by a caller, possibly missing a dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialImageSize {
	#[serde(default)]
	pub width: Option<u32>,
	#[serde(default)]
	pub height: Option<u32>,
}

impl PartialImageSize {
	/// Only a size with both dimensions counts as an explicit request
	pub const fn complete(&self) -> Option<ImageSize> {
		match (self.width, self.height) {
			(Some(width), Some(height)) => Some(ImageSize { width, height }),
			_ => None,
		}
	}
}

impl From<ImageSize> for PartialImageSize {
	fn from(ImageSize { width, height }: ImageSize) -> Self {
		Self {
			width: Some(width),
			height: Some(height),
		}
	}
}

/// Metadata record describing one generated image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
	pub id: Uuid,
	pub filename: String,
	pub width: u32,
	pub height: u32,
	#[serde(rename = "type")]
	pub kind: ThumbnailType,
	/// Where the image was fetched from, only set for remote images
	pub url: Option<String>,
}

impl Thumbnail {
	/// Blank record with a fresh identity, every other field is filled by the caller
	pub fn new(kind: ThumbnailType) -> Self {
		Self {
			id: Uuid::new_v4(),
			filename: String::new(),
			width: 0,
			height: 0,
			kind,
			url: None,
		}
	}

	pub const fn size(&self) -> ImageSize {
		ImageSize {
			width: self.width,
			height: self.height,
		}
	}

	/// Location of the image on local storage
	pub fn local_path(&self, config: &ThumbnailConfig) -> PathBuf {
		config.directory_for(self.kind).join(&self.filename)
	}
}
