use super::{OwnerKind, Thumbnail, ThumbnailOwner, ThumbnailType};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const IMAGE_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFile {
	pub resolution: u32,
	/// Extension including the leading dot, e.g. `.mp4`
	pub extname: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Video {
	pub uuid: Uuid,
	#[serde(default)]
	pub thumbnails: Vec<Thumbnail>,
}

impl Video {
	pub const fn new(uuid: Uuid) -> Self {
		Self {
			uuid,
			thumbnails: Vec::new(),
		}
	}

	pub fn thumbnail(&self, kind: ThumbnailType) -> Option<&Thumbnail> {
		self.thumbnails.iter().find(|t| t.kind == kind)
	}

	/// Stores a produced record, replacing any record of the same kind.
	pub fn attach_thumbnail(&mut self, thumbnail: Thumbnail) {
		match self.thumbnails.iter_mut().find(|t| t.kind == thumbnail.kind) {
			Some(slot) => *slot = thumbnail,
			None => self.thumbnails.push(thumbnail),
		}
	}

	pub fn video_file_path(&self, video_file: &VideoFile, videos_dir: impl AsRef<Path>) -> PathBuf {
		videos_dir.as_ref().join(format!(
			"{}-{}{}",
			self.uuid, video_file.resolution, video_file.extname
		))
	}
}

impl ThumbnailOwner for Video {
	fn owner_kind(&self) -> OwnerKind {
		OwnerKind::Video
	}

	fn generate_thumbnail_name(&self) -> String {
		format!("{}.{IMAGE_EXTENSION}", self.uuid)
	}

	fn generate_preview_name(&self) -> Option<String> {
		Some(format!("{}.{IMAGE_EXTENSION}", self.uuid))
	}

	fn existing_thumbnail(&self, kind: ThumbnailType) -> Option<&Thumbnail> {
		self.thumbnail(kind)
	}
}
