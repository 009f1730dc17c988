use super::{OwnerKind, Thumbnail, ThumbnailOwner, ThumbnailType};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playlist {
	pub uuid: Uuid,
	#[serde(default)]
	pub thumbnail: Option<Thumbnail>,
}

impl Playlist {
	pub const fn new(uuid: Uuid) -> Self {
		Self {
			uuid,
			thumbnail: None,
		}
	}

	/// Stores a produced record in the single thumbnail slot.
	pub fn set_thumbnail(&mut self, thumbnail: Thumbnail) {
		self.thumbnail = Some(thumbnail);
	}
}

impl ThumbnailOwner for Playlist {
	fn owner_kind(&self) -> OwnerKind {
		OwnerKind::Playlist
	}

	fn generate_thumbnail_name(&self) -> String {
		format!("{}.jpg", self.uuid)
	}

	// A playlist has one slot, whatever kind is asked for
	fn existing_thumbnail(&self, _kind: ThumbnailType) -> Option<&Thumbnail> {
		self.thumbnail.as_ref()
	}
}
