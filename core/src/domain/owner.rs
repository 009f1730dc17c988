use super::{Thumbnail, ThumbnailType};

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
	Video,
	Playlist,
}

impl fmt::Display for OwnerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Video => "video",
			Self::Playlist => "playlist",
		})
	}
}

/// Entity that thumbnails are attached to.
///
/// Generated names must be stable for a given entity so regenerating a
/// thumbnail overwrites the previous file instead of leaking a new one.
pub trait ThumbnailOwner {
	fn owner_kind(&self) -> OwnerKind;

	fn generate_thumbnail_name(&self) -> String;

	/// Only owners that support previews return a name
	fn generate_preview_name(&self) -> Option<String> {
		None
	}

	/// Record already attached for `kind`, updated in place instead of duplicated
	fn existing_thumbnail(&self, kind: ThumbnailType) -> Option<&Thumbnail>;
}
