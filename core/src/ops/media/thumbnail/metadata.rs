//! Naming, sizing and reuse decisions taken before any image is produced

use super::{ThumbnailError, ThumbnailResult};
use crate::{
	config::{Directory, ThumbnailConfig},
	domain::{ImageSize, OwnerKind, PartialImageSize, Thumbnail, ThumbnailOwner, ThumbnailType},
};

use std::path::PathBuf;

use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Naming {
	Thumbnail,
	Preview,
}

struct PathRule {
	owner: OwnerKind,
	kind: ThumbnailType,
	naming: Naming,
	directory: Directory,
}

/// Supported (owner, kind) pairs. Adding a kind is adding a row.
const PATH_RULES: &[PathRule] = &[
	PathRule {
		owner: OwnerKind::Video,
		kind: ThumbnailType::Miniature,
		naming: Naming::Thumbnail,
		directory: Directory::Thumbnails,
	},
	PathRule {
		owner: OwnerKind::Video,
		kind: ThumbnailType::Preview,
		naming: Naming::Preview,
		directory: Directory::Previews,
	},
	PathRule {
		owner: OwnerKind::Playlist,
		kind: ThumbnailType::Miniature,
		naming: Naming::Thumbnail,
		directory: Directory::Thumbnails,
	},
];

/// Explicit size when both dimensions are given, otherwise the configured default for `kind`
pub fn resolve_size(
	config: &ThumbnailConfig,
	kind: ThumbnailType,
	explicit: Option<PartialImageSize>,
) -> ImageSize {
	explicit
		.and_then(|size| size.complete())
		.unwrap_or_else(|| config.default_size(kind))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
	pub filename: String,
	pub base_path: PathBuf,
	/// `base_path` joined with `filename`
	pub output_path: PathBuf,
}

pub fn resolve_path<O: ThumbnailOwner + ?Sized>(
	config: &ThumbnailConfig,
	owner: &O,
	kind: ThumbnailType,
) -> ThumbnailResult<ResolvedPath> {
	let owner_kind = owner.owner_kind();
	let unsupported = || {
		error!(owner = %owner_kind, %kind, "No thumbnail path rule, this is a bug");
		ThumbnailError::UnsupportedKind {
			owner: owner_kind,
			kind,
		}
	};

	let rule = PATH_RULES
		.iter()
		.find(|rule| rule.owner == owner_kind && rule.kind == kind)
		.ok_or_else(unsupported)?;

	let filename = match rule.naming {
		Naming::Thumbnail => owner.generate_thumbnail_name(),
		Naming::Preview => owner.generate_preview_name().ok_or_else(unsupported)?,
	};
	let base_path = config.directory(rule.directory).to_path_buf();

	Ok(ResolvedPath {
		output_path: base_path.join(&filename),
		filename,
		base_path,
	})
}

/// Copy of the record already attached to `owner` for `kind`, keeping its identity
pub fn find_existing<O: ThumbnailOwner + ?Sized>(
	owner: &O,
	kind: ThumbnailType,
) -> Option<Thumbnail> {
	owner.existing_thumbnail(kind).cloned()
}

/// Everything needed to fill a thumbnail record, computed fresh for each request
#[derive(Debug, Clone)]
pub struct ThumbnailMetadata {
	pub filename: String,
	pub base_path: PathBuf,
	pub output_path: PathBuf,
	pub size: ImageSize,
	pub existing: Option<Thumbnail>,
}

impl ThumbnailMetadata {
	pub fn build<O: ThumbnailOwner + ?Sized>(
		config: &ThumbnailConfig,
		owner: &O,
		kind: ThumbnailType,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Self> {
		let ResolvedPath {
			filename,
			base_path,
			output_path,
		} = resolve_path(config, owner, kind)?;

		Ok(Self {
			filename,
			base_path,
			output_path,
			size: resolve_size(config, kind, size),
			existing: find_existing(owner, kind),
		})
	}

	/// Reuses the existing record, or allocates one, and overwrites every field
	pub fn into_record(self, kind: ThumbnailType, url: Option<String>) -> Thumbnail {
		let mut thumbnail = self.existing.unwrap_or_else(|| Thumbnail::new(kind));

		thumbnail.filename = self.filename;
		thumbnail.width = self.size.width;
		thumbnail.height = self.size.height;
		thumbnail.kind = kind;
		thumbnail.url = url;

		thumbnail
	}
}
