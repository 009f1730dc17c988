//! Core of vidhub's media artifact handling
//!
//! Resolves where and how thumbnails and previews of videos and playlists are
//! stored, and keeps their records in sync with the images actually produced.

pub mod config;
pub mod domain;
pub mod ops;

pub use config::{ConfigError, ThumbnailConfig};
pub use domain::{
	ImageSize, OwnerKind, PartialImageSize, Playlist, Thumbnail, ThumbnailOwner, ThumbnailType,
	Video, VideoFile,
};
pub use ops::media::thumbnail::{
	FsProducer, ProducerError, Production, ThumbnailError, ThumbnailManager, ThumbnailProducer,
	ThumbnailResult,
};
