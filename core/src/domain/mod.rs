//! Domain models for videos, playlists and the thumbnails they own
//!
//! A thumbnail record is owned by exactly one video or playlist, and an owner
//! holds at most one record per [`ThumbnailType`].

pub mod owner;
pub mod playlist;
pub mod thumbnail;
pub mod video;

pub use owner::{OwnerKind, ThumbnailOwner};
pub use playlist::Playlist;
pub use thumbnail::{ImageSize, PartialImageSize, Thumbnail, ThumbnailType};
pub use video::{Video, VideoFile};
