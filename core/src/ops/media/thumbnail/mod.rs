//! Thumbnail and preview images for videos and playlists
//!
//! [`ThumbnailManager`] decides the name, size and storage directory of an image,
//! reuses the record already attached to the owner when there is one, and hands the
//! byte-producing work to a [`ThumbnailProducer`]. The record it returns always
//! describes the image that was actually written.

mod error;
mod manager;
pub mod metadata;
pub mod producer;

pub use error::{ProducerError, ThumbnailError, ThumbnailResult};
pub use manager::ThumbnailManager;
pub use metadata::{resolve_path, resolve_size, ResolvedPath, ThumbnailMetadata};
pub use producer::{FsProducer, Production, ThumbnailProducer};
