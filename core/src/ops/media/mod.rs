//! Media processing operations
//!
//! This module contains the operations producing images for media entities:
//! - Video miniatures and previews
//! - Playlist miniatures

pub mod thumbnail;

pub use thumbnail::{ThumbnailError, ThumbnailManager, ThumbnailResult};
