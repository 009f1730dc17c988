//! Storage and sizing configuration for thumbnails

use crate::domain::{ImageSize, ThumbnailType};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};
use vh_utils::error::FileIOError;

/// Name of the configuration file inside a data directory
pub const CONFIG_FILE_NAME: &str = "thumbnails.json";

pub const THUMBNAILS_SIZE: ImageSize = ImageSize::new(223, 122);
pub const PREVIEWS_SIZE: ImageSize = ImageSize::new(560, 315);

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error("failed to parse config file <path={path:?}>: {source}")]
	Deserialize {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("failed to serialize config: {0}")]
	Serialize(#[from] serde_json::Error),
}

/// Storage directory a thumbnail kind is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directory {
	Thumbnails,
	Previews,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
	pub thumbnails_dir: PathBuf,
	pub previews_dir: PathBuf,
	pub videos_dir: PathBuf,
}

impl StorageConfig {
	pub fn under(data_dir: impl AsRef<Path>) -> Self {
		let data_dir = data_dir.as_ref();
		Self {
			thumbnails_dir: data_dir.join("thumbnails"),
			previews_dir: data_dir.join("previews"),
			videos_dir: data_dir.join("videos"),
		}
	}
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self::under("storage")
	}
}

/// Default dimensions per thumbnail kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSizes {
	#[serde(default = "default_thumbnail_size")]
	pub thumbnail: ImageSize,
	#[serde(default = "default_preview_size")]
	pub preview: ImageSize,
}

const fn default_thumbnail_size() -> ImageSize {
	THUMBNAILS_SIZE
}

const fn default_preview_size() -> ImageSize {
	PREVIEWS_SIZE
}

impl Default for ImageSizes {
	fn default() -> Self {
		Self {
			thumbnail: THUMBNAILS_SIZE,
			preview: PREVIEWS_SIZE,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
	#[serde(default)]
	pub storage: StorageConfig,
	#[serde(default)]
	pub sizes: ImageSizes,
}

impl ThumbnailConfig {
	/// Configuration with every storage directory placed under `data_dir`
	pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
		Self {
			storage: StorageConfig::under(data_dir),
			sizes: ImageSizes::default(),
		}
	}

	/// Load configuration from a JSON file
	pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let json = fs::read_to_string(path)
			.await
			.map_err(|e| FileIOError::from((path, e, "reading thumbnail config")))?;

		serde_json::from_str(&json).map_err(|source| ConfigError::Deserialize {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Load `thumbnails.json` from `data_dir`, writing the defaults when it doesn't exist yet
	pub async fn load_or_create(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let data_dir = data_dir.as_ref();
		let config_path = data_dir.join(CONFIG_FILE_NAME);

		match Self::load(&config_path).await {
			Ok(config) => {
				info!(config_path = %config_path.display(), "Loaded thumbnail config");
				Ok(config)
			}
			Err(ConfigError::FileIO(e)) if e.is_not_found() => {
				warn!(config_path = %config_path.display(), "No config found, creating default");
				let config = Self::from_data_dir(data_dir);
				config.save(&config_path).await?;
				Ok(config)
			}
			Err(e) => Err(e),
		}
	}

	/// Save configuration to disk
	pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| FileIOError::from((parent, e)))?;
		}

		let json = serde_json::to_string_pretty(self)?;
		fs::write(path, json)
			.await
			.map_err(|e| FileIOError::from((path, e, "writing thumbnail config")).into())
	}

	/// Creates every storage directory
	pub async fn ensure_directories(&self) -> Result<(), ConfigError> {
		for dir in [
			&self.storage.thumbnails_dir,
			&self.storage.previews_dir,
			&self.storage.videos_dir,
		] {
			fs::create_dir_all(dir)
				.await
				.map_err(|e| FileIOError::from((dir, e, "creating storage directory")))?;
		}

		Ok(())
	}

	pub fn directory(&self, directory: Directory) -> &Path {
		match directory {
			Directory::Thumbnails => &self.storage.thumbnails_dir,
			Directory::Previews => &self.storage.previews_dir,
		}
	}

	/// Directory holding the files of `kind`
	pub fn directory_for(&self, kind: ThumbnailType) -> &Path {
		self.directory(match kind {
			ThumbnailType::Miniature => Directory::Thumbnails,
			ThumbnailType::Preview => Directory::Previews,
		})
	}

	pub const fn default_size(&self, kind: ThumbnailType) -> ImageSize {
		match kind {
			ThumbnailType::Miniature => self.sizes.thumbnail,
			ThumbnailType::Preview => self.sizes.preview,
		}
	}
}
