//! Resolves the thumbnail configuration the CLI runs with

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use vh_core::ThumbnailConfig;

/// Loads `config_path` when given, otherwise the config stored in `data_dir`
/// (created with defaults on first use). Storage directories are created either way.
pub async fn resolve(config_path: Option<&PathBuf>, data_dir: &Path) -> Result<ThumbnailConfig> {
	let config = match config_path {
		Some(path) => ThumbnailConfig::load(path)
			.await
			.with_context(|| format!("loading config {path:?}"))?,
		None => ThumbnailConfig::load_or_create(data_dir)
			.await
			.with_context(|| format!("loading config from data dir {data_dir:?}"))?,
	};

	config
		.ensure_directories()
		.await
		.context("creating storage directories")?;

	debug!(?config, "Resolved thumbnail config");
	Ok(config)
}
