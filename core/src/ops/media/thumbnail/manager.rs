use super::{
	metadata::ThumbnailMetadata,
	producer::{FsProducer, Production, ThumbnailProducer},
	ThumbnailResult,
};
use crate::{
	config::ThumbnailConfig,
	domain::{
		PartialImageSize, Playlist, Thumbnail, ThumbnailOwner, ThumbnailType, Video, VideoFile,
	},
};

use std::{path::Path, sync::Arc};

use tracing::{debug, instrument, trace};

/// Builds thumbnail records for videos and playlists and has their images produced.
///
/// Records are returned to the caller, who persists them and attaches them to their
/// owner (see [`Video::attach_thumbnail`] and [`Playlist::set_thumbnail`]). A record is
/// only returned once its image was produced successfully.
///
/// Calls targeting the same owner and kind must be serialized by the caller, concurrent
/// calls race on the same output file.
#[derive(Debug, Clone)]
pub struct ThumbnailManager<P = FsProducer> {
	config: Arc<ThumbnailConfig>,
	producer: P,
}

impl ThumbnailManager<FsProducer> {
	pub fn new(config: Arc<ThumbnailConfig>) -> Self {
		Self::with_producer(config, FsProducer::default())
	}
}

impl<P: ThumbnailProducer> ThumbnailManager<P> {
	pub fn with_producer(config: Arc<ThumbnailConfig>, producer: P) -> Self {
		Self { config, producer }
	}

	pub fn config(&self) -> &ThumbnailConfig {
		&self.config
	}

	/// Resizes the local image at `input_path` into the owner's thumbnail.
	///
	/// The input file is removed afterwards unless `keep_original` is set.
	#[instrument(
		skip_all,
		fields(
			input_path = %input_path.as_ref().display(),
			owner = %owner.owner_kind(),
			%kind,
			keep_original = keep_original,
		),
		err
	)]
	pub async fn produce_from_local_file<O: ThumbnailOwner + Sync + ?Sized>(
		&self,
		input_path: impl AsRef<Path> + Send,
		owner: &O,
		kind: ThumbnailType,
		size: Option<PartialImageSize>,
		keep_original: bool,
	) -> ThumbnailResult<Thumbnail> {
		let metadata = ThumbnailMetadata::build(&self.config, owner, kind, size)?;
		let production = Production::LocalFile {
			input: input_path.as_ref().to_path_buf(),
			output: metadata.output_path.clone(),
			keep_original,
		};

		self.create_thumbnail_from_production(production, metadata, kind, None)
			.await
	}

	/// Downloads `url` into the owner's thumbnail, remembering `url` on the record.
	#[instrument(skip_all, fields(%url, owner = %owner.owner_kind(), %kind), err)]
	pub async fn produce_from_remote_url<O: ThumbnailOwner + Sync + ?Sized>(
		&self,
		url: &str,
		owner: &O,
		kind: ThumbnailType,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Thumbnail> {
		let metadata = ThumbnailMetadata::build(&self.config, owner, kind, size)?;
		let production = Production::RemoteUrl {
			url: url.to_string(),
			base_path: metadata.base_path.clone(),
			filename: metadata.filename.clone(),
		};

		self.create_thumbnail_from_production(production, metadata, kind, Some(url.to_string()))
			.await
	}

	/// Extracts a frame of `video_file` into the video's thumbnail, always at the default size.
	#[instrument(
		skip_all,
		fields(video = %video.uuid, resolution = video_file.resolution, %kind),
		err
	)]
	pub async fn produce_from_video_source(
		&self,
		video: &Video,
		video_file: &VideoFile,
		kind: ThumbnailType,
	) -> ThumbnailResult<Thumbnail> {
		let metadata = ThumbnailMetadata::build(&self.config, video, kind, None)?;
		let production = Production::VideoFrame {
			input: video.video_file_path(video_file, &self.config.storage.videos_dir),
			base_path: metadata.base_path.clone(),
			filename: metadata.filename.clone(),
		};

		self.create_thumbnail_from_production(production, metadata, kind, None)
			.await
	}

	/// Record pointing at an image that already lives at `url`, nothing is produced.
	#[instrument(skip_all, fields(%url, owner = %owner.owner_kind(), %kind), err)]
	pub fn create_placeholder<O: ThumbnailOwner + ?Sized>(
		&self,
		url: &str,
		owner: &O,
		kind: ThumbnailType,
		size: PartialImageSize,
	) -> ThumbnailResult<Thumbnail> {
		let metadata = ThumbnailMetadata::build(&self.config, owner, kind, Some(size))?;
		let thumbnail = metadata.into_record(kind, Some(url.to_string()));

		trace!(id = %thumbnail.id, "Built placeholder thumbnail");
		Ok(thumbnail)
	}

	pub async fn create_video_miniature_from_existing(
		&self,
		input_path: impl AsRef<Path> + Send,
		video: &Video,
		kind: ThumbnailType,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Thumbnail> {
		self.produce_from_local_file(input_path, video, kind, size, false)
			.await
	}

	pub async fn create_video_miniature_from_url(
		&self,
		url: &str,
		video: &Video,
		kind: ThumbnailType,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Thumbnail> {
		self.produce_from_remote_url(url, video, kind, size).await
	}

	pub async fn generate_video_miniature(
		&self,
		video: &Video,
		video_file: &VideoFile,
		kind: ThumbnailType,
	) -> ThumbnailResult<Thumbnail> {
		self.produce_from_video_source(video, video_file, kind).await
	}

	pub fn create_placeholder_thumbnail(
		&self,
		url: &str,
		video: &Video,
		kind: ThumbnailType,
		size: PartialImageSize,
	) -> ThumbnailResult<Thumbnail> {
		self.create_placeholder(url, video, kind, size)
	}

	pub async fn create_playlist_miniature_from_existing(
		&self,
		input_path: impl AsRef<Path> + Send,
		playlist: &Playlist,
		keep_original: bool,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Thumbnail> {
		self.produce_from_local_file(
			input_path,
			playlist,
			ThumbnailType::Miniature,
			size,
			keep_original,
		)
		.await
	}

	pub async fn create_playlist_miniature_from_url(
		&self,
		url: &str,
		playlist: &Playlist,
		size: Option<PartialImageSize>,
	) -> ThumbnailResult<Thumbnail> {
		self.produce_from_remote_url(url, playlist, ThumbnailType::Miniature, size)
			.await
	}

	async fn create_thumbnail_from_production(
		&self,
		production: Production,
		metadata: ThumbnailMetadata,
		kind: ThumbnailType,
		url: Option<String>,
	) -> ThumbnailResult<Thumbnail> {
		let size = metadata.size;
		let reused = metadata.existing.is_some();
		let thumbnail = metadata.into_record(kind, url);

		debug!(
			id = %thumbnail.id,
			filename = %thumbnail.filename,
			reused,
			"Producing thumbnail"
		);

		// The record is dropped here on failure, nothing partial reaches the caller
		self.producer.produce(&production, size).await?;

		trace!(id = %thumbnail.id, "Thumbnail ready");
		Ok(thumbnail)
	}
}
