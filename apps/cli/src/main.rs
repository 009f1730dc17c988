use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use vh_core::{
	FsProducer, PartialImageSize, Playlist, Thumbnail, ThumbnailManager, ThumbnailOwner,
	ThumbnailType, Video, VideoFile,
};
use vh_ffmpeg::ThumbnailerBuilder;

mod config;

#[derive(Parser, Debug)]
#[command(name = "vidhub", about = "Create thumbnails and previews for vidhub videos and playlists")]
struct Cli {
	/// JSON config file, takes precedence over the one stored in the data directory
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	/// Directory holding thumbnails.json and the storage directories
	#[arg(long, global = true, default_value = "storage")]
	data_dir: PathBuf,

	/// ffmpeg executable used to grab video frames
	#[arg(long, global = true, default_value = "ffmpeg")]
	ffmpeg: PathBuf,

	/// ffprobe executable used to read video durations
	#[arg(long, global = true, default_value = "ffprobe")]
	ffprobe: PathBuf,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Resize a local image into the target's thumbnail
	FromFile {
		path: PathBuf,
		/// Keep the source image instead of removing it
		#[arg(long, default_value_t = false)]
		keep_original: bool,
		#[command(flatten)]
		target: TargetArgs,
	},
	/// Download an image into the target's thumbnail
	FromUrl {
		url: String,
		#[command(flatten)]
		target: TargetArgs,
	},
	/// Extract a frame of one of the video's files
	FromVideo {
		/// Resolution of the stored video file, e.g. 720
		#[arg(long)]
		resolution: u32,
		/// Extension of the stored video file, including the dot
		#[arg(long, default_value = ".mp4")]
		extname: String,
		#[command(flatten)]
		target: TargetArgs,
	},
	/// Record an image hosted elsewhere without producing anything
	Placeholder {
		url: String,
		#[command(flatten)]
		target: TargetArgs,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OwnerArg {
	Video,
	Playlist,
}

#[derive(Args, Debug, Clone)]
struct TargetArgs {
	#[arg(long, value_enum, default_value = "video")]
	owner: OwnerArg,
	/// Uuid of the video or playlist
	#[arg(long)]
	uuid: Uuid,
	/// miniature or preview
	#[arg(long, default_value = "miniature")]
	kind: ThumbnailType,
	#[arg(long)]
	width: Option<u32>,
	#[arg(long)]
	height: Option<u32>,
}

impl TargetArgs {
	fn owner(&self) -> Box<dyn ThumbnailOwner + Send + Sync> {
		match self.owner {
			OwnerArg::Video => Box::new(Video::new(self.uuid)),
			OwnerArg::Playlist => Box::new(Playlist::new(self.uuid)),
		}
	}

	fn size(&self) -> PartialImageSize {
		PartialImageSize {
			width: self.width,
			height: self.height,
		}
	}
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
	init_tracing();
	let cli = Cli::parse();

	let config = config::resolve(cli.config.as_ref(), &cli.data_dir).await?;
	let producer = FsProducer::new().with_thumbnailer(
		ThumbnailerBuilder::new()
			.ffmpeg_path(cli.ffmpeg)
			.ffprobe_path(cli.ffprobe)
			.build(),
	);
	let manager = ThumbnailManager::with_producer(Arc::new(config), producer);

	let thumbnail: Thumbnail = match cli.command {
		Commands::FromFile {
			path,
			keep_original,
			target,
		} => {
			manager
				.produce_from_local_file(
					path,
					target.owner().as_ref(),
					target.kind,
					Some(target.size()),
					keep_original,
				)
				.await?
		}
		Commands::FromUrl { url, target } => {
			manager
				.produce_from_remote_url(&url, target.owner().as_ref(), target.kind, Some(target.size()))
				.await?
		}
		Commands::FromVideo {
			resolution,
			extname,
			target,
		} => {
			if !matches!(target.owner, OwnerArg::Video) {
				bail!("frames can only be extracted for videos");
			}
			if target.width.is_some() || target.height.is_some() {
				info!("Frame thumbnails always use the configured size, ignoring --width/--height");
			}

			manager
				.generate_video_miniature(
					&Video::new(target.uuid),
					&VideoFile {
						resolution,
						extname,
					},
					target.kind,
				)
				.await?
		}
		Commands::Placeholder { url, target } => {
			manager.create_placeholder(&url, target.owner().as_ref(), target.kind, target.size())?
		}
	};

	info!(id = %thumbnail.id, filename = %thumbnail.filename, "Thumbnail ready");
	println!("{}", serde_json::to_string_pretty(&thumbnail)?);

	Ok(())
}
