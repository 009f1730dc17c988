//! Thumbnails written to disk by the filesystem producer

use vh_core::{
	config::THUMBNAILS_SIZE, FsProducer, ImageSize, Playlist, ProducerError, ThumbnailConfig,
	ThumbnailError, ThumbnailManager, ThumbnailType, Video, VideoFile,
};

use std::{
	fs,
	net::SocketAddr,
	path::{Path, PathBuf},
	sync::Arc,
};

use axum::{routing::get, Router};
use image::GenericImageView;
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;
use uuid::Uuid;
#[cfg(unix)]
use vh_ffmpeg::ThumbnailerBuilder;

mod helpers;

use helpers::png_bytes;

fn setup() -> (TempDir, ThumbnailManager) {
	let dir = tempdir().unwrap();
	let manager = ThumbnailManager::new(Arc::new(ThumbnailConfig::from_data_dir(dir.path())));
	(dir, manager)
}

fn write_png(path: &Path, width: u32, height: u32) {
	fs::write(path, png_bytes(width, height)).unwrap();
}

fn dir_entries(dir: &Path) -> Vec<PathBuf> {
	match fs::read_dir(dir) {
		Ok(entries) => entries.map(|entry| entry.unwrap().path()).collect(),
		Err(_) => Vec::new(),
	}
}

/// Manager whose frames come from the given shell snippets standing in for ffprobe and ffmpeg
#[cfg(unix)]
fn setup_with_fake_ffmpeg(ffprobe: &str, ffmpeg: &str) -> (TempDir, TempDir, ThumbnailManager) {
	use std::os::unix::fs::PermissionsExt;

	let bin = tempdir().unwrap();
	let write_script = |name: &str, body: &str| {
		let path = bin.path().join(name);
		fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
		fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
		path
	};
	let thumbnailer = ThumbnailerBuilder::new()
		.ffprobe_path(write_script("ffprobe", ffprobe))
		.ffmpeg_path(write_script("ffmpeg", ffmpeg))
		.build();

	let dir = tempdir().unwrap();
	let manager = ThumbnailManager::with_producer(
		Arc::new(ThumbnailConfig::from_data_dir(dir.path())),
		FsProducer::new().with_thumbnailer(thumbnailer),
	);
	(bin, dir, manager)
}

#[cfg(unix)]
fn store_video_file(manager: &ThumbnailManager, video: &Video, file: &VideoFile) {
	let path = video.video_file_path(file, &manager.config().storage.videos_dir);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, b"not really a video").unwrap();
}

async fn serve(routes: Router) -> SocketAddr {
	let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
		.serve(routes.into_make_service());
	let addr = server.local_addr();
	tokio::spawn(server);
	addr
}

#[tokio::test]
#[traced_test]
async fn local_file_is_resized_and_consumed() {
	let (dir, manager) = setup();
	let input = dir.path().join("upload.png");
	write_png(&input, 1280, 720);
	let video = Video::new(Uuid::new_v4());

	let thumbnail = manager
		.create_video_miniature_from_existing(&input, &video, ThumbnailType::Miniature, None)
		.await
		.unwrap();

	let output = thumbnail.local_path(manager.config());
	assert_eq!(output, dir.path().join("thumbnails").join(&thumbnail.filename));
	assert_eq!(
		image::open(&output).unwrap().dimensions(),
		THUMBNAILS_SIZE.as_tuple()
	);
	assert!(!input.exists());
}

#[tokio::test]
#[traced_test]
async fn playlist_can_keep_its_source_image() {
	let (dir, manager) = setup();
	let input = dir.path().join("first-video-miniature.png");
	write_png(&input, 400, 400);
	let playlist = Playlist::new(Uuid::new_v4());

	let thumbnail = manager
		.create_playlist_miniature_from_existing(
			&input,
			&playlist,
			true,
			Some(ImageSize::new(120, 60).into()),
		)
		.await
		.unwrap();

	assert!(input.exists());
	assert_eq!(
		image::open(thumbnail.local_path(manager.config()))
			.unwrap()
			.dimensions(),
		(120, 60)
	);
}

#[tokio::test]
#[traced_test]
async fn remote_image_is_downloaded_without_leftovers() {
	let (_dir, manager) = setup();
	let addr = serve(Router::new().route("/covers/a.png", get(|| async { png_bytes(640, 480) })))
		.await;
	let url = format!("http://{addr}/covers/a.png");
	let mut playlist = Playlist::new(Uuid::new_v4());

	let first = manager
		.create_playlist_miniature_from_url(&url, &playlist, None)
		.await
		.unwrap();
	playlist.set_thumbnail(first.clone());

	let second = manager
		.create_playlist_miniature_from_url(&url, &playlist, None)
		.await
		.unwrap();

	assert_eq!(second.id, first.id);
	assert_eq!(second.url.as_deref(), Some(url.as_str()));
	assert_eq!(
		dir_entries(&manager.config().storage.thumbnails_dir),
		[second.local_path(manager.config())]
	);
	assert_eq!(
		image::open(second.local_path(manager.config()))
			.unwrap()
			.dimensions(),
		THUMBNAILS_SIZE.as_tuple()
	);
}

#[tokio::test]
#[traced_test]
async fn missing_remote_image_is_an_http_status_error() {
	let (_dir, manager) = setup();
	let addr = serve(Router::new()).await;
	let video = Video::new(Uuid::new_v4());

	let err = manager
		.create_video_miniature_from_url(
			&format!("http://{addr}/nope.jpg"),
			&video,
			ThumbnailType::Preview,
			None,
		)
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		ThumbnailError::Producer(ProducerError::HttpStatus { status, .. })
			if status == reqwest::StatusCode::NOT_FOUND
	));
	assert!(dir_entries(&manager.config().storage.previews_dir).is_empty());
}

#[tokio::test]
#[traced_test]
async fn undecodable_download_leaves_no_pending_file() {
	let (_dir, manager) = setup();
	let addr = serve(Router::new().route("/a.jpg", get(|| async { "not an image" }))).await;
	let video = Video::new(Uuid::new_v4());

	let err = manager
		.create_video_miniature_from_url(
			&format!("http://{addr}/a.jpg"),
			&video,
			ThumbnailType::Miniature,
			None,
		)
		.await
		.unwrap_err();

	assert!(matches!(err, ThumbnailError::Producer(ProducerError::Image(_))));
	assert!(dir_entries(&manager.config().storage.thumbnails_dir).is_empty());
}

#[tokio::test]
#[traced_test]
async fn missing_video_file_fails_frame_extraction() {
	let (_dir, manager) = setup();
	let video = Video::new(Uuid::new_v4());
	let file = VideoFile {
		resolution: 480,
		extname: ".webm".to_string(),
	};

	let err = manager
		.generate_video_miniature(&video, &file, ThumbnailType::Preview)
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		ThumbnailError::Producer(ProducerError::VideoFrame(_))
	));
	assert!(dir_entries(&manager.config().storage.previews_dir).is_empty());
}

// ffmpeg writes the frame to its last argument
#[cfg(unix)]
const PARTIAL_FRAME_THEN_FAIL: &str = r#"for last in "$@"; do :; done
printf 'half a frame' > "$last"
echo "decoder exploded" >&2
exit 1"#;

#[cfg(unix)]
const GARBAGE_FRAME: &str = r#"for last in "$@"; do :; done
printf 'definitely not a jpeg' > "$last""#;

#[cfg(unix)]
#[tokio::test]
#[traced_test]
async fn failed_frame_extraction_leaves_no_pending_file() {
	let (_bin, _dir, manager) = setup_with_fake_ffmpeg("echo 12.5", PARTIAL_FRAME_THEN_FAIL);
	let video = Video::new(Uuid::new_v4());
	let file = VideoFile {
		resolution: 720,
		extname: ".mp4".to_string(),
	};
	store_video_file(&manager, &video, &file);

	let err = manager
		.generate_video_miniature(&video, &file, ThumbnailType::Preview)
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		ThumbnailError::Producer(ProducerError::VideoFrame(
			vh_ffmpeg::ThumbnailerError::CommandFailed { .. }
		))
	));
	assert!(dir_entries(&manager.config().storage.previews_dir).is_empty());
}

#[cfg(unix)]
#[tokio::test]
#[traced_test]
async fn undecodable_frame_leaves_no_pending_file() {
	let (_bin, _dir, manager) = setup_with_fake_ffmpeg("echo N/A", GARBAGE_FRAME);
	let video = Video::new(Uuid::new_v4());
	let file = VideoFile {
		resolution: 360,
		extname: ".webm".to_string(),
	};
	store_video_file(&manager, &video, &file);

	let err = manager
		.generate_video_miniature(&video, &file, ThumbnailType::Miniature)
		.await
		.unwrap_err();

	assert!(matches!(err, ThumbnailError::Producer(ProducerError::Image(_))));
	assert!(dir_entries(&manager.config().storage.thumbnails_dir).is_empty());
}

#[test]
fn producer_is_usable_on_its_own() {
	let producer = FsProducer::new().with_client(reqwest::Client::new());
	let manager = ThumbnailManager::with_producer(
		Arc::new(ThumbnailConfig::from_data_dir("/srv/vh")),
		producer,
	);

	assert_eq!(
		manager.config().storage.videos_dir,
		Path::new("/srv/vh/videos")
	);
}
