use crate::ThumbnailerError;

use std::{path::Path, time::Duration};

use tokio::process::Command;
use tracing::{instrument, trace};

/// Parses the `format=duration` value printed by ffprobe.
///
/// Streams without a known duration print `N/A`, which yields `Ok(None)`.
pub fn parse_duration(raw: &str) -> Result<Option<Duration>, ThumbnailerError> {
	let raw = raw.trim();

	if raw.is_empty() || raw == "N/A" {
		return Ok(None);
	}

	raw.parse::<f64>()
		.ok()
		.filter(|secs| secs.is_finite() && *secs >= 0.0)
		.map(|secs| Some(Duration::from_secs_f64(secs)))
		.ok_or_else(|| ThumbnailerError::InvalidDuration(raw.to_string()))
}

/// Asks ffprobe for the container duration of `video_file_path`.
#[instrument(skip(ffprobe), fields(video_file_path = %video_file_path.display()))]
pub async fn probe_duration(
	ffprobe: &Path,
	video_file_path: &Path,
) -> Result<Option<Duration>, ThumbnailerError> {
	let output = Command::new(ffprobe)
		.args([
			"-v",
			"error",
			"-show_entries",
			"format=duration",
			"-of",
			"default=noprint_wrappers=1:nokey=1",
		])
		.arg(video_file_path)
		.kill_on_drop(true)
		.output()
		.await
		.map_err(|source| ThumbnailerError::Spawn {
			binary: ffprobe.to_path_buf(),
			source,
		})?;

	if !output.status.success() {
		return Err(ThumbnailerError::CommandFailed {
			binary: ffprobe.display().to_string(),
			status: output.status,
			stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
		});
	}

	let duration = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
	trace!(?duration, "Probed video duration");

	Ok(duration)
}
