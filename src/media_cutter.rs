/*!
 * Clip cutting with ffmpeg.
 *
 * Each refined clip is re-encoded out of the episode video with a small
 * buffer on both sides. ffmpeg runs as a subprocess under a timeout; a
 * cut that fails only loses that one clip.
 */

use std::path::Path;

use log::{debug, info};
use tokio::process::Command;

use crate::analysis::refine::ClipCandidate;
use crate::app_config::CutConfig;
use crate::errors::CutError;
use crate::timecode::ms_to_seconds;

/// Cuts clips from episode videos with ffmpeg
pub struct MediaCutter<'a> {
    config: &'a CutConfig,
}

impl<'a> MediaCutter<'a> {
    pub fn new(config: &'a CutConfig) -> Self {
        Self { config }
    }

    /// Cut one clip from the source video into `output_path`.
    ///
    /// The cut starts `start_buffer_secs` before the clip and runs for the
    /// clip duration plus both buffers, so dialogue is never clipped
    /// mid-word at the edges.
    pub async fn cut(
        &self,
        video_path: &Path,
        clip: &ClipCandidate,
        output_path: &Path,
    ) -> Result<(), CutError> {
        let start_secs =
            (ms_to_seconds(clip.start_time_ms) - self.config.start_buffer_secs).max(0.0);
        let duration_secs =
            clip.duration_seconds() + self.config.start_buffer_secs + self.config.end_buffer_secs;

        debug!(
            "Cutting '{}' clip at {:.1}s for {:.1}s from {:?}",
            clip.category, start_secs, duration_secs, video_path
        );

        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y",
                "-ss",
                &format!("{:.3}", start_secs),
                "-i",
                video_path.to_str().unwrap_or_default(),
                "-t",
                &format!("{:.3}", duration_secs),
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-preset",
                &self.config.preset,
                "-crf",
                &self.config.crf.to_string(),
                "-avoid_negative_ts",
                "make_zero",
                output_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout = std::time::Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| CutError::Spawn(e.to_string()))?
            },
            _ = tokio::time::sleep(timeout) => {
                return Err(CutError::Timeout(self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CutError::Encoder(condense_stderr(&stderr)));
        }

        // ffmpeg can exit zero with nothing written when the seek point
        // falls past the end of the source
        let valid = std::fs::metadata(output_path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !valid {
            return Err(CutError::MissingOutput(
                output_path.to_string_lossy().to_string(),
            ));
        }

        info!(
            "Cut '{}' clip ({:.0}s) to {:?}",
            clip.category,
            clip.duration_seconds(),
            output_path
        );
        Ok(())
    }
}

/// Keep only the error-looking tail lines of ffmpeg's chatty stderr
fn condense_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .filter(|l| {
            let lower = l.to_lowercase();
            lower.contains("error") || lower.contains("invalid") || lower.contains("failed")
        })
        .collect();

    if lines.is_empty() {
        stderr.lines().rev().take(3).collect::<Vec<_>>().join("; ")
    } else {
        lines.join("; ")
    }
}
