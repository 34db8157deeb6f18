/*!
 * Application controller for batch episode processing.
 *
 * Walks a directory of subtitle files, analyzes each episode into clips,
 * optionally cuts the clips from the matching video files, and writes a
 * per-episode report. One broken episode never stops the batch.
 */

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use walkdir::WalkDir;

use crate::analysis::HighlightPipeline;
use crate::analysis::refine::ClipCandidate;
use crate::app_config::Config;
use crate::media_cutter::MediaCutter;
use crate::report;
use crate::rescorer::AiRescorer;
use crate::subtitle_processor::SubtitleCollection;

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "mkv", "avi", "mov", "wmv", "flv", "ts"];

/// Main controller for the application
pub struct Controller {
    /// Application configuration
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every subtitle file under `subtitles_dir`.
    ///
    /// With `videos_dir` set and `analyze_only` false, clips are also cut
    /// from the matching video files into `output_dir`.
    pub async fn run(
        &self,
        subtitles_dir: PathBuf,
        videos_dir: Option<PathBuf>,
        output_dir: PathBuf,
        analyze_only: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !subtitles_dir.exists() {
            return Err(anyhow!("Subtitle directory does not exist: {:?}", subtitles_dir));
        }

        let subtitle_files = find_subtitle_files(&subtitles_dir);
        if subtitle_files.is_empty() {
            return Err(anyhow!("No .srt files found in directory: {:?}", subtitles_dir));
        }

        std::fs::create_dir_all(&output_dir)?;

        let rescorer = self.build_rescorer().await;
        let pipeline = HighlightPipeline::new(&self.config);

        let progress = ProgressBar::new(subtitle_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);

        let mut success_count = 0;
        let mut error_count = 0;

        for subtitle_file in &subtitle_files {
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress.set_message(format!("Processing: {}", file_name));

            match self
                .process_episode(
                    subtitle_file,
                    videos_dir.as_deref(),
                    &output_dir,
                    analyze_only,
                    &pipeline,
                    rescorer.as_ref(),
                )
                .await
            {
                Ok(clip_count) => {
                    info!("{}: {} clips", file_name, clip_count);
                    success_count += 1;
                }
                Err(e) => {
                    error!("Error processing {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            progress.inc(1);
        }

        progress.finish_with_message("Batch complete");

        let (hits, misses, hit_rate) = pipeline.cache().stats();
        info!(
            "Batch completed in {:.1}s: {} processed, {} errors (cache: {} hits, {} misses, {:.0}% hit rate)",
            start_time.elapsed().as_secs_f64(),
            success_count,
            error_count,
            hits,
            misses,
            hit_rate * 100.0
        );

        Ok(())
    }

    /// Analyze one subtitle file, cut its clips, and write its report
    async fn process_episode(
        &self,
        subtitle_file: &Path,
        videos_dir: Option<&Path>,
        output_dir: &Path,
        analyze_only: bool,
        pipeline: &HighlightPipeline<'_>,
        rescorer: Option<&AiRescorer>,
    ) -> Result<usize> {
        let episode = episode_number(subtitle_file);

        let collection = SubtitleCollection::from_srt_file(subtitle_file)?;
        let clips = pipeline.analyze(&collection.entries, rescorer).await;
        if clips.is_empty() {
            warn!("No clips cleared the thresholds for episode {}", episode);
        }

        report::write_report(output_dir, &episode, &clips)?;

        if !analyze_only {
            if let Some(videos_dir) = videos_dir {
                match find_matching_video(videos_dir, subtitle_file, &episode) {
                    Some(video) => self.cut_clips(&video, &episode, &clips, output_dir).await,
                    None => warn!("No matching video found for episode {}", episode),
                }
            }
        }

        Ok(clips.len())
    }

    /// Cut every clip of an episode; a failed cut loses only that clip
    async fn cut_clips(
        &self,
        video: &Path,
        episode: &str,
        clips: &[ClipCandidate],
        output_dir: &Path,
    ) {
        let cutter = MediaCutter::new(&self.config.cut);

        for (i, clip) in clips.iter().enumerate() {
            let output_path =
                output_dir.join(format!("E{}_{:02}_{}.mp4", episode, i + 1, clip.category));

            if let Err(e) = cutter.cut(video, clip, &output_path).await {
                error!(
                    "Failed to cut clip {} of episode {}: {}",
                    i + 1,
                    episode,
                    e
                );
            }
        }
    }

    /// Build the rescorer if rescoring is enabled and the provider answers
    async fn build_rescorer(&self) -> Option<AiRescorer> {
        if !self.config.scoring.rescoring.enabled {
            return None;
        }

        let rescorer = AiRescorer::from_config(&self.config.scoring.rescoring);
        match rescorer.test_connection().await {
            Ok(()) => {
                info!(
                    "AI rescoring enabled with {} provider",
                    self.config.scoring.rescoring.provider.display_name()
                );
                Some(rescorer)
            }
            Err(e) => {
                warn!("Scoring provider unreachable, continuing rule-only: {}", e);
                None
            }
        }
    }
}

/// Find all .srt files under a directory, sorted for stable batch order
fn find_subtitle_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("srt"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Episode number from a file name: the last run of digits, zero-padded
/// to two places. Falls back to the whole stem when there are no digits.
fn episode_number(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let digits: String = stem
        .chars()
        .rev()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if digits.is_empty() {
        stem
    } else {
        format!("{:0>2}", digits)
    }
}

/// Find the video file for a subtitle: an exact stem match wins, then any
/// video whose name carries the same episode number
fn find_matching_video(videos_dir: &Path, subtitle_file: &Path, episode: &str) -> Option<PathBuf> {
    let stem = subtitle_file.file_stem()?.to_string_lossy().to_string();

    let videos: Vec<PathBuf> = WalkDir::new(videos_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    VIDEO_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .collect();

    if let Some(exact) = videos
        .iter()
        .find(|v| v.file_stem().map(|s| s.to_string_lossy() == stem).unwrap_or(false))
    {
        return Some(exact.clone());
    }

    videos
        .into_iter()
        .find(|v| episode_number(v) == *episode)
}
