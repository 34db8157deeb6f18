/*!
 * Per-episode clip reports.
 *
 * A plain-text summary of the selected clips is written next to the cut
 * videos, one file per episode. The file is written to a temporary path
 * first and renamed into place so a crash never leaves a half report.
 */

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::analysis::refine::ClipCandidate;
use crate::timecode::format_timecode;

/// Render the report body for one episode
pub fn render_report(episode: &str, clips: &[ClipCandidate]) -> String {
    let mut body = String::new();
    body.push_str(&format!("第{}集 精彩片段报告\n", episode));
    body.push_str(&format!("共 {} 个片段\n\n", clips.len()));

    for (i, clip) in clips.iter().enumerate() {
        body.push_str(&format!(
            "片段 {} [{}]\n  评分: {:.1}\n  时间: {} --> {}\n  时长: {:.0} 秒\n\n",
            i + 1,
            clip.category,
            clip.score,
            format_timecode(clip.start_time_ms),
            format_timecode(clip.end_time_ms),
            clip.duration_seconds(),
        ));
    }

    body
}

/// Write the episode report atomically into `output_dir`
pub fn write_report(output_dir: &Path, episode: &str, clips: &[ClipCandidate]) -> Result<()> {
    let body = render_report(episode, clips);
    let final_path = output_dir.join(format!("E{}_report.txt", episode));

    let mut tmp = tempfile::NamedTempFile::new_in(output_dir)
        .context("Failed to create temporary report file")?;
    tmp.write_all(body.as_bytes())
        .context("Failed to write report body")?;
    tmp.persist(&final_path)
        .with_context(|| format!("Failed to move report into place at {:?}", final_path))?;

    info!("Wrote report for episode {} to {:?}", episode, final_path);
    Ok(())
}
