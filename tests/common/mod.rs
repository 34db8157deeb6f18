/*!
 * Common test utilities for the plotclip test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use plotclip::subtitle_processor::SubtitleEntry;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
今天的听证会正式开始

2
00:00:05,000 --> 00:00:09,000
双方冲突激烈，争执不断！

3
00:00:10,000 --> 00:00:14,000
我们发现了新的证据
"#;
    create_test_file(dir, filename, content)
}

/// Builds a synthetic subtitle sequence: one line every 4 seconds,
/// each 3 seconds long
pub fn synthetic_entries(texts: &[&str]) -> Vec<SubtitleEntry> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            SubtitleEntry::new(i + 1, i as u64 * 4000, i as u64 * 4000 + 3000, t.to_string())
        })
        .collect()
}

/// Builds a quiet episode with a dense conflict stretch over the
/// given line range
pub fn conflict_episode(total_lines: usize, conflict_range: std::ops::Range<usize>) -> Vec<SubtitleEntry> {
    let texts: Vec<String> = (0..total_lines)
        .map(|i| {
            if conflict_range.contains(&i) {
                "双方冲突激烈 争执不断！".to_string()
            } else {
                format!("第{}句平常的台词", i)
            }
        })
        .collect();
    let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
    synthetic_entries(&refs)
}
