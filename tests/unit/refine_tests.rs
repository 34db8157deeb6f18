/*!
 * Tests for boundary refinement
 */

use plotclip::analysis::{BoundaryRefiner, WindowCandidate};
use plotclip::app_config::{CategoryConfig, RefineConfig};
use plotclip::subtitle_processor::SubtitleEntry;

fn category(name: &str, target_duration_secs: f64) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        keywords: vec!["冲突".to_string()],
        weight: 10.0,
        target_duration_secs,
        min_score: 15.0,
    }
}

// One line every 4 seconds, each 3 seconds long
fn uniform_entries(count: usize) -> Vec<SubtitleEntry> {
    (0..count)
        .map(|i| {
            SubtitleEntry::new(
                i + 1,
                i as u64 * 4000,
                i as u64 * 4000 + 3000,
                format!("第{}句普通台词", i),
            )
        })
        .collect()
}

fn candidate(start: usize, end: usize) -> WindowCandidate {
    WindowCandidate {
        start_index: start,
        end_index: end,
        category_index: 0,
        score: 30.0,
    }
}

/// Test symmetric expansion with no natural boundaries to snap to
#[test]
fn test_refine_withPlainDialogue_shouldExpandSymmetrically() {
    let config = RefineConfig::default();
    let refiner = BoundaryRefiner::new(&config);
    let entries = uniform_entries(400);
    let category = category("key_conflict", 180.0);

    // The 25-line window spans 99s; each expansion round adds one line on
    // each side, so eleven rounds reach 187s
    let clip = refiner.refine(&entries, &candidate(190, 215), &category).unwrap();

    assert_eq!(clip.start_index, 179);
    assert_eq!(clip.end_index, 226);
    assert!((clip.duration_seconds() - 187.0).abs() < 1e-9);
    assert_eq!(clip.category, "key_conflict");
    assert!((clip.score - 30.0).abs() < 1e-9);
}

/// Test that a window at the start of the episode only grows forward
#[test]
fn test_refine_atEpisodeStart_shouldGrowForwardOnly() {
    let config = RefineConfig::default();
    let refiner = BoundaryRefiner::new(&config);
    let entries = uniform_entries(400);
    let category = category("key_conflict", 180.0);

    let clip = refiner.refine(&entries, &candidate(0, 25), &category).unwrap();
    assert_eq!(clip.start_index, 0);
    assert!(clip.duration_seconds() >= 180.0);
}

/// Test that the clip start lands just after a short terminal line
#[test]
fn test_refine_withShortTerminalLine_shouldStartAfterIt() {
    let config = RefineConfig::default();
    let refiner = BoundaryRefiner::new(&config);
    let mut entries = uniform_entries(120);
    entries[48].text = "就这样吧。".to_string();
    // 99s window already exceeds the 60s target, so no expansion happens
    let category = category("key_conflict", 60.0);

    let clip = refiner.refine(&entries, &candidate(50, 75), &category).unwrap();
    assert_eq!(clip.start_index, 49);
}

/// Test that a long line ending in a full stop does not stop the
/// backward walk
#[test]
fn test_refine_withLongTerminalLine_shouldNotSnapStart() {
    let config = RefineConfig::default();
    let refiner = BoundaryRefiner::new(&config);
    let mut entries = uniform_entries(120);
    entries[48].text = "这是一句远远超过二十个字符限制的非常冗长的台词结尾。".to_string();
    let category = category("key_conflict", 60.0);

    let clip = refiner.refine(&entries, &candidate(50, 75), &category).unwrap();
    assert_eq!(clip.start_index, 50);
}

/// Test that timecodes come from the refined boundary lines
#[test]
fn test_refine_shouldDeriveTimesFromBoundaryLines() {
    let config = RefineConfig::default();
    let refiner = BoundaryRefiner::new(&config);
    let entries = uniform_entries(400);
    let category = category("key_conflict", 180.0);

    let clip = refiner.refine(&entries, &candidate(190, 215), &category).unwrap();
    assert_eq!(clip.start_time_ms, entries[clip.start_index].start_time_ms);
    assert_eq!(clip.end_time_ms, entries[clip.end_index - 1].end_time_ms);
}
