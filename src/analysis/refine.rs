/*!
 * Boundary refinement: grow a window candidate toward its category's
 * target duration, then snap both edges to natural dialogue boundaries.
 *
 * Expansion alternates between the two edges so the anchor stays roughly
 * centered; snapping searches near the expanded edges for scene-marker
 * phrases or short terminal lines.
 */

use log::trace;

use crate::analysis::scanner::WindowCandidate;
use crate::app_config::{CategoryConfig, RefineConfig};
use crate::subtitle_processor::SubtitleEntry;
use crate::timecode::ms_to_seconds;

/// A refined clip, positioned both by line indices and by wall-clock time
#[derive(Debug, Clone)]
pub struct ClipCandidate {
    /// Name of the plot-point category that produced the clip
    pub category: String,

    /// Final score carried over from the winning window
    pub score: f64,

    /// Index of the first subtitle line in the clip
    pub start_index: usize,

    /// Index one past the last subtitle line in the clip
    pub end_index: usize,

    /// Clip start in milliseconds, from the first line's start time
    pub start_time_ms: u64,

    /// Clip end in milliseconds, from the last line's end time
    pub end_time_ms: u64,
}

impl ClipCandidate {
    /// Clip duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        ms_to_seconds(self.end_time_ms.saturating_sub(self.start_time_ms))
    }
}

/// Two-phase boundary refiner over a fixed subtitle sequence
pub struct BoundaryRefiner<'a> {
    config: &'a RefineConfig,
}

impl<'a> BoundaryRefiner<'a> {
    pub fn new(config: &'a RefineConfig) -> Self {
        Self { config }
    }

    /// Refine a window candidate into a clip.
    ///
    /// Returns `None` only for degenerate input (an empty window or one
    /// outside the sequence), which a correct scan never produces.
    pub fn refine(
        &self,
        entries: &[SubtitleEntry],
        candidate: &WindowCandidate,
        category: &CategoryConfig,
    ) -> Option<ClipCandidate> {
        if candidate.start_index >= candidate.end_index || candidate.end_index > entries.len() {
            return None;
        }

        // Inclusive line indices for the edge walks
        let anchor_start = candidate.start_index;
        let anchor_end = candidate.end_index - 1;

        let (expanded_start, expanded_end) =
            self.expand(entries, anchor_start, anchor_end, category.target_duration_secs);
        let start = self.natural_start(entries, expanded_start, anchor_start);
        let end = self.natural_end(entries, anchor_end, expanded_end);

        let (start, end) = if start <= end { (start, end) } else { (anchor_start, anchor_end) };

        trace!(
            "Refined [{}, {}] to [{}, {}] for '{}'",
            anchor_start, anchor_end, start, end, category.name
        );

        Some(ClipCandidate {
            category: category.name.clone(),
            score: candidate.score,
            start_index: start,
            end_index: end + 1,
            start_time_ms: entries[start].start_time_ms,
            end_time_ms: entries[end].end_time_ms,
        })
    }

    /// Grow both edges a line at a time until the clip reaches the target
    /// duration, capped at `expansion_ceiling` times the target.
    fn expand(
        &self,
        entries: &[SubtitleEntry],
        mut start: usize,
        mut end: usize,
        target_secs: f64,
    ) -> (usize, usize) {
        let last = entries.len() - 1;
        let ceiling = target_secs * self.config.expansion_ceiling;
        let mut duration = span_seconds(entries, start, end);

        while duration < target_secs && (start > 0 || end < last) {
            if end < last {
                end += 1;
            }
            if duration < target_secs && start > 0 {
                start -= 1;
            }

            duration = span_seconds(entries, start, end);
            if duration >= ceiling {
                break;
            }
        }

        (start, end)
    }

    /// Walk backward from the anchor toward the expanded start, stopping at
    /// a scene-starter phrase or just after a short terminal line.
    fn natural_start(&self, entries: &[SubtitleEntry], expanded_start: usize, anchor: usize) -> usize {
        let floor = expanded_start.saturating_sub(self.config.lookback_lines);

        let mut i = anchor;
        while i > floor {
            let text = &entries[i].text;
            if self.config.scene_starters.iter().any(|s| text.contains(s.as_str())) {
                return i;
            }
            if text.ends_with('。') && text.chars().count() < self.config.short_line_chars {
                return (i + 1).min(anchor);
            }
            i -= 1;
        }

        expanded_start
    }

    /// Walk forward from the anchor toward the expanded end, stopping at a
    /// scene-ender phrase, or at a full stop once the clip has a minimum
    /// amount of content past the anchor.
    fn natural_end(&self, entries: &[SubtitleEntry], anchor: usize, expanded_end: usize) -> usize {
        let last = entries.len() - 1;
        let limit = (expanded_end + self.config.lookahead_lines).min(last);

        for i in anchor..=limit {
            let text = &entries[i].text;
            if self.config.scene_enders.iter().any(|e| text.contains(e.as_str())) {
                return i;
            }
            if text.ends_with('。') && i > anchor + self.config.min_end_offset {
                return i;
            }
        }

        expanded_end.min(last)
    }
}

fn span_seconds(entries: &[SubtitleEntry], start: usize, end: usize) -> f64 {
    ms_to_seconds(entries[end].end_time_ms.saturating_sub(entries[start].start_time_ms))
}
