/*!
 * Sliding-window scan over a subtitle sequence.
 *
 * Overlapping windows of consecutive subtitle lines are scored against the
 * category table; windows clearing their best category's threshold become
 * candidates for downstream overlap resolution and selection.
 */

use log::{debug, trace};

use crate::analysis::scorer::ImportanceScorer;
use crate::app_config::ScanConfig;
use crate::rescorer::AiRescorer;
use crate::subtitle_processor::SubtitleEntry;

/// A thresholded window candidate, positioned by subtitle line indices
#[derive(Debug, Clone)]
pub struct WindowCandidate {
    /// Index of the first subtitle line in the window
    pub start_index: usize,

    /// Index one past the last subtitle line in the window
    pub end_index: usize,

    /// Index into the category table of the window's best category
    pub category_index: usize,

    /// Window score (rule-based, or blended when rescoring is active)
    pub score: f64,
}

/// Sliding-window scanner over a fixed scorer
pub struct WindowScanner<'a> {
    scorer: &'a ImportanceScorer<'a>,
    config: &'a ScanConfig,
}

impl<'a> WindowScanner<'a> {
    pub fn new(scorer: &'a ImportanceScorer<'a>, config: &'a ScanConfig) -> Self {
        Self { scorer, config }
    }

    /// Scan the sequence with rule-based scoring only.
    ///
    /// Sequences shorter than one window yield no candidates.
    pub fn scan(&self, entries: &[SubtitleEntry]) -> Vec<WindowCandidate> {
        let mut candidates = Vec::new();
        for (start, end, text, ratio) in self.windows(entries) {
            let (category_index, score) = self.scorer.best_category(&text, ratio);
            if let Some(candidate) = self.threshold(start, end, category_index, score) {
                candidates.push(candidate);
            }
        }
        debug!(
            "Scan produced {} candidates from {} lines",
            candidates.len(),
            entries.len()
        );
        candidates
    }

    /// Scan the sequence, blending each window's rule score with an AI
    /// rescoring pass before thresholding.
    ///
    /// Rescoring failures degrade to the rule score for that window, so
    /// this never yields fewer candidates than a provider outage would
    /// otherwise cause.
    pub async fn scan_with(
        &self,
        entries: &[SubtitleEntry],
        rescorer: &AiRescorer,
    ) -> Vec<WindowCandidate> {
        let genre_confidence = self.scorer.genre().map(|g| g.confidence);

        let mut candidates = Vec::new();
        for (start, end, text, ratio) in self.windows(entries) {
            let (category_index, rule_score) = self.scorer.best_category(&text, ratio);
            let category = &self.scorer.categories()[category_index];
            let score = rescorer
                .rescore(&text, &category.name, rule_score, genre_confidence)
                .await;
            if let Some(candidate) = self.threshold(start, end, category_index, score) {
                candidates.push(candidate);
            }
        }
        debug!(
            "Rescored scan produced {} candidates from {} lines",
            candidates.len(),
            entries.len()
        );
        candidates
    }

    fn windows<'b>(
        &'b self,
        entries: &'b [SubtitleEntry],
    ) -> impl Iterator<Item = (usize, usize, String, f64)> + 'b {
        let total = entries.len();
        let window_size = self.config.window_size;
        let last_start = total.saturating_sub(window_size);

        (0..=last_start)
            .step_by(self.config.stride.max(1))
            .filter(move |_| total >= window_size)
            .map(move |start| {
                let end = start + window_size;
                let text = entries[start..end]
                    .iter()
                    .map(|e| e.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                let ratio = start as f64 / total as f64;
                (start, end, text, ratio)
            })
    }

    fn threshold(
        &self,
        start: usize,
        end: usize,
        category_index: usize,
        score: f64,
    ) -> Option<WindowCandidate> {
        let category = &self.scorer.categories()[category_index];
        if score < category.min_score {
            trace!(
                "Window [{}, {}) below threshold for '{}': {:.1} < {:.1}",
                start, end, category.name, score, category.min_score
            );
            return None;
        }
        Some(WindowCandidate {
            start_index: start,
            end_index: end,
            category_index,
            score,
        })
    }
}
