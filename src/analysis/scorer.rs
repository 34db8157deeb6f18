/*!
 * Rule-based importance scoring for subtitle windows.
 *
 * Each window of joined subtitle text is scored against every plot-point
 * category: weighted keyword occurrence counts, punctuation-intensity
 * bonuses, a flat dominant-genre bonus per distinct matching keyword, and
 * a positional boost for windows near the start or end of the episode.
 */

use crate::app_config::{CategoryConfig, ScoringWeights};
use crate::analysis::genre::{DetectedGenre, count_occurrences};

/// Rule-based importance scorer over an immutable category table
pub struct ImportanceScorer<'a> {
    categories: &'a [CategoryConfig],
    weights: &'a ScoringWeights,
    genre: Option<&'a DetectedGenre>,
}

impl<'a> ImportanceScorer<'a> {
    /// Create a scorer over the given category table and weights
    pub fn new(
        categories: &'a [CategoryConfig],
        weights: &'a ScoringWeights,
        genre: Option<&'a DetectedGenre>,
    ) -> Self {
        Self {
            categories,
            weights,
            genre,
        }
    }

    /// The category table this scorer was built over
    pub fn categories(&self) -> &[CategoryConfig] {
        self.categories
    }

    /// The detected genre this scorer applies a bonus for, if any
    pub fn genre(&self) -> Option<&DetectedGenre> {
        self.genre
    }

    /// Score a window of text against every category.
    ///
    /// Returns scores parallel to the category table so the best category
    /// is picked deterministically (ties resolve to the earlier entry).
    /// `position_ratio` is the window start index over the sequence length,
    /// in `[0, 1]`. Empty text scores 0.0 everywhere.
    pub fn score(&self, text: &str, position_ratio: f64) -> Vec<f64> {
        if text.trim().is_empty() {
            return vec![0.0; self.categories.len()];
        }

        let punctuation = self.punctuation_bonus(text);
        let genre = self.genre_bonus(text);
        let edge = self.is_edge_position(position_ratio);

        self.categories
            .iter()
            .map(|cat| {
                let keyword_score: f64 = cat
                    .keywords
                    .iter()
                    .map(|kw| count_occurrences(text, kw) as f64 * cat.weight)
                    .sum();

                let mut score = keyword_score + punctuation + genre;
                if edge {
                    score *= self.weights.edge_boost;
                }
                score
            })
            .collect()
    }

    /// Index and score of the best-scoring category for a window
    pub fn best_category(&self, text: &str, position_ratio: f64) -> (usize, f64) {
        let scores = self.score(text, position_ratio);
        let mut best_idx = 0;
        let mut best_score = f64::MIN;
        for (idx, &score) in scores.iter().enumerate() {
            if score > best_score {
                best_idx = idx;
                best_score = score;
            }
        }
        (best_idx, best_score.max(0.0))
    }

    /// Punctuation-intensity bonus, shared by every category.
    ///
    /// Both fullwidth and ASCII marks count since subtitle files mix them.
    fn punctuation_bonus(&self, text: &str) -> f64 {
        let exclaims = count_occurrences(text, "！") + count_occurrences(text, "!");
        let questions = count_occurrences(text, "？") + count_occurrences(text, "?");
        let ellipses = count_occurrences(text, "...") + count_occurrences(text, "…");

        exclaims as f64 * self.weights.exclamation
            + questions as f64 * self.weights.question
            + ellipses as f64 * self.weights.ellipsis
    }

    /// Flat bonus per distinct dominant-genre keyword present in the text,
    /// scaled by detection confidence. Counting distinct keywords rather
    /// than occurrences keeps genre disambiguation from compounding with
    /// the raw keyword counts.
    fn genre_bonus(&self, text: &str) -> f64 {
        let Some(genre) = self.genre else {
            return 0.0;
        };

        let distinct_matches = genre
            .keywords
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .count();

        distinct_matches as f64 * self.weights.genre_bonus * genre.confidence
    }

    /// Openings and closings are over-represented among natural highlights
    fn is_edge_position(&self, position_ratio: f64) -> bool {
        position_ratio < self.weights.edge_band || position_ratio > 1.0 - self.weights.edge_band
    }
}
