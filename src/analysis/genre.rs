/*!
 * Dominant-genre detection for subtitle sequences.
 *
 * The opening portion of an episode is matched against per-genre keyword
 * tables; the winning genre (if any) later feeds a flat bonus into the
 * importance scorer so cross-genre keyword collisions do not compound
 * with raw occurrence counts.
 */

use log::debug;

use crate::app_config::GenreProfile;
use crate::subtitle_processor::SubtitleEntry;

/// Number of leading subtitle lines sampled for detection
const DETECTION_SAMPLE_LINES: usize = 200;

/// Raw keyword score a genre must exceed to count as detected
const DETECTION_MIN_SCORE: f64 = 5.0;

/// Raw score at which detection confidence saturates to 1.0
const CONFIDENCE_SATURATION: f64 = 50.0;

/// A detected dominant genre with its keyword table and confidence
#[derive(Debug, Clone)]
pub struct DetectedGenre {
    /// Genre identifier
    pub name: String,

    /// Keywords characteristic of this genre
    pub keywords: Vec<String>,

    /// Detection confidence in [0, 1]
    pub confidence: f64,
}

/// Genre detector over static keyword profiles
pub struct GenreDetector<'a> {
    profiles: &'a [GenreProfile],
}

impl<'a> GenreDetector<'a> {
    /// Create a detector over the configured genre profiles
    pub fn new(profiles: &'a [GenreProfile]) -> Self {
        Self { profiles }
    }

    /// Detect the dominant genre of a subtitle sequence.
    ///
    /// Returns `None` when no genre clears the minimum match score; the
    /// scorer then simply skips the genre bonus.
    pub fn detect(&self, entries: &[SubtitleEntry]) -> Option<DetectedGenre> {
        if entries.is_empty() || self.profiles.is_empty() {
            return None;
        }

        let sample: String = entries
            .iter()
            .take(DETECTION_SAMPLE_LINES)
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut best: Option<(&GenreProfile, f64)> = None;
        for profile in self.profiles {
            let score: f64 = profile
                .keywords
                .iter()
                .map(|kw| count_occurrences(&sample, kw) as f64)
                .sum();

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((profile, score)),
            }
        }

        let (profile, score) = best?;
        if score <= DETECTION_MIN_SCORE {
            debug!("No dominant genre (best score {:.1})", score);
            return None;
        }

        let confidence = (score / CONFIDENCE_SATURATION).min(1.0);
        debug!(
            "Detected genre '{}' with confidence {:.2}",
            profile.name, confidence
        );

        Some(DetectedGenre {
            name: profile.name.clone(),
            keywords: profile.keywords.clone(),
            confidence,
        })
    }
}

/// Count non-overlapping occurrences of a needle in a haystack
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
