/*!
 * Overlap resolution for window candidates.
 *
 * Overlapping windows from a strided scan describe the same stretch of the
 * episode; only the strongest survives. Non-overlapping candidates must
 * still keep a minimum gap so the final clips do not crowd each other.
 */

use log::debug;

use crate::analysis::scanner::WindowCandidate;
use crate::app_config::SelectionConfig;

/// Resolves overlapping and crowded window candidates
pub struct OverlapResolver<'a> {
    config: &'a SelectionConfig,
}

impl<'a> OverlapResolver<'a> {
    pub fn new(config: &'a SelectionConfig) -> Self {
        Self { config }
    }

    /// Collapse overlapping candidates, keeping the higher-scoring one, and
    /// drop candidates closer than `min_gap` lines to the previous keeper.
    ///
    /// On an overlap the incumbent wins ties; a challenger must score
    /// strictly higher to replace it.
    pub fn resolve(&self, mut candidates: Vec<WindowCandidate>) -> Vec<WindowCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        candidates.sort_by_key(|c| c.start_index);

        let mut kept: Vec<WindowCandidate> = Vec::new();
        for candidate in candidates {
            let Some(last) = kept.last_mut() else {
                kept.push(candidate);
                continue;
            };

            if candidate.start_index < last.end_index {
                if candidate.score > last.score {
                    *last = candidate;
                }
                continue;
            }

            if candidate.start_index - last.end_index >= self.config.min_gap {
                kept.push(candidate);
            }
        }

        debug!("Overlap resolution kept {} candidates", kept.len());
        kept
    }
}
