/*!
 * Final candidate selection: keep the strongest few, then restore
 * chronological order so clips come out in episode order.
 */

use log::debug;

use crate::analysis::scanner::WindowCandidate;
use crate::app_config::SelectionConfig;

/// Keep the top `max_clips` candidates by score, returned chronologically.
///
/// Score ties break toward the earlier window so selection is stable.
pub fn select_top(
    mut candidates: Vec<WindowCandidate>,
    config: &SelectionConfig,
) -> Vec<WindowCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.start_index.cmp(&b.start_index))
    });
    candidates.truncate(config.max_clips);
    candidates.sort_by_key(|c| c.start_index);

    debug!("Selected {} clip candidates", candidates.len());
    candidates
}
