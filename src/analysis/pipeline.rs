/*!
 * End-to-end highlight analysis pipeline.
 *
 * Ties the stages together: genre detection, sliding-window scan (with an
 * optional AI rescoring pass), overlap resolution, top-N selection, and
 * boundary refinement. Results are cached per episode fingerprint so an
 * unchanged episode is never analyzed twice in one run.
 */

use log::info;
use sha2::{Digest, Sha256};

use crate::analysis::cache::ScoreCache;
use crate::analysis::dedup::OverlapResolver;
use crate::analysis::genre::GenreDetector;
use crate::analysis::refine::{BoundaryRefiner, ClipCandidate};
use crate::analysis::scanner::{WindowCandidate, WindowScanner};
use crate::analysis::scorer::ImportanceScorer;
use crate::analysis::selector::select_top;
use crate::app_config::Config;
use crate::rescorer::AiRescorer;
use crate::subtitle_processor::SubtitleEntry;

/// Highlight analysis pipeline over a fixed configuration
pub struct HighlightPipeline<'a> {
    config: &'a Config,
    cache: ScoreCache,
}

impl<'a> HighlightPipeline<'a> {
    /// Create a pipeline with its own enabled cache
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cache: ScoreCache::default(),
        }
    }

    /// Create a pipeline sharing an existing cache
    pub fn with_cache(config: &'a Config, cache: ScoreCache) -> Self {
        Self { config, cache }
    }

    /// The cache backing this pipeline
    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Analyze a subtitle sequence into refined clips.
    ///
    /// With a rescorer, each window's rule score is blended with an AI
    /// score before thresholding; provider failures degrade to the rule
    /// score per window, so the result is never worse than rule-only.
    pub async fn analyze(
        &self,
        entries: &[SubtitleEntry],
        rescorer: Option<&AiRescorer>,
    ) -> Vec<ClipCandidate> {
        let fingerprint = self.fingerprint(entries);
        if let Some(clips) = self.cache.get(&fingerprint) {
            return clips;
        }

        let genre = GenreDetector::new(&self.config.genres).detect(entries);
        let scorer =
            ImportanceScorer::new(&self.config.categories, &self.config.scoring.weights, genre.as_ref());
        let scanner = WindowScanner::new(&scorer, &self.config.scan);

        let candidates = match rescorer {
            Some(rescorer) => scanner.scan_with(entries, rescorer).await,
            None => scanner.scan(entries),
        };

        let clips = self.finish(entries, candidates);
        self.cache.store(&fingerprint, &clips);
        clips
    }

    /// Analyze a subtitle sequence with rule-based scoring only
    pub fn analyze_rules_only(&self, entries: &[SubtitleEntry]) -> Vec<ClipCandidate> {
        let fingerprint = self.fingerprint(entries);
        if let Some(clips) = self.cache.get(&fingerprint) {
            return clips;
        }

        let genre = GenreDetector::new(&self.config.genres).detect(entries);
        let scorer =
            ImportanceScorer::new(&self.config.categories, &self.config.scoring.weights, genre.as_ref());
        let scanner = WindowScanner::new(&scorer, &self.config.scan);

        let clips = self.finish(entries, scanner.scan(entries));
        self.cache.store(&fingerprint, &clips);
        clips
    }

    fn finish(
        &self,
        entries: &[SubtitleEntry],
        candidates: Vec<WindowCandidate>,
    ) -> Vec<ClipCandidate> {
        let kept = OverlapResolver::new(&self.config.selection).resolve(candidates);
        let selected = select_top(kept, &self.config.selection);

        let refiner = BoundaryRefiner::new(&self.config.refine);
        let clips: Vec<ClipCandidate> = selected
            .iter()
            .filter_map(|c| refiner.refine(entries, c, &self.config.categories[c.category_index]))
            .collect();

        info!("Analysis produced {} clips from {} lines", clips.len(), entries.len());
        clips
    }

    /// Fingerprint of the subtitle sequence plus every analysis-relevant
    /// part of the configuration. Any change to either invalidates the
    /// cached result.
    pub fn fingerprint(&self, entries: &[SubtitleEntry]) -> String {
        let mut hasher = Sha256::new();

        for entry in entries {
            hasher.update(entry.start_time_ms.to_le_bytes());
            hasher.update(entry.end_time_ms.to_le_bytes());
            hasher.update(entry.text.as_bytes());
            hasher.update([0u8]);
        }

        for part in [
            serde_json::to_string(&self.config.scan),
            serde_json::to_string(&self.config.selection),
            serde_json::to_string(&self.config.refine),
            serde_json::to_string(&self.config.scoring),
            serde_json::to_string(&self.config.categories),
            serde_json::to_string(&self.config.genres),
        ] {
            hasher.update(part.unwrap_or_default().as_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}
