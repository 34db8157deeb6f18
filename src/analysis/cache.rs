/*!
 * Analysis result caching.
 *
 * Caches refined clip lists keyed by a fingerprint of the subtitle
 * sequence and the analysis configuration, so re-running a batch over
 * unchanged episodes skips the scan entirely.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::analysis::refine::ClipCandidate;

/// Clip cache keyed by episode fingerprint
pub struct ScoreCache {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<String, Vec<ClipCandidate>>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl ScoreCache {
    /// Create a new clip cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get the cached clips for a fingerprint
    pub fn get(&self, fingerprint: &str) -> Option<Vec<ClipCandidate>> {
        if !self.enabled {
            return None;
        }

        let cache = self.cache.read();
        match cache.get(fingerprint) {
            Some(clips) => {
                let mut hits = self.hits.write();
                *hits += 1;

                debug!("Cache hit for fingerprint {}", &fingerprint[..12.min(fingerprint.len())]);
                Some(clips.clone())
            }
            None => {
                let mut misses = self.misses.write();
                *misses += 1;

                debug!("Cache miss for fingerprint {}", &fingerprint[..12.min(fingerprint.len())]);
                None
            }
        }
    }

    /// Store clips for a fingerprint; a later store for the same key wins
    pub fn store(&self, fingerprint: &str, clips: &[ClipCandidate]) {
        if !self.enabled {
            return;
        }

        let mut cache = self.cache.write();
        cache.insert(fingerprint.to_string(), clips.to_vec());
    }

    /// Get cache statistics as (hits, misses, hit rate)
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache and its counters
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Clip cache cleared");
    }

    /// Number of cached episodes
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Clone for ScoreCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}
