//! Pipeline result memoization

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use ahash::RandomState;
use dg_core::{FilterState, SortState};
use tracing::trace;

use crate::pipeline::{PageWindow, PipelineOutput, PipelineParams};

/// Everything a pipeline pass depends on. Rows and columns are identified by
/// generation counters the owner bumps whenever it replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub rows_generation: u64,
    pub columns_generation: u64,
    pub sort: Option<SortState>,
    pub filters: Option<FilterState>,
    pub page: Option<PageWindow>,
}

impl PipelineKey {
    pub fn new(rows_generation: u64, columns_generation: u64, params: &PipelineParams<'_>) -> Self {
        Self {
            rows_generation,
            columns_generation,
            sort: params.sort.cloned(),
            filters: params.filters.cloned(),
            page: params.page,
        }
    }
}

/// Single-entry cache of the last pipeline output
pub struct PipelineCache {
    hasher: RandomState,
    entry: Option<(u64, PipelineKey, Arc<PipelineOutput>)>,
    hits: u64,
    misses: u64,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached output for `key`, or compute and remember it
    pub fn get_or_compute<F>(&mut self, key: PipelineKey, compute: F) -> Arc<PipelineOutput>
    where
        F: FnOnce() -> PipelineOutput,
    {
        let hash = BuildHasher::hash_one(&self.hasher, &key);
        if let Some((cached_hash, cached_key, output)) = &self.entry {
            if *cached_hash == hash && *cached_key == key {
                self.hits += 1;
                return Arc::clone(output);
            }
        }

        self.misses += 1;
        trace!(hash, "Pipeline cache miss");
        let output = Arc::new(compute());
        self.entry = Some((hash, key, Arc::clone(&output)));
        output
    }

    /// Drop the cached entry
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable structural hash of a key, handy for logging
pub fn key_fingerprint<K: Hash>(key: &K) -> u64 {
    BuildHasher::hash_one(&RandomState::with_seeds(0, 0, 0, 0), key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::SortDirection;

    #[test]
    fn test_hit_on_identical_key() {
        let mut cache = PipelineCache::new();
        let sort = SortState::new("name", SortDirection::Asc);
        let params = PipelineParams {
            sort: Some(&sort),
            ..Default::default()
        };

        let mut computed = 0;
        for _ in 0..3 {
            cache.get_or_compute(PipelineKey::new(1, 1, &params), || {
                computed += 1;
                PipelineOutput::default()
            });
        }
        assert_eq!(computed, 1);
        assert_eq!(cache.stats(), (2, 1));
    }

    #[test]
    fn test_miss_on_new_generation() {
        let mut cache = PipelineCache::new();
        let params = PipelineParams::default();
        cache.get_or_compute(PipelineKey::new(1, 1, &params), PipelineOutput::default);
        let output = cache.get_or_compute(PipelineKey::new(2, 1, &params), || PipelineOutput {
            indices: vec![0],
            total_rows: 1,
            total_pages: 1,
            page: 1,
        });
        assert_eq!(output.indices, vec![0]);
        assert_eq!(cache.stats(), (0, 2));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let key = PipelineKey::new(3, 4, &PipelineParams::default());
        assert_eq!(key_fingerprint(&key), key_fingerprint(&key.clone()));
    }
}
