//! Read-through query cache in front of the correlation store.
//!
//! Keys are namespaced so invalidation can be scoped:
//! `corr:province:{code}:…` for per-province queries, `corr:pair:{a}:{b}`
//! for point lookups (canonical order), `corr:global:…` for everything
//! spanning all provinces. Errors are never cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use atlas_core::config::CacheConfig;
use atlas_core::models::{CorrelationPair, PairKey};
use atlas_core::AtlasResult;

const PROVINCE_NS: &str = "corr:province:";
const PAIR_NS: &str = "corr:pair:";
const GLOBAL_NS: &str = "corr:global:";

/// Cached value: a query result list. Point lookups store zero or one pair.
pub type CachedPairs = Arc<Vec<CorrelationPair>>;

/// Query cache with hit/miss tracking.
pub struct QueryCache {
    cache: Cache<String, CachedPairs>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // --- Key builders ---

    pub fn top_related_key(province: &str, limit: usize) -> String {
        format!("{PROVINCE_NS}{province}:top:{limit}")
    }

    pub fn pair_key(key: &PairKey) -> String {
        format!("{PAIR_NS}{}:{}", key.source(), key.target())
    }

    pub fn top_overall_key(limit: usize) -> String {
        format!("{GLOBAL_NS}top:{limit}")
    }

    pub fn range_key(min: Option<f64>, max: Option<f64>) -> String {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_else(|| "*".to_string());
        format!("{GLOBAL_NS}range:{}:{}", bound(min), bound(max))
    }

    pub fn concept_key(needle: &str) -> String {
        format!("{GLOBAL_NS}concept:{needle}")
    }

    pub fn industry_key(needle: &str) -> String {
        format!("{GLOBAL_NS}industry:{needle}")
    }

    // --- Access ---

    pub fn get(&self, key: &str) -> Option<CachedPairs> {
        match self.cache.get(key) {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: String, pairs: Vec<CorrelationPair>) -> CachedPairs {
        let value = Arc::new(pairs);
        self.cache.insert(key, Arc::clone(&value));
        value
    }

    /// Return the cached value for `key`, or run `load`, cache its result
    /// and return it. A failed load leaves the cache untouched.
    pub fn get_or_load<F>(&self, key: String, load: F) -> AtlasResult<CachedPairs>
    where
        F: FnOnce() -> AtlasResult<Vec<CorrelationPair>>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let pairs = load()?;
        Ok(self.insert(key, pairs))
    }

    // --- Invalidation ---

    /// Drop every key scoped to `code`, every pair key naming it, and every
    /// global key.
    pub fn invalidate_province(&self, code: &str) {
        let province_prefix = format!("{PROVINCE_NS}{code}:");
        self.invalidate_matching(|key| {
            key.starts_with(&province_prefix)
                || key.starts_with(GLOBAL_NS)
                || key
                    .strip_prefix(PAIR_NS)
                    .is_some_and(|rest| rest.split(':').any(|c| c == code))
        });
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    fn invalidate_matching<P>(&self, matches: P)
    where
        P: Fn(&str) -> bool,
    {
        self.cache.run_pending_tasks();
        let doomed: Vec<String> = self
            .cache
            .iter()
            .filter_map(|(k, _)| matches(k.as_str()).then(|| k.as_ref().clone()))
            .collect();
        for key in doomed {
            self.cache.invalidate(&key);
        }
    }

    // --- Stats ---

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate in [0.0, 1.0]; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let h = self.hits() as f64;
        let total = h + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            h / total
        }
    }

    /// Entry count after pending maintenance has been applied.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
