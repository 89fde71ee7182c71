//! Memoization of progression series.
//!
//! Progressions are deterministic, so a cache entry is only a saved
//! computation: a miss, an eviction or a failed write never changes results.

mod disk;

pub use disk::{clear_cache, get_cache_path, DiskCache};

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ScoringError;
use crate::rules::Ruleset;
use crate::scoring::{progression, Progression};
use crate::season::EventRecord;

/// Configuration for progression caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
}

/// Content hash of everything a progression depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

#[derive(Serialize)]
struct KeyMaterial<'a> {
    season: u16,
    rules: &'a Ruleset,
    records: &'a [EventRecord],
}

impl CacheKey {
    /// Hash (season, ruleset, records). `None` if the inputs cannot be encoded.
    pub fn new(rules: &Ruleset, records: &[EventRecord]) -> Option<Self> {
        let material = KeyMaterial {
            season: rules.season,
            rules,
            records,
        };
        let bytes = serde_json::to_vec(&material).ok()?;
        let digest = Sha256::digest(&bytes);
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Some(Self(format!("progression:{}", hex)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Storage for computed progressions.
pub trait ProgressionCache {
    fn get(&self, key: &CacheKey) -> Option<Progression>;
    fn put(&self, key: &CacheKey, progression: &Progression);
}

/// Never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl ProgressionCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<Progression> {
        None
    }

    fn put(&self, _key: &CacheKey, _progression: &Progression) {}
}

/// In-process cache, dropped with the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Progression>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressionCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<Progression> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &CacheKey, progression: &Progression) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.clone(), progression.clone());
        }
    }
}

/// Pick the cache for a run.
pub fn build_cache(config: &CacheConfig) -> Box<dyn ProgressionCache> {
    if config.enabled {
        Box::new(DiskCache::new(get_cache_path()))
    } else {
        Box::new(NoCache)
    }
}

/// Progression from `cache` if present, computed and stored otherwise.
pub fn cached_progression(
    cache: &dyn ProgressionCache,
    records: &[EventRecord],
    rules: &Ruleset,
) -> Result<Progression, ScoringError> {
    let key = CacheKey::new(rules, records);

    if let Some(ref key) = key {
        if let Some(hit) = cache.get(key) {
            log::debug!("Progression cache hit for {}", rules.season);
            return Ok(hit);
        }
    }

    let computed = progression(records, rules)?;
    if let Some(ref key) = key {
        cache.put(key, &computed);
    }
    Ok(computed)
}
