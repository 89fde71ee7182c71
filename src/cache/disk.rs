use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{CacheKey, ProgressionCache};
use crate::scoring::Progression;

/// Get the platform-appropriate cache directory for champ-sim
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("champ-sim/progression"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/champ-sim/progression",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the progression cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Disk-persistent progression cache
///
/// Uses cacache for disk persistence and an in-memory HashMap for fast access.
/// Entries are loaded from disk on demand.
#[derive(Clone)]
pub struct DiskCache {
    inner: Arc<Mutex<HashMap<CacheKey, Progression>>>,
    cache_path: PathBuf,
}

/// Serializable representation of a cache entry for disk storage
#[derive(serde::Serialize, serde::Deserialize)]
struct DiskCacheEntry {
    cached_at: DateTime<Utc>,
    progression: Progression,
}

impl DiskCache {
    pub fn new(cache_path: PathBuf) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            cache_path,
        }
    }

    /// Clear the in-memory cache; disk entries stay
    pub fn clear_memory(&self) {
        if let Ok(mut entries) = self.inner.lock() {
            entries.clear();
        }
    }

    /// Try to load a cache entry from disk
    fn load_from_disk(&self, key: &CacheKey) -> Option<Progression> {
        let bytes = cacache::read_sync(&self.cache_path, key.as_str()).ok()?;
        let entry: DiskCacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Ignoring unreadable cache entry {}: {}", key.as_str(), e);
                return None;
            }
        };
        log::debug!("Loaded progression cached at {}", entry.cached_at.to_rfc3339());

        // Populate in-memory cache for subsequent hits
        if let Ok(mut entries) = self.inner.lock() {
            entries.insert(key.clone(), entry.progression.clone());
        }
        Some(entry.progression)
    }
}

impl ProgressionCache for DiskCache {
    fn get(&self, key: &CacheKey) -> Option<Progression> {
        // Check in-memory first
        if let Ok(entries) = self.inner.lock() {
            if let Some(progression) = entries.get(key) {
                return Some(progression.clone());
            }
        }

        self.load_from_disk(key)
    }

    fn put(&self, key: &CacheKey, progression: &Progression) {
        if let Ok(mut entries) = self.inner.lock() {
            entries.insert(key.clone(), progression.clone());
        }

        // Disk errors only cost a recomputation next time
        let entry = DiskCacheEntry {
            cached_at: Utc::now(),
            progression: progression.clone(),
        };
        match serde_json::to_vec(&entry) {
            Ok(serialized) => {
                if let Err(e) = cacache::write_sync(&self.cache_path, key.as_str(), &serialized) {
                    log::debug!("Failed to write cache entry {}: {}", key.as_str(), e);
                }
            }
            Err(e) => log::debug!("Failed to serialize cache entry: {}", e),
        }
    }
}
