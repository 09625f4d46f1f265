//! Local snapshot cache for instant cold starts.
//!
//! The last good match-set snapshot is serialized with bincode and rendered
//! immediately at startup, then replaced when a fresh snapshot arrives.
//! Cache keys are opaque strings owned by the glue layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::Snapshot;

/// Cache version; bump when CachedSnapshot changes to auto-invalidate.
const CACHE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub version: u32,
    /// Unix timestamp (seconds) of when the snapshot was cached.
    pub cached_at: u64,
    pub key: String,
    pub snapshot: Snapshot,
}

impl CachedSnapshot {
    pub fn new(key: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            version: CACHE_VERSION,
            cached_at: unix_now(),
            key: key.into(),
            snapshot,
        }
    }

    /// Cache file path for a key: `<cache_dir>/<key_hash>.bin`.
    pub fn cache_path(key: &str) -> Option<PathBuf> {
        use directories::ProjectDirs;
        let proj = ProjectDirs::from("com", "matchday", "matchday")?;
        let cache_dir = proj.cache_dir().to_path_buf();
        std::fs::create_dir_all(&cache_dir).ok()?;
        Some(cache_dir.join(format!("{}.bin", simple_hash(key))))
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        let path = Self::cache_path(&self.key)
            .ok_or_else(|| anyhow::anyhow!("cannot determine cache directory"))?;
        let encoded = bincode::serialize(self)?;
        std::fs::write(&path, encoded)?;
        Ok(())
    }

    /// Load a cached snapshot. None when the cache is missing, corrupt, or
    /// from an older format version.
    pub fn load(key: &str) -> Option<CachedSnapshot> {
        let path = Self::cache_path(key)?;
        let data = std::fs::read(&path).ok()?;
        let cached: CachedSnapshot = bincode::deserialize(&data).ok()?;
        if cached.version != CACHE_VERSION {
            let _ = std::fs::remove_file(&path);
            return None;
        }
        Some(cached)
    }

    /// True when the snapshot is older than the auto-refresh window.
    /// Zero hours disables staleness entirely.
    pub fn is_stale(&self, auto_refresh_hours: u32) -> bool {
        if auto_refresh_hours == 0 {
            return false;
        }
        let age_hours = unix_now().saturating_sub(self.cached_at) / 3600;
        age_hours >= auto_refresh_hours as u64
    }

    pub fn invalidate(key: &str) {
        if let Some(path) = Self::cache_path(key) {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn simple_hash(s: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}
