use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use crate::playback::PlaybackOptions;

/// Application configuration.
///
/// The behavioral variations of the page (DRM handling, snapshot caching,
/// accessibility labels) are flags here, not separate code paths.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configure ClearKey material on the player when a stream carries it.
    #[serde(default = "default_true")]
    pub drm_enabled: bool,
    /// Emit accessibility labels (logo alt text) in card view-models.
    #[serde(default)]
    pub accessible_labels: bool,
    /// Render the cached snapshot at startup before fresh data arrives.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    /// Seconds to wait before the single playback retry.
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,
    /// Hours before a cached snapshot counts as stale; 0 disables.
    #[serde(default = "default_auto_refresh_hours")]
    pub auto_refresh_hours: u32,
    /// Category shown first.
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_true() -> bool {
    true
}

fn default_retry_backoff_secs() -> u64 {
    2
}

fn default_auto_refresh_hours() -> u32 {
    6
}

fn default_category() -> String {
    "cricket".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            drm_enabled: true,
            accessible_labels: false,
            cache_enabled: true,
            retry_backoff_secs: default_retry_backoff_secs(),
            auto_refresh_hours: default_auto_refresh_hours(),
            default_category: default_category(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "matchday", "matchday") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists() {
                let content = fs::read_to_string(config_path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }
        Ok(AppConfig::default())
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "matchday", "matchday") {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;
            let config_path = config_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }

    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            drm_enabled: self.drm_enabled,
            retry_backoff: Duration::from_secs(self.retry_backoff_secs),
        }
    }
}
