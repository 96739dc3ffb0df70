use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::geolocation::Coordinates;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Used for recommendations and chat.
    pub model: String,
    pub location_model: String,
    pub api_base: Option<String>,
    pub timeout_secs: u64,
    pub log_path: Option<PathBuf>,
    /// Position reported by the fixed geolocator.
    pub home: Option<Coordinates>,
    pub thread_chat_history: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            location_model: "gemini-2.5-flash".to_string(),
            api_base: None,
            timeout_secs: 60,
            log_path: None,
            home: None,
            thread_chat_history: false,
        }
    }
}

impl Config {
    /// `<config_dir>/campuseats/config.json`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("campuseats").join("config.json"))
    }

    /// File (if present), then environment.
    pub async fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::from_path(&path).await?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        let config = serde_json::from_str(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("CAMPUSEATS_MODEL") {
            self.model = model;
        }
        if let Some(model) = non_empty("CAMPUSEATS_LOCATION_MODEL") {
            self.location_model = model;
        }
        if let Some(base) = non_empty("CAMPUSEATS_API_BASE") {
            self.api_base = Some(base);
        }
        if let Some(path) = non_empty("CAMPUSEATS_LOG_PATH") {
            self.log_path = Some(PathBuf::from(path));
        }

        let lat = non_empty("CAMPUSEATS_LAT").and_then(|v| v.parse::<f64>().ok());
        let lng = non_empty("CAMPUSEATS_LNG").and_then(|v| v.parse::<f64>().ok());
        match (lat, lng) {
            (Some(lat), Some(lng)) => self.home = Some(Coordinates { lat, lng }),
            (None, None) => {}
            _ => tracing::warn!("CAMPUSEATS_LAT and CAMPUSEATS_LNG must be set together; ignoring"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolved_log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("campuseats.log"))
    }
}
