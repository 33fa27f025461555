use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_LATITUDE: f64 = 40.71;
pub const DEFAULT_LONGITUDE: f64 = -74.01;
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_DB_PATH: &str = "weather.db";
pub const DEFAULT_HISTORY_DAYS: u32 = 5;
pub const DEFAULT_RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub days: Option<u32>,
    pub cache_per_day: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentConfig {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub location: Option<LocationConfig>,
    pub upstream: Option<UpstreamConfig>,
    pub poller: Option<PollerConfig>,
    pub storage: Option<StorageConfig>,
    pub history: Option<HistoryConfig>,
    pub recent: Option<RecentConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from WXLOG_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXLOG_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// HTTP bind address (default 127.0.0.1:5000)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn latitude(&self) -> f64 {
        self.location
            .as_ref()
            .and_then(|l| l.latitude)
            .unwrap_or(DEFAULT_LATITUDE)
    }

    pub fn longitude(&self) -> f64 {
        self.location
            .as_ref()
            .and_then(|l| l.longitude)
            .unwrap_or(DEFAULT_LONGITUDE)
    }

    /// IANA zone used both for the upstream query and for "today"
    pub fn timezone(&self) -> String {
        self.location
            .as_ref()
            .and_then(|l| l.timezone.clone())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
    }

    pub fn upstream_base_url(&self) -> String {
        self.upstream
            .as_ref()
            .and_then(|u| u.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn upstream_timeout_secs(&self) -> u64 {
        self.upstream
            .as_ref()
            .and_then(|u| u.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn poll_interval_secs(&self) -> u64 {
        self.poller
            .as_ref()
            .and_then(|p| p.interval_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    /// SQLite file holding saved temperatures
    pub fn db_path(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.path.clone())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
    }

    /// Length of the trailing history window, ending yesterday
    pub fn history_days(&self) -> u32 {
        self.history
            .as_ref()
            .and_then(|h| h.days)
            .unwrap_or(DEFAULT_HISTORY_DAYS)
    }

    pub fn history_cache_per_day(&self) -> bool {
        self.history
            .as_ref()
            .and_then(|h| h.cache_per_day)
            .unwrap_or(false)
    }

    pub fn recent_limit(&self) -> u32 {
        self.recent
            .as_ref()
            .and_then(|r| r.limit)
            .unwrap_or(DEFAULT_RECENT_LIMIT)
    }
}
