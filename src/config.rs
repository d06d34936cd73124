//! Configuration management for the Skycast service
//!
//! Settings come from environment variables with sensible defaults; the only
//! secret is the weather provider API key, which falls back to a placeholder
//! demo value that the real provider will reject with HTTP 401.

use serde::{Deserialize, Serialize};

/// Placeholder key used when no real API key is configured
pub const DEMO_API_KEY: &str = "demo_key";

/// Root configuration structure for the Skycast service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Snapshot cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Base URL for the current/forecast endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL for the geocoding endpoint
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Retry budget for transient request failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Snapshot cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched snapshot stays fresh, in minutes
    #[serde(default = "default_cache_ttl")]
    pub ttl_minutes: u32,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_api_key() -> String {
    DEMO_API_KEY.to_string()
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_cache_ttl() -> u32 {
    5
}

fn default_cache_location() -> String {
    "~/.cache/skycast".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            geo_url: default_geo_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from `SKYCAST_*` environment variables
    ///
    /// The API key also honors the conventional `OPENWEATHER_API_KEY` name.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("SKYCAST_API_KEY").or_else(|_| std::env::var("OPENWEATHER_API_KEY"))
            && !key.is_empty()
        {
            config.weather.api_key = key;
        }
        if let Ok(url) = std::env::var("SKYCAST_BASE_URL") {
            config.weather.base_url = url;
        }
        if let Ok(url) = std::env::var("SKYCAST_GEO_URL") {
            config.weather.geo_url = url;
        }
        if let Ok(dir) = std::env::var("SKYCAST_CACHE_DIR") {
            config.cache.location = dir;
        }
        if let Ok(port) = std::env::var("SKYCAST_PORT")
            && let Ok(port) = port.parse()
        {
            config.server.port = port;
        }
        if let Ok(level) = std::env::var("SKYCAST_LOG") {
            config.log_level = level;
        }

        config
    }

    /// True when no real API key is configured; provider calls will come
    /// back as authentication failures
    #[must_use]
    pub fn is_demo_key(&self) -> bool {
        self.weather.api_key == DEMO_API_KEY
    }
}
