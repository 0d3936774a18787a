use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings for the OpenWeather current-conditions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        }
    }
}

/// Settings for the Nominatim geocoding API.
///
/// Nominatim's usage policy requires a descriptive `User-Agent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "Portfolio Weather Widget".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,
    /// Emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

/// Top-level configuration, loaded once at process start.
///
/// Example TOML:
/// ```toml
/// store_path = "/var/lib/weather-widget/location.json"
///
/// [openweather]
/// api_key = "..."
///
/// [server]
/// bind_address = "0.0.0.0:3000"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the JSON file holding the location record.
    pub store_path: PathBuf,
    pub openweather: OpenWeatherConfig,
    pub nominatim: NominatimConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("location.json"),
            openweather: OpenWeatherConfig::default(),
            nominatim: NominatimConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `$WEATHER_WIDGET_CONFIG` (or the platform config
    /// directory), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os("WEATHER_WIDGET_CONFIG") {
            Some(p) => PathBuf::from(p),
            None => Self::config_file_path()?,
        };

        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Load config from `path`, or return the defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("WEATHER_WIDGET_STORE") {
            self.store_path = PathBuf::from(v);
        }
        if let Some(v) = get("OPENWEATHER_API_KEY") {
            self.openweather.api_key = Some(v);
        }
        if let Some(v) = get("WEATHER_WIDGET_OPENWEATHER_URL") {
            self.openweather.base_url = v;
        }
        if let Some(v) = get("WEATHER_WIDGET_NOMINATIM_URL") {
            self.nominatim.base_url = v;
        }
        if let Some(v) = get("WEATHER_WIDGET_USER_AGENT") {
            self.nominatim.user_agent = v;
        }
        if let Some(v) = get("WEATHER_WIDGET_BIND") {
            self.server.bind_address = v;
        }
        if let Some(v) = get("WEATHER_WIDGET_LOG") {
            self.server.log_level = v;
        }
        if let Some(v) = get("WEATHER_WIDGET_LOG_JSON") {
            self.server.log_json = v == "1" || v.eq_ignore_ascii_case("true");
        }

        self
    }

    /// Returns the OpenWeather API key, or an error explaining how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.openweather
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: set OPENWEATHER_API_KEY or add `api_key` under [openweather] in the config file."
                )
            })
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
