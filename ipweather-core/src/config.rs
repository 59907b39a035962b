use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::provider::{ipapi, ipify, openweather};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Sent in place of a missing API key; the provider answers it with 401.
pub const MISSING_API_KEY: &str = "null";

/// Base URLs of the three services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub ip_echo: String,
    pub geolocation: String,
    pub weather: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            ip_echo: ipify::DEFAULT_BASE_URL.to_string(),
            geolocation: ipapi::DEFAULT_BASE_URL.to_string(),
            weather: openweather::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [endpoints]
/// weather = "https://api.openweathermap.org/data/2.5/weather"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Config file (or defaults) with the `OPENWEATHER_API_KEY` override applied.
    pub fn load() -> Result<Self> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        Ok(Self::load_file()?.with_api_key_override(env_key))
    }

    /// The stored config only, ignoring the environment.
    pub fn load_file() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// A missing file is a first run and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .with_context(|| format!("Invalid config in {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent directory", path.display()))?;
        fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;

        let text = toml::to_string_pretty(self).context("Cannot encode config as TOML")?;
        fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))
    }

    /// `<platform config dir>/ipweather/config.toml`.
    pub fn config_file_path() -> Result<PathBuf> {
        ProjectDirs::from("dev", "ipweather", "ipweather")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow!("No config directory for this platform"))
    }

    /// Replace the API key when `key` holds a non-blank value (env var or CLI flag).
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The key to send, or the literal `"null"` when none is configured.
    pub fn api_key_or_null(&self) -> &str {
        self.api_key.as_deref().unwrap_or(MISSING_API_KEY)
    }
}
