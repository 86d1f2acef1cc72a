use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::{
    error::{Error, Result},
    forecast::DEFAULT_ENDPOINT,
};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";

/// The pollen API serves at most this many forecast days.
const MAX_DAYS: u32 = 5;

/// Where the forecast is taken for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Label used in the notification title.
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone that decides which day counts as "today".
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Tokyo Metropolitan Government Building
        Self {
            name: "東京".to_string(),
            latitude: 35.6762,
            longitude: 139.6503,
            timezone: "Asia/Tokyo".to_string(),
        }
    }
}

impl LocationConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::Config(format!("unknown timezone '{}'", self.timezone)))
    }
}

/// Optional settings file.
///
/// Example TOML:
/// days = 1
/// [location]
/// name = "東京"
/// latitude = 35.6762
/// longitude = 139.6503
/// timezone = "Asia/Tokyo"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub days: u32,
    /// Forecast lookup URL; only overridden against a stand-in server.
    pub endpoint: String,
    pub location: LocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            days: 1,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the platform config file if one exists.
    ///
    /// A missing default file yields the built-in Tokyo settings; a missing
    /// explicit file is an error.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let path = match path_override {
            Some(p) => p.to_path_buf(),
            None => match Self::config_file_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;

        Self::from_toml_str(&contents).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DAYS).contains(&self.days) {
            return Err(Error::Config(format!("days must be between 1 and {MAX_DAYS}, got {}", self.days)));
        }

        let loc = &self.location;
        if !(-90.0..=90.0).contains(&loc.latitude) {
            return Err(Error::Config(format!("latitude {} is out of range [-90, 90]", loc.latitude)));
        }
        if !(-180.0..=180.0).contains(&loc.longitude) {
            return Err(Error::Config(format!(
                "longitude {} is out of range [-180, 180]",
                loc.longitude
            )));
        }

        loc.tz().map(|_| ())
    }

    /// Path to the config file, if the platform has a config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "pollen-notify", "pollen-notify")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Secrets read from the process environment.
///
/// The API key is always required. The webhook URL is only demanded by
/// callers that actually post, through [`Credentials::webhook_url`].
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    webhook_url: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: require(&lookup, API_KEY_VAR)?,
            webhook_url: require(&lookup, WEBHOOK_URL_VAR).ok(),
        })
    }

    pub fn webhook_url(&self) -> Result<&str> {
        self.webhook_url
            .as_deref()
            .ok_or_else(|| Error::Config(format!("environment variable {WEBHOOK_URL_VAR} must be set")))
    }
}

/// Fetch a required setting; unset and blank values are both rejected.
fn require(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("environment variable {name} must be set")))
}
