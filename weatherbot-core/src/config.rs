use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_ALERT_CITY: &str = "Fairfax";
pub const DEFAULT_ALERT_INTERVAL_HOURS: u64 = 24;

/// Daily alert settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub city: String,
    pub interval_hours: u64,

    /// Discord-compatible incoming webhook; alerts go to stdout when unset.
    pub webhook_url: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            city: DEFAULT_ALERT_CITY.to_string(),
            interval_hours: DEFAULT_ALERT_INTERVAL_HOURS,
            webhook_url: None,
        }
    }
}

impl AlertConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.max(1) * 60 * 60)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// owner_id = 1234
///
/// [alert]
/// city = "Fairfax"
/// webhook_url = "https://discord.com/api/webhooks/..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Overrides the OpenWeather endpoint, e.g. for a local proxy.
    pub base_url: Option<String>,

    /// The only user allowed to shut the bot down.
    pub owner_id: Option<u64>,

    pub alert: AlertConfig,
}

impl Config {
    /// API key, or an error telling the user how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weatherbot configure` or set WEATHER_API_KEY."
                )
            })
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Load config from disk (empty default if absent), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Load only what is on disk, ignoring the environment.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay values from the environment; `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("WEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(owner) = lookup("BOT_OWNER_ID") {
            let id = owner
                .trim()
                .parse()
                .with_context(|| format!("BOT_OWNER_ID must be a numeric user id, got '{owner}'"))?;
            self.owner_id = Some(id);
        }
        if let Some(city) = lookup("ALERT_CITY") {
            self.alert.city = city;
        }
        if let Some(url) = lookup("ALERT_WEBHOOK_URL") {
            self.alert.webhook_url = Some(url);
        }
        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherbot", "weatherbot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
