use crate::constants::*;
use crate::error::{Result, ScraperError};
use crate::types::Category;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub site: SiteSettings,
    pub timing: TimingSettings,
    pub snapshot: SnapshotSettings,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub login_url: String,
    pub webdriver_url: String,
    pub headless: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub login_timeout_ms: u64,
    pub container_timeout_ms: u64,
    pub settle_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    pub primary: PathBuf,
    pub dashboard: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site: SiteSettings::default(),
            timing: TimingSettings::default(),
            snapshot: SnapshotSettings::default(),
            categories: Category::defaults(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            login_url: LOGIN_URL.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            login_timeout_ms: LOGIN_TIMEOUT_MS,
            container_timeout_ms: CONTAINER_TIMEOUT_MS,
            settle_ms: SETTLE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }
}

impl TimingSettings {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }

    pub fn container_timeout(&self) -> Duration {
        Duration::from_millis(self.container_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            primary: PathBuf::from(PRIMARY_SNAPSHOT_PATH),
            dashboard: PathBuf::from(DASHBOARD_SNAPSHOT_PATH),
        }
    }
}

impl SnapshotSettings {
    /// Every path the combined snapshot is written to, primary first.
    pub fn destinations(&self) -> Vec<PathBuf> {
        vec![self.primary.clone(), self.dashboard.clone()]
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file yields defaults; a file
    /// that exists but cannot be read or parsed is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Configuration(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)
            .map_err(|e| ScraperError::Configuration(format!("Invalid config: {}", e)))?;
        if settings.categories.is_empty() {
            return Err(ScraperError::Configuration("at least one category is required".into()));
        }
        Ok(settings)
    }

    /// Applies process environment overrides on top of file settings.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_WEBDRIVER_URL) {
            if !url.trim().is_empty() {
                self.site.webdriver_url = url.trim().to_string();
            }
        }
        self
    }
}

/// Site login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub member_id: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("member_id", &self.member_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves both credential variables through `lookup`; blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        match (read(ENV_MEMBER_ID), read(ENV_PASSWORD)) {
            (Some(member_id), Some(password)) => Ok(Self { member_id, password }),
            (id, pass) => {
                let missing: Vec<&str> = [(ENV_MEMBER_ID, id.is_none()), (ENV_PASSWORD, pass.is_none())]
                    .iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| *name)
                    .collect();
                Err(ScraperError::Configuration(format!(
                    "{} environment variable(s) required",
                    missing.join(" and ")
                )))
            }
        }
    }
}
