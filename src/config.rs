use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::fetcher::DEFAULT_USER_AGENT;
use crate::{PrdError, Result, Viewport};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "PRD_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub user_agent: String,
    pub viewport: Viewport,
    pub screenshots: bool,
    pub screenshots_dir: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub max_concurrent_captures: usize,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub network_idle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            navigation: Duration::from_secs(30),
            network_idle: Duration::from_secs(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: Viewport::default(),
            screenshots: true,
            screenshots_dir: PathBuf::from("screenshots"),
            chrome_executable: None,
            max_concurrent_captures: 4,
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Load config with priority: explicit path > `$PRD_CONFIG` > central file > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&env_path));
        }
        match Self::central_config_path() {
            Some(central) if central.exists() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| PrdError::Config(e.to_string()))
    }

    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| home.join(".config").join("prd").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport
            .check()
            .map_err(|e| PrdError::Config(e.to_string()))?;
        if self.timeouts.request.is_zero()
            || self.timeouts.navigation.is_zero()
            || self.timeouts.network_idle.is_zero()
        {
            return Err(PrdError::Config(
                "timeout values must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_captures == 0 {
            return Err(PrdError::Config(
                "max_concurrent_captures must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(PrdError::Config("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}
