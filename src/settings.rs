use std::path::{Path, PathBuf};
use std::time::Duration;

use prd_lib::{Config, PrdError, Viewport};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct FlagSources {
    pub viewport: bool,
    pub screenshots_dir: bool,
    pub no_screenshots: bool,
    pub timeout: bool,
}

impl FlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            viewport: flag_present(args, "--viewport"),
            screenshots_dir: flag_present(args, "--screenshots-dir"),
            no_screenshots: flag_present(args, "--no-screenshots"),
            timeout: flag_present(args, "--timeout"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Capture-related values as given on the command line.
#[derive(Debug, Clone)]
pub struct CliOverrides {
    pub viewport: Viewport,
    pub screenshots_dir: PathBuf,
    pub no_screenshots: bool,
    pub timeout_secs: u64,
}

/// Merge CLI arguments into the config, preferring CLI when flags are present.
pub fn apply_overrides(mut config: Config, cli: &CliOverrides, flags: &FlagSources) -> Config {
    if flags.viewport {
        config.viewport = cli.viewport;
    }
    if flags.screenshots_dir {
        config.screenshots_dir = cli.screenshots_dir.clone();
    }
    if flags.no_screenshots && cli.no_screenshots {
        config.screenshots = false;
    }
    if flags.timeout {
        let timeout = Duration::from_secs(cli.timeout_secs);
        config.timeouts.request = timeout;
        config.timeouts.navigation = timeout;
    }
    config
}

/// Load config from a TOML file, `$PRD_CONFIG`, the central config, or return defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, PrdError> {
    Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| std::env::var(prd_lib::config::CONFIG_ENV).ok())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        PrdError::Config(format!("Failed to read config {}: {}", loc, e))
    })
}

/// Validate the merged settings.
pub fn validate_config(config: &Config, source: Option<&Path>) -> Result<(), PrdError> {
    config.validate().map_err(|e| {
        let message = match e {
            PrdError::Config(msg) => msg,
            other => other.to_string(),
        };
        match source {
            Some(p) => PrdError::Config(format!("Invalid config ({}): {}", p.display(), message)),
            None => PrdError::Config(format!("Invalid config: {}", message)),
        }
    })
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let screenshots = if config.screenshots {
        format!(
            "{} (viewport={}, max_concurrent={})",
            config.screenshots_dir.display(),
            config.viewport,
            config.max_concurrent_captures
        )
    } else {
        "off".to_string()
    };
    format!(
        "Effective config [{source}]: screenshots={screenshots}, timeouts: request={}s, nav={}s, network-idle={}s",
        config.timeouts.request.as_secs(),
        config.timeouts.navigation.as_secs(),
        config.timeouts.network_idle.as_secs(),
    )
}
