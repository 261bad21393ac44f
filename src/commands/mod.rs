mod crawl;
mod fetch;
mod page;

use prd_lib::{PrdCrawler, PrdError};
use tracing::debug;

use crate::cli::Cli;
use crate::settings::{
    apply_overrides, format_effective_config, load_config, validate_config, CliOverrides,
    FlagSources,
};

pub use crawl::run_crawl;
pub use fetch::run_fetch;
pub use page::run_page;

/// Build the crawler from config plus explicitly given flags.
pub fn prepare_crawler(raw_args: &[String], cli: &Cli) -> Result<PrdCrawler, PrdError> {
    let config = load_config(cli.config.as_deref())?;
    let overrides = CliOverrides {
        viewport: cli.viewport,
        screenshots_dir: cli.screenshots_dir.clone(),
        no_screenshots: cli.no_screenshots,
        timeout_secs: cli.timeout,
    };
    let config = apply_overrides(config, &overrides, &FlagSources::from_args(raw_args));
    validate_config(&config, cli.config.as_deref())?;
    debug!("{}", format_effective_config(&config, cli.config.as_deref()));

    PrdCrawler::from_config(&config)
}
