use std::path::PathBuf;
use std::process::ExitCode;

use prd_lib::{PrdCrawler, PrdError};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_fetch, render_error, write_output, CliOutput};

/// Run the crawl command.
pub async fn run_crawl(
    crawler: &PrdCrawler,
    url: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let report = crawler.crawl(url).await;
    let success = report.success;

    if let Err(err) = write_output(&CliOutput::Crawl(report), format, output.clone()) {
        return render_error(PrdError::Config(err.to_string()), format, output);
    }
    exit_code_for_fetch(success)
}
