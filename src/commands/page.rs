use std::path::PathBuf;
use std::process::ExitCode;

use prd_lib::{PrdCrawler, PrdError};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for_fetch, render_error, write_output, CliOutput};

/// Run the page command.
pub async fn run_page(
    crawler: &PrdCrawler,
    url: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let page = crawler.fetch_page(url).await;
    let fetched = !page.is_failure();

    if let Err(err) = write_output(&CliOutput::Page(page), format, output.clone()) {
        return render_error(PrdError::Config(err.to_string()), format, output);
    }
    exit_code_for_fetch(fetched)
}
