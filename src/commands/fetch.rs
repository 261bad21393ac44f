use std::path::PathBuf;
use std::process::ExitCode;

use prd_lib::{smart_fetch, FetchMode, PrdCrawler, PrdError};
use tracing::info;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output, CliOutput};

/// Run the fetch command: crawl or single page, chosen from the prompt.
pub async fn run_fetch(
    crawler: &PrdCrawler,
    url: &str,
    prompt: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    info!(mode = ?FetchMode::from_prompt(prompt), "smart fetch");
    let reply = match smart_fetch(crawler, url, prompt).await {
        Ok(reply) => reply,
        Err(err) => return render_error(err, format, output),
    };

    if let Err(err) = write_output(&CliOutput::Reply(reply), format, output.clone()) {
        return render_error(PrdError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
