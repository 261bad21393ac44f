mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::{prepare_crawler, run_crawl, run_fetch, run_page};
use formatting::render_error;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "prd=debug,prd_lib=debug"
    } else {
        "prd=info,prd_lib=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    let format = args.format;
    let output = args.output.clone();

    let crawler = match prepare_crawler(&raw_args, &args) {
        Ok(crawler) => crawler,
        Err(err) => return render_error(err, format, output),
    };

    let command = async {
        match &args.command {
            Commands::Crawl { url } => run_crawl(&crawler, url, format, output.clone()).await,
            Commands::Page { url } => run_page(&crawler, url, format, output.clone()).await,
            Commands::Fetch { url, prompt } => {
                run_fetch(&crawler, url, prompt, format, output.clone()).await
            }
        }
    };

    let code = tokio::select! {
        code = command => code,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, shutting down");
            ExitCode::from(130)
        }
    };

    if let Err(err) = crawler.close().await {
        warn!("failed to close rendering session: {err}");
    } else {
        debug!("shutdown complete");
    }
    code
}
