use clap::{Parser, Subcommand, ValueEnum};
use prd_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prd")]
#[command(
    version,
    about = "PRD Crawler - Map and fetch prototype-hosted requirement documents",
    long_about = "PRD Crawler\n\nModes:\n- crawl: recover the page tree from data/document.js and fetch every page.\n- page: fetch the single page an entry URL points at.\n- fetch: pick crawl or page from a free-text prompt.\n\nEntry URLs may use the #p=<page> fragment form. Use --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML); defaults to $PRD_CONFIG or ~/.config/prd/config.toml. CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, global = true, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value = "1920x1080",
        help = "Screenshot viewport (WIDTHxHEIGHT)"
    )]
    pub viewport: Viewport,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "screenshots",
        help = "Directory screenshots are written to; created if missing"
    )]
    pub screenshots_dir: PathBuf,

    #[arg(long, global = true, help = "Skip headless rendering entirely")]
    pub no_screenshots: bool,

    #[arg(
        long,
        global = true,
        value_name = "SECS",
        default_value = "30",
        help = "HTTP request and page navigation timeout (seconds)"
    )]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl the whole site the entry URL belongs to
    Crawl {
        #[arg(long, help = "Entry URL (e.g. https://host/prd/#id=abc&p=Home)")]
        url: String,
    },

    /// Fetch the single page an entry URL points at
    Page {
        #[arg(long, help = "Entry URL (e.g. https://host/prd/#p=Home)")]
        url: String,
    },

    /// Crawl or fetch one page depending on the prompt
    Fetch {
        #[arg(long, help = "Entry URL")]
        url: String,

        #[arg(
            long,
            help = "Free-text request; mentioning 全部, 所有 or 整体 crawls the whole site"
        )]
        prompt: String,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
