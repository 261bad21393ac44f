//! PRD Crawler Library
//!
//! Maps and fetches product requirement documents published as exported
//! prototypes. The page hierarchy is recovered from the prototype's
//! `data/document.js`, every page is fetched and reduced to normalized
//! markup, and pages can optionally be captured with a headless browser.
//!
//! # Module Overview
//!
//! - [`resolver`] - Canonical page URLs from fragment-addressed links
//! - [`normalize`] - Script stripping and whitespace collapsing
//! - [`fetcher`] - HTTP page source
//! - [`sitemap`] - Site-map extraction from `data/document.js`
//! - [`walker`] - Concurrent site-map traversal
//! - [`browser`] - Shared headless rendering session and screenshots
//! - [`page`] - Single-page retrieval
//! - [`crawler`] - Entry points
//! - [`dispatch`] - Prompt-driven mode selection
//! - [`config`] - Configuration file support
//! - [`types`] - Site and content tree nodes
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use prd_lib::{Config, PrdCrawler};
//!
//! # async fn example() -> prd_lib::Result<()> {
//! let crawler = PrdCrawler::from_config(&Config::default())?;
//! let report = crawler.crawl("https://host.example/prd/#id=abc&p=Home").await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! crawler.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod crawler;
pub mod dispatch;
pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod output;
pub mod page;
pub mod resolver;
pub mod sitemap;
pub mod types;
pub mod viewport;
pub mod walker;

pub use browser::{
    CaptureOptions, ChromiumEngine, RenderEngine, RenderSession, RenderingSession,
    SessionManager, CHROMIUM_PATH_ENV, DEFAULT_MAX_CONCURRENT_CAPTURES,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
};
pub use config::Config;
pub use crawler::PrdCrawler;
pub use dispatch::{smart_fetch, FetchMode};
pub use error::{ErrorCategory, ErrorPayload, PrdError, Result};
pub use fetcher::{HttpFetcher, PageSource, DEFAULT_USER_AGENT};
pub use normalize::normalize_html;
pub use output::{CrawlReport, ErrorOutput, PageReport, ToolReply};
pub use resolver::{resolve_url, ResolvedUrl};
pub use sitemap::{load_site_map, parse_document_script, SiteMapError};
pub use types::{ContentNode, NodeKind, SiteNode};
pub use viewport::Viewport;
pub use walker::TreeWalker;
