//! Entry points tying resolution, site-map extraction and the walk together.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use url::Url;

use crate::browser::{CaptureOptions, SessionManager};
use crate::config::Config;
use crate::fetcher::{HttpFetcher, PageSource};
use crate::output::{CrawlReport, PageReport};
use crate::page;
use crate::resolver::resolve_url;
use crate::sitemap::load_site_map;
use crate::walker::TreeWalker;
use crate::Result;

/// Prefix of the error reported when the site map cannot be recovered.
pub const SITE_MAP_FAILURE: &str = "Failed to fetch or parse document.js";

/// Crawls PRD sites through one page source and an optional renderer.
pub struct PrdCrawler {
    source: Arc<dyn PageSource>,
    sessions: Option<Arc<SessionManager>>,
}

impl PrdCrawler {
    pub fn new(source: Arc<dyn PageSource>, sessions: Option<Arc<SessionManager>>) -> Self {
        Self { source, sessions }
    }

    /// HTTP crawler configured from `config`, rendering with Chromium when
    /// screenshots are enabled.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::with_options(&config.user_agent, config.timeouts.request)?;
        let sessions = config.screenshots.then(|| {
            Arc::new(SessionManager::chromium(CaptureOptions {
                screenshots_dir: config.screenshots_dir.clone(),
                viewport: config.viewport,
                navigation_timeout: config.timeouts.navigation,
                network_idle_timeout: config.timeouts.network_idle,
                max_concurrent_captures: config.max_concurrent_captures,
                chrome_executable: config.chrome_executable.clone(),
            }))
        });
        Ok(Self::new(Arc::new(fetcher), sessions))
    }

    pub fn sessions(&self) -> Option<&Arc<SessionManager>> {
        self.sessions.as_ref()
    }

    /// Walk the whole site the entry URL belongs to.
    ///
    /// Only a failure to recover the site map fails the crawl; page-level
    /// failures are recorded inside the tree.
    pub async fn crawl(&self, entry_url: &str) -> CrawlReport {
        let started = Instant::now();
        let resolved = resolve_url(entry_url);
        info!(url = %resolved.canonical_url, "crawl started");

        let base = match Url::parse(&resolved.canonical_url) {
            Ok(base) => base,
            Err(err) => {
                let err = crate::PrdError::from(err);
                warn!("{err}");
                return CrawlReport::failed(format!("{SITE_MAP_FAILURE}: {err}"));
            }
        };

        let nodes = match load_site_map(self.source.as_ref(), &base).await {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(url = %base, "site map unavailable: {err}");
                return CrawlReport::failed(format!("{SITE_MAP_FAILURE}: {err}"));
            }
        };

        let walker = TreeWalker::new(self.source.as_ref(), &base);
        let tree = match &self.sessions {
            Some(manager) => match manager.acquire().await {
                Ok(session) => walker.with_screenshots(manager, session).walk(&nodes).await,
                Err(err) => {
                    warn!("rendering session unavailable, continuing without screenshots: {err}");
                    walker.walk(&nodes).await
                }
            },
            None => walker.walk(&nodes).await,
        };

        let report = CrawlReport::ok(tree);
        info!(
            pages = report.page_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "crawl finished"
        );
        report
    }

    /// Fetch the single page the entry URL points at.
    pub async fn fetch_page(&self, entry_url: &str) -> PageReport {
        page::fetch_page(self.source.as_ref(), self.sessions.as_deref(), entry_url).await
    }

    /// Close the rendering session, if one was started.
    pub async fn close(&self) -> Result<()> {
        match &self.sessions {
            Some(manager) => manager.close().await,
            None => Ok(()),
        }
    }
}
