//! Single-page retrieval.

use tracing::{info, warn};
use url::Url;

use crate::browser::SessionManager;
use crate::fetcher::PageSource;
use crate::normalize::normalize_html;
use crate::output::PageReport;
use crate::resolver::resolve_url;

/// Prefix of the `html` returned when the page could not be fetched.
pub const PRD_FETCH_FAILURE: &str = "Failed to fetch PRD content";

/// Label used for the screenshot when the entry URL names no page.
const FALLBACK_LABEL: &str = "page";

/// Fetch the page an entry URL points at and capture it when `sessions` is set.
///
/// Never fails: a fetch failure is reported in `html`, a rendering failure
/// as an empty `screenshot`.
pub async fn fetch_page(
    source: &dyn PageSource,
    sessions: Option<&SessionManager>,
    entry_url: &str,
) -> PageReport {
    let resolved = resolve_url(entry_url);
    info!(url = %resolved.canonical_url, page = %resolved.page_name, "fetching page");

    let target = match Url::parse(&resolved.canonical_url) {
        Ok(target) => target,
        Err(err) => {
            let err = crate::PrdError::from(err);
            warn!(url = %resolved.canonical_url, "{err}");
            return PageReport::failed(format!("{PRD_FETCH_FAILURE}: {err}"));
        }
    };

    let html = match source.fetch_text(&target).await {
        Ok(html) => normalize_html(&html),
        Err(err) => {
            warn!(url = %target, "page fetch failed: {err}");
            return PageReport::failed(format!("{PRD_FETCH_FAILURE}: {err}"));
        }
    };

    let Some(manager) = sessions else {
        return PageReport::new(html, String::new());
    };

    let label = if resolved.page_name.is_empty() {
        FALLBACK_LABEL
    } else {
        resolved.page_name.as_str()
    };
    let screenshot = match manager.acquire().await {
        Ok(session) => match manager.capture(&session, target.as_str(), label).await {
            Ok(path) => path.display().to_string(),
            Err(err) => {
                warn!(url = %target, "screenshot failed: {err}");
                String::new()
            }
        },
        Err(err) => {
            warn!("rendering session unavailable: {err}");
            String::new()
        }
    };

    PageReport::new(html, screenshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{fake_manager, FakeEngine};
    use crate::browser::CaptureOptions;
    use crate::{PrdError, Result};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OnePage;

    #[async_trait]
    impl PageSource for OnePage {
        async fn fetch_text(&self, url: &Url) -> Result<String> {
            match url.as_str() {
                "https://h.example/doc/Foo.html" => {
                    Ok("<html> <script>x()</script><p>Foo</p>\n</html>".to_string())
                }
                other => Err(PrdError::render(format!("unreachable {other}"))),
            }
        }
    }

    #[tokio::test]
    async fn resolves_fetches_and_normalizes() {
        let report = fetch_page(&OnePage, None, "https://h.example/doc/#id=abc&p=Foo").await;
        assert!(!report.is_failure());
        assert_eq!(report.html, "<html> <p>Foo</p> </html>");
        assert_eq!(report.screenshot, "");
    }

    #[tokio::test]
    async fn fetch_failure_skips_capture() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, _) = fake_manager(dir.path());

        let report = fetch_page(&OnePage, Some(&manager), "https://h.example/doc/#p=Bar").await;

        assert!(report.is_failure());
        assert!(report.html.starts_with("Failed to fetch PRD content: "));
        assert_eq!(report.screenshot, "");
        assert!(!manager.is_running().await);
    }

    #[tokio::test]
    async fn captures_with_page_name_label() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, _) = fake_manager(dir.path());

        let report = fetch_page(&OnePage, Some(&manager), "https://h.example/doc/#p=Foo").await;

        assert!(report.screenshot.contains("Foo_"), "{}", report.screenshot);
        assert!(std::path::Path::new(&report.screenshot).exists());
    }

    #[tokio::test]
    async fn launch_failure_keeps_html() {
        let manager = SessionManager::new(
            Arc::new(FakeEngine {
                fail_launch: true,
                ..FakeEngine::default()
            }),
            CaptureOptions::default(),
        );

        let report = fetch_page(&OnePage, Some(&manager), "https://h.example/doc/Foo.html").await;

        assert!(!report.is_failure());
        assert_eq!(report.html, "<html> <p>Foo</p> </html>");
        assert_eq!(report.screenshot, "");
    }

    #[tokio::test]
    async fn relative_input_is_a_fetch_failure() {
        let report = fetch_page(&OnePage, None, "doc/#p=Foo").await;
        assert!(report.is_failure());
        assert!(report.html.contains("Invalid URL"));
    }
}
