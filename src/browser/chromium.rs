//! Chromium-based rendering using chromiumoxide.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CaptureSettings, RenderEngine, RenderSession};
use crate::{PrdError, Result};

/// Environment variable overriding the browser binary.
pub const CHROMIUM_PATH_ENV: &str = "PRD_CHROMIUM_PATH";

/// Resource count is considered settled once unchanged for this long.
const IDLE_WINDOW: Duration = Duration::from_millis(500);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_PROBE: &str =
    "document.readyState === 'complete' ? performance.getEntriesByType('resource').length : -1";

/// Flags passed on top of the builder's own headless defaults.
const LAUNCH_ARGS: [&str; 4] = [
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--hide-scrollbars",
];

/// Launches headless Chromium processes.
#[derive(Debug, Clone, Default)]
pub struct ChromiumEngine {
    executable: Option<PathBuf>,
}

impl ChromiumEngine {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder().new_headless_mode();
        for arg in LAUNCH_ARGS {
            builder = builder.arg(arg);
        }
        if let Some(path) = self.resolve_executable() {
            debug!(path = %path.display(), "using configured Chromium");
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| PrdError::render(format!("failed to build browser config: {e}")))
    }

    fn resolve_executable(&self) -> Option<PathBuf> {
        self.executable.clone().or_else(|| {
            std::env::var_os(CHROMIUM_PATH_ENV)
                .map(PathBuf::from)
                .filter(|path| path.exists())
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Box<dyn RenderSession>> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PrdError::render(format!("failed to launch Chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error: {e}");
                }
            }
        });

        Ok(Box::new(ChromiumSession { browser, handler }))
    }
}

/// A running Chromium process.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn screenshot(&self, url: &str, settings: &CaptureSettings) -> Result<Vec<u8>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PrdError::render(format!("failed to open page: {e}")))?;

        let result = render_page(&page, url, settings).await;

        if let Err(e) = page.close().await {
            debug!(%url, "failed to close page: {e}");
        }
        result
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| PrdError::render(format!("failed to close Chromium: {e}")));
        if let Err(e) = self.browser.wait().await {
            debug!("waiting for Chromium exit failed: {e}");
        }
        self.handler.abort();
        closed
    }
}

async fn render_page(page: &Page, url: &str, settings: &CaptureSettings) -> Result<Vec<u8>> {
    let nav_ms = settings.navigation_timeout.as_millis();
    match tokio::time::timeout(settings.navigation_timeout, page.goto(url)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => return Err(PrdError::render(format!("navigation failed: {e}"))),
        Err(_) => {
            return Err(PrdError::render(format!(
                "navigation timed out after {nav_ms}ms"
            )))
        }
    }

    wait_for_network_idle(page, settings.network_idle_timeout).await;

    page.execute(SetDeviceMetricsOverrideParams::new(
        i64::from(settings.viewport.width),
        i64::from(settings.viewport.height),
        1.0,
        false,
    ))
    .await
    .map_err(|e| PrdError::render(format!("failed to set viewport: {e}")))?;

    page.screenshot(
        ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build(),
    )
    .await
    .map_err(|e| PrdError::render(format!("screenshot failed: {e}")))
}

/// Poll until the document is complete and its resource count stops growing.
async fn wait_for_network_idle(page: &Page, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    let mut last_count: i64 = -1;
    let mut stable_since = Instant::now();

    loop {
        let count = match page.evaluate(IDLE_PROBE).await {
            Ok(result) => result.into_value::<i64>().unwrap_or(-1),
            Err(e) => {
                debug!("network idle probe failed: {e}");
                -1
            }
        };

        if count >= 0 && count == last_count {
            if stable_since.elapsed() >= IDLE_WINDOW {
                return;
            }
        } else {
            last_count = count;
            stable_since = Instant::now();
        }

        if Instant::now() >= deadline {
            warn!(
                timeout_ms = timeout.as_millis() as u64,
                "network did not go idle; capturing anyway"
            );
            return;
        }
        tokio::time::sleep(IDLE_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;

    #[test]
    fn explicit_executable_wins() {
        let engine = ChromiumEngine::new(Some(PathBuf::from("/opt/chrome/chrome")));
        assert_eq!(
            engine.resolve_executable(),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn launch_args_leave_headless_and_sandbox_to_the_builder() {
        assert!(LAUNCH_ARGS
            .iter()
            .all(|arg| !arg.starts_with("--headless") && *arg != "--no-sandbox"));
    }

    #[test]
    fn config_builds_with_explicit_executable() {
        let engine = ChromiumEngine::new(Some(PathBuf::from("/opt/chrome/chrome")));
        assert!(engine.browser_config().is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn captures_a_data_url() {
        let engine = ChromiumEngine::default();
        let mut session = engine.launch().await.expect("failed to launch");
        let settings = CaptureSettings {
            viewport: Viewport::default(),
            navigation_timeout: Duration::from_secs(10),
            network_idle_timeout: Duration::from_secs(2),
        };

        let png = session
            .screenshot("data:text/html,<h1>Hello</h1>", &settings)
            .await
            .expect("screenshot failed");
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

        session.close().await.expect("close failed");
    }
}
