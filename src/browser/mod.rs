//! Headless rendering for page screenshots.
//!
//! # Module Structure
//!
//! - [`session`] - the shared, lazily launched rendering session and its manager
//! - [`chromium`] - Chromium engine via chromiumoxide
//! - [`capture`] - screenshot file naming and persistence
//!
//! The engine is reached through the [`RenderEngine`] / [`RenderSession`]
//! traits so the walker can be exercised without a browser installed.
//!
//! # Example
//!
//! ```no_run
//! use prd_lib::{CaptureOptions, SessionManager};
//!
//! # async fn example() -> prd_lib::Result<()> {
//! let manager = SessionManager::chromium(CaptureOptions::default());
//! let session = manager.acquire().await?;
//! let path = manager.capture(&session, "https://example.com/doc/Home.html", "Home").await?;
//! println!("Screenshot saved to {}", path.display());
//! manager.close().await?;
//! # Ok(())
//! # }
//! ```

mod capture;
mod chromium;
mod session;

use async_trait::async_trait;

use crate::{Result, Viewport};

pub use capture::{persist_screenshot, safe_file_name, screenshot_timestamp};
pub use chromium::{ChromiumEngine, CHROMIUM_PATH_ENV};
pub use session::{
    CaptureOptions, RenderingSession, SessionManager, DEFAULT_MAX_CONCURRENT_CAPTURES,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
};

#[cfg(test)]
pub(crate) use session::testing;

/// Per-capture settings handed to the engine.
#[derive(Debug, Clone, Copy)]
pub struct CaptureSettings {
    pub viewport: Viewport,
    pub navigation_timeout: std::time::Duration,
    pub network_idle_timeout: std::time::Duration,
}

/// A browser engine that can launch a rendering session.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderSession>>;
}

/// A live browser process.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Open a fresh page on `url`, wait for the network to settle, and return
    /// a full-page PNG.
    async fn screenshot(&self, url: &str, settings: &CaptureSettings) -> Result<Vec<u8>>;
    /// Shut the browser down.
    async fn close(&mut self) -> Result<()>;
}
