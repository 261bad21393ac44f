//! Shared rendering session management.
//!
//! One browser process serves every capture of a crawl. It is launched on the
//! first [`SessionManager::acquire`] and lives until [`SessionManager::close`].
//! Captures hold a read lock on the session; closing takes the write lock, so
//! a close waits for in-flight captures instead of pulling the browser out
//! from under them.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock, Semaphore};
use tracing::{debug, info};

use super::capture::persist_screenshot;
use super::chromium::ChromiumEngine;
use super::{CaptureSettings, RenderEngine, RenderSession};
use crate::{PrdError, Result, Viewport};

/// Default timeout for page navigation.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for waiting for network idle state.
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of pages captured at once on the shared browser.
pub const DEFAULT_MAX_CONCURRENT_CAPTURES: usize = 4;

/// Configuration options for screenshot capture.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Directory screenshots are written to (created on demand).
    pub screenshots_dir: PathBuf,
    /// Viewport set on every page before capture.
    pub viewport: Viewport,
    /// Timeout for page navigation.
    pub navigation_timeout: Duration,
    /// Upper bound on waiting for the network to go quiet.
    pub network_idle_timeout: Duration,
    /// Maximum number of pages rendered at the same time.
    pub max_concurrent_captures: usize,
    /// Explicit browser binary; auto-detected when unset.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            screenshots_dir: PathBuf::from("screenshots"),
            viewport: Viewport::default(),
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            max_concurrent_captures: DEFAULT_MAX_CONCURRENT_CAPTURES,
            chrome_executable: None,
        }
    }
}

impl CaptureOptions {
    fn settings(&self) -> CaptureSettings {
        CaptureSettings {
            viewport: self.viewport,
            navigation_timeout: self.navigation_timeout,
            network_idle_timeout: self.network_idle_timeout,
        }
    }
}

/// Handle to the live browser shared by all captures.
pub struct RenderingSession {
    generation: u64,
    inner: RwLock<Option<Box<dyn RenderSession>>>,
}

impl RenderingSession {
    /// Launch counter value of this session; a relaunch gets a new one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn is_open(&self) -> bool {
        self.inner.read().await.is_some()
    }

    async fn shutdown(&self) -> Result<()> {
        let mut guard = self.inner.write().await;
        match guard.take() {
            Some(mut live) => live.close().await,
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for RenderingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingSession")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the lazily launched [`RenderingSession`] and writes screenshots.
pub struct SessionManager {
    engine: Arc<dyn RenderEngine>,
    options: CaptureOptions,
    current: Mutex<Option<Arc<RenderingSession>>>,
    launches: AtomicU64,
    semaphore: Arc<Semaphore>,
}

impl SessionManager {
    pub fn new(engine: Arc<dyn RenderEngine>, options: CaptureOptions) -> Self {
        let permits = options.max_concurrent_captures.max(1);
        Self {
            engine,
            options,
            current: Mutex::new(None),
            launches: AtomicU64::new(0),
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Manager backed by a headless Chromium.
    pub fn chromium(options: CaptureOptions) -> Self {
        let engine = ChromiumEngine::new(options.chrome_executable.clone());
        Self::new(Arc::new(engine), options)
    }

    /// Return the live session, launching the browser if none is running.
    pub async fn acquire(&self) -> Result<Arc<RenderingSession>> {
        let mut current = self.current.lock().await;
        if let Some(session) = current.as_ref() {
            return Ok(Arc::clone(session));
        }

        let started = Instant::now();
        let live = self.engine.launch().await?;
        let generation = self.launches.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            generation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendering session started"
        );

        let session = Arc::new(RenderingSession {
            generation,
            inner: RwLock::new(Some(live)),
        });
        *current = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Render `url` and store it as `<label>_<timestamp>.png`.
    ///
    /// A failure here leaves the session open for later captures.
    pub async fn capture(
        &self,
        session: &RenderingSession,
        url: &str,
        label: &str,
    ) -> Result<PathBuf> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PrdError::render("Session manager unavailable"))?;

        let started = Instant::now();
        let png = {
            let guard = session.inner.read().await;
            let live = guard
                .as_ref()
                .ok_or_else(|| PrdError::render("rendering session is closed"))?;
            live.screenshot(url, &self.options.settings()).await?
        };

        let path = persist_screenshot(&self.options.screenshots_dir, label, &png)?;
        debug!(
            %url,
            path = %path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "screenshot captured"
        );
        Ok(path)
    }

    /// Shut the live session down. Closing an already closed manager is a no-op.
    pub async fn close(&self) -> Result<()> {
        let session = self.current.lock().await.take();
        match session {
            Some(session) => {
                session.shutdown().await?;
                info!(generation = session.generation, "rendering session closed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Whether a session is currently live.
    pub async fn is_running(&self) -> bool {
        self.current.lock().await.is_some()
    }

    /// How many times a browser has been launched by this manager.
    pub fn launch_count(&self) -> u64 {
        self.launches.load(Ordering::SeqCst)
    }
}
