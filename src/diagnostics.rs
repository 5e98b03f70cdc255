//! Failure diagnostics
//!
//! Page source snapshots for error messages, and best-effort screenshots.
//! Capturing diagnostics never raises: failures are logged and reported as
//! `None`.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::driver::AutomationClient;
use crate::{Error, Result};

/// Placeholder used when the page source cannot be read
pub const PAGE_SOURCE_UNAVAILABLE: &str = "<page source unavailable>";

/// Current page source, or a placeholder describing why it could not be read
pub async fn page_source_snapshot(client: &dyn AutomationClient) -> String {
    match client.page_source().await {
        Ok(source) => source,
        Err(e) => {
            warn!("Could not read page source for diagnostics: {}", e);
            format!("{} ({})", PAGE_SOURCE_UNAVAILABLE, e)
        }
    }
}

/// A screenshot written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Screenshot capture settings
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: PathBuf,
    on_failure: bool,
}

impl Diagnostics {
    /// Write screenshots into `dir`
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            on_failure: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.screenshot_dir).capture_on_failure_enabled(config.capture_screenshot_on_failure)
    }

    /// Toggle automatic capture in [`Diagnostics::capture_on_failure`]
    pub fn capture_on_failure_enabled(mut self, enabled: bool) -> Self {
        self.on_failure = enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a screenshot called `name` is written
    pub fn screenshot_path(&self, name: &str) -> PathBuf {
        let file_name: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.png", file_name))
    }

    /// Capture a PNG screenshot to `{dir}/{name}.png`
    pub async fn capture_screenshot(
        &self,
        client: &dyn AutomationClient,
        name: &str,
    ) -> Option<Screenshot> {
        match self.try_capture(client, name).await {
            Ok(screenshot) => {
                info!("Saved screenshot to {}", screenshot.path.display());
                Some(screenshot)
            }
            Err(Error::ScreenshotUnsupported(msg)) => {
                warn!("Screenshots are not supported by this client: {}", msg);
                None
            }
            Err(e) => {
                warn!("Failed to capture screenshot {:?}: {}", name, e);
                None
            }
        }
    }

    /// Capture a screenshot for a failed operation, if enabled
    pub async fn capture_on_failure(
        &self,
        client: &dyn AutomationClient,
        name: &str,
        error: &Error,
    ) -> Option<Screenshot> {
        if !self.on_failure {
            return None;
        }
        warn!("Capturing screenshot {:?} after failure: {}", name, error);
        self.capture_screenshot(client, name).await
    }

    async fn try_capture(&self, client: &dyn AutomationClient, name: &str) -> Result<Screenshot> {
        let bytes = client.screenshot().await?;
        let path = self.screenshot_path(name);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::DiagnosticCapture(format!("Cannot create {}: {}", self.dir.display(), e))
        })?;
        tokio::fs::write(&path, &bytes).await.map_err(|e| {
            Error::DiagnosticCapture(format!("Cannot write {}: {}", path.display(), e))
        })?;

        Ok(Screenshot { path, bytes })
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
