//! Automation client traits
//!
//! The browser handle consumed by the wait engine and page objects. Implementations
//! live in [`super::cdp`] (a real browser over CDP) and [`super::mock`] (tests).

use async_trait::async_trait;
use std::sync::Arc;

use super::locator::Locator;
use crate::Result;

/// Shared handle to a live DOM node
pub type ElementHandle = Arc<dyn Element>;

/// Browser session handle
///
/// One instance is shared by all page objects of a test session; its lifecycle
/// belongs to the test harness.
#[async_trait]
pub trait AutomationClient: Send + Sync + std::fmt::Debug {
    /// Navigate to a path or absolute URL
    async fn navigate_to(&self, path: &str) -> Result<()>;

    /// Current URL of the page
    async fn current_url(&self) -> Result<String>;

    /// Full page source
    async fn page_source(&self) -> Result<String>;

    /// Look up the first element matching `locator`; `Ok(None)` when absent
    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>>;

    /// Capture a PNG screenshot; fails with `ScreenshotUnsupported` where unavailable
    async fn screenshot(&self) -> Result<Vec<u8>>;
}

/// Element reference trait
///
/// Any operation may fail with `Error::StaleElementReference` once the node has
/// been removed from the DOM.
#[async_trait]
pub trait Element: Send + Sync + std::fmt::Debug {
    /// Locator this element was found with
    fn locator(&self) -> &Locator;

    /// Clear the element's value
    async fn clear(&self) -> Result<()>;

    /// Type text into the element
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Submit the form the element belongs to
    async fn submit(&self) -> Result<()>;

    /// Click the element
    async fn click(&self) -> Result<()>;

    /// Visible text of the element
    async fn text(&self) -> Result<String>;

    /// Check if element is displayed
    async fn is_displayed(&self) -> Result<bool>;

    /// Check if element is enabled
    async fn is_enabled(&self) -> Result<bool>;

    /// Visible labels of a `<select>` element's options, in document order
    async fn options(&self) -> Result<Vec<String>>;

    /// Select the option at `index` of a `<select>` element
    async fn select_by_index(&self, index: usize) -> Result<()>;
}
