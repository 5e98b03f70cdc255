//! Mock automation client for testing
//!
//! In-memory [`AutomationClient`] and [`Element`] whose observable state is set by
//! the test and whose element lookups can be scripted call by call.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::locator::Locator;
use super::traits::{AutomationClient, Element, ElementHandle};
use crate::{Error, Result};

/// Minimal PNG payload returned by default screenshots
pub const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE,
];

/// Outcome of one scripted element lookup
#[derive(Debug, Clone)]
pub enum Lookup {
    /// No element matches
    Missing,
    /// Lookup yields this element
    Found(Arc<MockElement>),
    /// Lookup raced a re-render
    Stale,
    /// Lookup fails with a non-transient error
    Fail(String),
}

/// Screenshot behavior of the mock client
#[derive(Debug, Clone)]
pub enum ScreenshotBehavior {
    Png(Vec<u8>),
    Unsupported,
    Fail(String),
}

/// Mock automation client
#[derive(Debug)]
pub struct MockClient {
    base_url: String,
    url: RwLock<String>,
    content: RwLock<String>,
    source_failure: RwLock<Option<String>>,
    redirects: RwLock<HashMap<String, String>>,
    lookups: RwLock<HashMap<Locator, VecDeque<Lookup>>>,
    lookup_counts: RwLock<HashMap<Locator, usize>>,
    navigations: RwLock<Vec<String>>,
    screenshot: RwLock<ScreenshotBehavior>,
    url_reads: AtomicUsize,
    source_reads: AtomicUsize,
}

impl MockClient {
    /// Create a new mock client on `about:blank`
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            url: RwLock::new("about:blank".to_string()),
            content: RwLock::new(String::new()),
            source_failure: RwLock::new(None),
            redirects: RwLock::new(HashMap::new()),
            lookups: RwLock::new(HashMap::new()),
            lookup_counts: RwLock::new(HashMap::new()),
            navigations: RwLock::new(Vec::new()),
            screenshot: RwLock::new(ScreenshotBehavior::Png(MOCK_PNG.to_vec())),
            url_reads: AtomicUsize::new(0),
            source_reads: AtomicUsize::new(0),
        }
    }

    /// Set URL (for testing)
    pub async fn set_url<S: Into<String>>(&self, url: S) {
        *self.url.write().await = url.into();
    }

    /// Set page source (for testing)
    pub async fn set_page_source<S: Into<String>>(&self, html: S) {
        *self.content.write().await = html.into();
    }

    /// Make page source reads fail (`Some`) or succeed again (`None`)
    pub async fn fail_page_source(&self, failure: Option<String>) {
        *self.source_failure.write().await = failure;
    }

    /// Make navigation to `path` land on `landing_url` instead
    pub async fn redirect<S: Into<String>, T: Into<String>>(&self, path: S, landing_url: T) {
        self.redirects
            .write()
            .await
            .insert(path.into(), landing_url.into());
    }

    /// Register an element that every lookup of `locator` finds
    pub async fn add_element(&self, locator: Locator, element: Arc<MockElement>) {
        self.script_lookups(locator, vec![Lookup::Found(element)])
            .await;
    }

    /// Make every lookup of `locator` come back empty
    pub async fn remove_element(&self, locator: &Locator) {
        self.lookups.write().await.remove(locator);
    }

    /// Script successive lookups of `locator`; the last entry repeats forever
    pub async fn script_lookups(&self, locator: Locator, script: Vec<Lookup>) {
        self.lookups
            .write()
            .await
            .insert(locator, script.into_iter().collect());
    }

    /// Set how screenshots behave
    pub async fn set_screenshot(&self, behavior: ScreenshotBehavior) {
        *self.screenshot.write().await = behavior;
    }

    /// Paths passed to `navigate_to`, in order
    pub async fn navigations(&self) -> Vec<String> {
        self.navigations.read().await.clone()
    }

    /// Number of lookups made for `locator`
    pub async fn lookup_count(&self, locator: &Locator) -> usize {
        self.lookup_counts
            .read()
            .await
            .get(locator)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `current_url` calls so far
    pub fn url_reads(&self) -> usize {
        self.url_reads.load(Ordering::SeqCst)
    }

    /// Number of `page_source` calls so far
    pub fn source_reads(&self) -> usize {
        self.source_reads.load(Ordering::SeqCst)
    }

    fn resolve(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("https://app.test")
    }
}

#[async_trait]
impl AutomationClient for MockClient {
    async fn navigate_to(&self, path: &str) -> Result<()> {
        self.navigations.write().await.push(path.to_string());

        let landing = match self.redirects.read().await.get(path) {
            Some(target) => target.clone(),
            None => self.resolve(path),
        };
        *self.url.write().await = landing;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.url_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.url.read().await.clone())
    }

    async fn page_source(&self) -> Result<String> {
        self.source_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &*self.source_failure.read().await {
            return Err(Error::cdp(msg.clone()));
        }
        Ok(self.content.read().await.clone())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
        *self
            .lookup_counts
            .write()
            .await
            .entry(locator.clone())
            .or_insert(0) += 1;

        let mut lookups = self.lookups.write().await;
        let next = match lookups.get_mut(locator) {
            Some(script) if script.len() > 1 => script.pop_front(),
            Some(script) => script.front().cloned(),
            None => None,
        };

        match next {
            None | Some(Lookup::Missing) => Ok(None),
            Some(Lookup::Found(element)) => Ok(Some(element as ElementHandle)),
            Some(Lookup::Stale) => Err(Error::stale(format!(
                "{} was re-rendered during lookup",
                locator
            ))),
            Some(Lookup::Fail(msg)) => Err(Error::cdp(msg)),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        match &*self.screenshot.read().await {
            ScreenshotBehavior::Png(bytes) => Ok(bytes.clone()),
            ScreenshotBehavior::Unsupported => {
                Err(Error::ScreenshotUnsupported("mock client".to_string()))
            }
            ScreenshotBehavior::Fail(msg) => Err(Error::cdp(msg.clone())),
        }
    }
}

/// Mock element reference
#[derive(Debug)]
pub struct MockElement {
    locator: Locator,
    text: String,
    options: Vec<String>,
    displayed: AtomicBool,
    enabled: AtomicBool,
    stale: AtomicBool,
    value: RwLock<String>,
    selected: RwLock<Option<usize>>,
    submits: AtomicUsize,
    clicks: AtomicUsize,
}

impl MockElement {
    /// Create a displayed, enabled element
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            options: Vec::new(),
            displayed: AtomicBool::new(true),
            enabled: AtomicBool::new(true),
            stale: AtomicBool::new(false),
            value: RwLock::new(String::new()),
            selected: RwLock::new(None),
            submits: AtomicUsize::new(0),
            clicks: AtomicUsize::new(0),
        }
    }

    /// Give the element visible text
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    /// Turn the element into a `<select>` with these option labels
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Start with a pre-filled value
    pub fn with_value<S: Into<String>>(self, value: S) -> Self {
        Self {
            value: RwLock::new(value.into()),
            ..self
        }
    }

    /// Start hidden
    pub fn hidden(self) -> Self {
        self.displayed.store(false, Ordering::SeqCst);
        self
    }

    /// Start disabled
    pub fn disabled(self) -> Self {
        self.enabled.store(false, Ordering::SeqCst);
        self
    }

    pub fn set_displayed(&self, displayed: bool) {
        self.displayed.store(displayed, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Detach the node; every later operation reports a stale reference
    pub fn mark_stale(&self) {
        self.stale.store(true, Ordering::SeqCst);
    }

    /// Current value
    pub async fn value(&self) -> String {
        self.value.read().await.clone()
    }

    /// Label of the selected option
    pub async fn selected_text(&self) -> Option<String> {
        let selected = *self.selected.read().await;
        selected.and_then(|i| self.options.get(i).cloned())
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    fn check_attached(&self) -> Result<()> {
        if self.stale.load(Ordering::SeqCst) {
            return Err(Error::stale(format!(
                "{} is no longer attached to the DOM",
                self.locator
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Element for MockElement {
    fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn clear(&self) -> Result<()> {
        self.check_attached()?;
        self.value.write().await.clear();
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.check_attached()?;
        self.value.write().await.push_str(text);
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        self.check_attached()?;
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.check_attached()?;
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        self.check_attached()?;
        Ok(self.text.clone())
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.check_attached()?;
        Ok(self.displayed.load(Ordering::SeqCst))
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.check_attached()?;
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn options(&self) -> Result<Vec<String>> {
        self.check_attached()?;
        Ok(self.options.clone())
    }

    async fn select_by_index(&self, index: usize) -> Result<()> {
        self.check_attached()?;
        if index >= self.options.len() {
            return Err(Error::OptionNotFound {
                text: format!("#{}", index),
                available: self.options.clone(),
            });
        }
        *self.selected.write().await = Some(index);
        Ok(())
    }
}
