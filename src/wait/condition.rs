//! Condition predicates
//!
//! A condition is a read-only check of automation client state that either
//! yields a value (satisfied) or `None` (not yet). Errors returned from
//! [`Condition::check`] are classified by the [`Waiter`](super::Waiter) as
//! transient (retry) or fatal (abort).

use async_trait::async_trait;
use std::fmt;

use crate::driver::{AutomationClient, ElementHandle, Locator};
use crate::Result;

/// Trait for wait conditions
#[async_trait]
pub trait Condition: Send + Sync {
    /// Value produced once the condition holds
    type Output: Send;

    /// Check the condition once; `Ok(None)` means not yet satisfied
    async fn check(&self, client: &dyn AutomationClient) -> Result<Option<Self::Output>>;

    /// Get description for error messages
    fn description(&self) -> String;
}

/// Satisfied when the current URL contains a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContains {
    fragment: String,
}

/// Current URL contains `fragment` (exact, case-sensitive substring)
pub fn url_contains<S: Into<String>>(fragment: S) -> UrlContains {
    UrlContains {
        fragment: fragment.into(),
    }
}

#[async_trait]
impl Condition for UrlContains {
    /// The matching URL
    type Output = String;

    async fn check(&self, client: &dyn AutomationClient) -> Result<Option<String>> {
        let url = client.current_url().await?;
        Ok(url.contains(&self.fragment).then_some(url))
    }

    fn description(&self) -> String {
        format!("url to contain {:?}", self.fragment)
    }
}

/// Satisfied when the page source contains a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContainsText {
    text: String,
}

/// Page source contains `text` (exact, case-sensitive substring)
pub fn page_contains_text<S: Into<String>>(text: S) -> PageContainsText {
    PageContainsText { text: text.into() }
}

#[async_trait]
impl Condition for PageContainsText {
    type Output = ();

    async fn check(&self, client: &dyn AutomationClient) -> Result<Option<()>> {
        let source = client.page_source().await?;
        Ok(source.contains(&self.text).then_some(()))
    }

    fn description(&self) -> String {
        format!("page to contain text {:?}", self.text)
    }
}

/// How ready an element has to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementReadiness {
    /// In the DOM
    Present,
    /// In the DOM and displayed
    Visible,
    /// Displayed and enabled
    Clickable,
}

impl fmt::Display for ElementReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementReadiness::Present => "present",
            ElementReadiness::Visible => "visible",
            ElementReadiness::Clickable => "clickable",
        })
    }
}

/// Satisfied by the first element matching a locator once it is ready enough
///
/// A lookup that finds nothing is "not yet", never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    locator: Locator,
    readiness: ElementReadiness,
}

impl ElementState {
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn readiness(&self) -> ElementReadiness {
        self.readiness
    }
}

/// An element matching `locator` exists, is displayed and is enabled
pub fn element_clickable(locator: Locator) -> ElementState {
    ElementState {
        locator,
        readiness: ElementReadiness::Clickable,
    }
}

/// An element matching `locator` exists and is displayed
pub fn element_visible(locator: Locator) -> ElementState {
    ElementState {
        locator,
        readiness: ElementReadiness::Visible,
    }
}

/// An element matching `locator` exists
pub fn element_present(locator: Locator) -> ElementState {
    ElementState {
        locator,
        readiness: ElementReadiness::Present,
    }
}

#[async_trait]
impl Condition for ElementState {
    type Output = ElementHandle;

    async fn check(&self, client: &dyn AutomationClient) -> Result<Option<ElementHandle>> {
        let element = match client.find_element(&self.locator).await? {
            Some(element) => element,
            None => return Ok(None),
        };

        let ready = match self.readiness {
            ElementReadiness::Present => true,
            ElementReadiness::Visible => element.is_displayed().await?,
            ElementReadiness::Clickable => {
                element.is_displayed().await? && element.is_enabled().await?
            }
        };

        Ok(ready.then_some(element))
    }

    fn description(&self) -> String {
        format!("element {} to be {}", self.locator, self.readiness)
    }
}
