//! Page trait
//!
//! Concrete pages supply their path, the shared automation client and a
//! [`Waiter`]; every navigation, assertion and interaction below comes for free
//! and routes its waiting through that waiter.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::diagnostics::page_source_snapshot;
use crate::driver::{AutomationClient, ElementHandle, Locator};
use crate::wait::{element_clickable, page_contains_text, url_contains, Condition, Waiter};
use crate::{Error, Result};

/// A page of the application under test
#[async_trait]
pub trait Page: Send + Sync {
    /// Canonical path of the page, e.g. `/login`
    fn path(&self) -> &str;

    /// Automation client shared by every page of the session
    fn client(&self) -> &Arc<dyn AutomationClient>;

    /// Waiter used for every wait issued through this page
    fn waiter(&self) -> &Waiter;

    /// Timeout applied to every wait
    fn timeout(&self) -> Duration {
        self.waiter().timeout()
    }

    /// Block until `condition` holds, with this page's timeout
    async fn wait_until<C>(&self, condition: C) -> Result<C::Output>
    where
        C: Condition + 'static,
    {
        self.waiter()
            .wait_until(self.client().as_ref(), &condition)
            .await
    }

    /// Navigate to this page and wait until the URL reflects it
    #[instrument(skip(self), fields(path = %self.path()))]
    async fn go_to_and_wait(&self) -> Result<()> {
        info!("Navigating to {}", self.path());
        self.client().navigate_to(self.path()).await?;
        self.ensure_is_current().await
    }

    /// Wait until the browser is on this page, without navigating
    async fn ensure_is_current(&self) -> Result<()> {
        let url = self.wait_until(url_contains(self.path())).await?;
        debug!("On {} at {}", self.path(), url);
        Ok(())
    }

    /// Wait until the page contains `text`
    ///
    /// Never returns `Ok(false)`: a timeout is an `Error::WaitTimeout`. Use
    /// [`Page::text_appears`] for a boolean answer.
    #[instrument(skip(self), fields(path = %self.path()))]
    async fn is_text_present(&self, text: &str) -> Result<bool> {
        self.wait_until(page_contains_text(text)).await?;
        Ok(true)
    }

    /// Whether the page comes to contain `text` within the timeout
    async fn text_appears(&self, text: &str) -> Result<bool> {
        let outcome = self
            .waiter()
            .poll_until(self.client().as_ref(), &page_contains_text(text))
            .await?;
        Ok(outcome.is_satisfied())
    }

    /// Look up an element immediately, without waiting
    #[instrument(skip(self, locator), fields(path = %self.path(), locator = %locator))]
    async fn locate(&self, locator: &Locator) -> Result<ElementHandle> {
        match self.client().find_element(locator).await? {
            Some(element) => Ok(element),
            None => Err(Error::ElementNotFound {
                locator: locator.to_string(),
                page_source: page_source_snapshot(self.client().as_ref()).await,
            }),
        }
    }

    /// Replace the element's value with `text`
    async fn set_text(&self, element: &ElementHandle, text: &str) -> Result<()> {
        element.clear().await?;
        element.send_keys(text).await
    }

    /// Submit the form `element` belongs to
    async fn submit(&self, element: &ElementHandle) -> Result<()> {
        element.submit().await
    }

    /// Wait for a dropdown to become clickable, then select the option labelled
    /// exactly `visible_text`
    #[instrument(skip(self, element), fields(path = %self.path(), locator = %element.locator()))]
    async fn select_dropdown_by_text(
        &self,
        element: &ElementHandle,
        visible_text: &str,
    ) -> Result<()> {
        let dropdown = self
            .wait_until(element_clickable(element.locator().clone()))
            .await?;

        let options = dropdown.options().await?;
        match options.iter().position(|option| option == visible_text) {
            Some(index) => dropdown.select_by_index(index).await,
            None => Err(Error::OptionNotFound {
                text: visible_text.to_string(),
                available: options,
            }),
        }
    }
}
