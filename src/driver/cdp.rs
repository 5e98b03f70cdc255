//! CDP-backed automation client
//!
//! Implements [`AutomationClient`] and [`Element`] on top of a [`CdpClient`].

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use super::locator::Locator;
use super::scripts;
use super::traits::{AutomationClient, Element, ElementHandle};
use crate::cdp::{CdpClient, EvaluationResult};
use crate::{Error, Result};

/// Automation client driving one browser page over CDP
#[derive(Debug, Clone)]
pub struct CdpAutomationClient {
    client: Arc<dyn CdpClient>,
    base_url: Url,
}

impl CdpAutomationClient {
    /// Create a client; relative paths are resolved against `base_url`
    pub fn new(client: Arc<dyn CdpClient>, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::configuration(format!("Invalid base URL {:?}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    /// Resolve a page path to the URL to load
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::navigation_failed(format!("Cannot resolve {:?}: {}", path, e)))
    }

    async fn evaluate_string(&self, script: &str) -> Result<String> {
        match self.client.evaluate(script, false).await? {
            EvaluationResult::String(s) => Ok(s),
            other => Err(Error::script_execution_failed(format!(
                "Expected a string, got {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl AutomationClient for CdpAutomationClient {
    async fn navigate_to(&self, path: &str) -> Result<()> {
        let url = self.resolve(path)?;
        self.client.navigate(url.as_str()).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.evaluate_string("window.location.href").await
    }

    async fn page_source(&self) -> Result<String> {
        self.client.get_content().await
    }

    #[instrument(skip(self), fields(locator = %locator))]
    async fn find_element(&self, locator: &Locator) -> Result<Option<ElementHandle>> {
        let marker = Uuid::new_v4().to_string();
        let script = scripts::tag_element_script(locator, &marker);

        match self.client.evaluate(&script, false).await? {
            EvaluationResult::Null => Ok(None),
            EvaluationResult::String(marker) => {
                debug!("Found element with marker {}", marker);
                Ok(Some(Arc::new(CdpElement {
                    marker,
                    locator: locator.clone(),
                    client: Arc::clone(&self.client),
                }) as ElementHandle))
            }
            other => Err(Error::script_execution_failed(format!(
                "Unexpected lookup result for {}: {:?}",
                locator, other
            ))),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.client.screenshot().await
    }
}

/// Element handle resolved through its marker attribute
#[derive(Debug)]
pub struct CdpElement {
    marker: String,
    locator: Locator,
    client: Arc<dyn CdpClient>,
}

impl CdpElement {
    /// Evaluate an element script; `null` means the node is gone
    async fn run(&self, script: String) -> Result<EvaluationResult> {
        match self.client.evaluate(&script, false).await? {
            EvaluationResult::Null => Err(Error::stale(format!(
                "{} ({}) is no longer attached to the DOM",
                self.locator, self.marker
            ))),
            result => Ok(result),
        }
    }

    async fn run_bool(&self, script: String) -> Result<bool> {
        match self.run(script).await? {
            EvaluationResult::Bool(b) => Ok(b),
            other => Err(Error::script_execution_failed(format!(
                "Expected a boolean, got {:?}",
                other
            ))),
        }
    }

    async fn run_string(&self, script: String) -> Result<String> {
        match self.run(script).await? {
            EvaluationResult::String(s) => Ok(s),
            other => Err(Error::script_execution_failed(format!(
                "Expected a string, got {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl Element for CdpElement {
    fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn clear(&self) -> Result<()> {
        self.run(scripts::clear_script(&self.marker)).await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.run(scripts::focus_script(&self.marker)).await?;

        for ch in text.chars() {
            self.client
                .call_method(
                    "Input.dispatchKeyEvent",
                    json!({
                        "type": "char",
                        "text": ch.to_string(),
                    }),
                )
                .await?;
        }
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        match self.run_string(scripts::submit_script(&self.marker)).await?.as_str() {
            "submitted" => Ok(()),
            _ => Err(Error::script_execution_failed(format!(
                "{} is not inside a form",
                self.locator
            ))),
        }
    }

    async fn click(&self) -> Result<()> {
        self.run(scripts::click_script(&self.marker)).await?;
        Ok(())
    }

    async fn text(&self) -> Result<String> {
        self.run_string(scripts::text_script(&self.marker)).await
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.run_bool(scripts::is_displayed_script(&self.marker)).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.run_bool(scripts::is_enabled_script(&self.marker)).await
    }

    async fn options(&self) -> Result<Vec<String>> {
        let json = self.run_string(scripts::options_script(&self.marker)).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn select_by_index(&self, index: usize) -> Result<()> {
        match self
            .run_string(scripts::select_index_script(&self.marker, index))
            .await?
            .as_str()
        {
            "selected" => Ok(()),
            _ => Err(Error::OptionNotFound {
                text: format!("#{}", index),
                available: self.options().await?,
            }),
        }
    }
}
