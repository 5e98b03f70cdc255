//! CDP seams
//!
//! A [`CdpConnection`] moves raw commands over one target's WebSocket, a
//! [`CdpClient`] turns them into the typed calls the automation client needs,
//! and a [`CdpBrowser`] opens targets and attaches clients to them.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::Error;

/// Reply to one command, matched to it by `id`
#[derive(Debug, Clone)]
pub struct CdpResponse {
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<CdpError>,
}

/// Protocol-level failure reported by the browser
#[derive(Debug, Clone)]
pub struct CdpError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Command channel to a single target
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send `method` and wait for its reply; protocol errors become `Err`
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, Error>;

    async fn close(&self) -> Result<(), Error>;

    fn is_active(&self) -> bool;
}

/// Typed operations on one page target
#[async_trait]
pub trait CdpClient: Send + Sync + std::fmt::Debug {
    /// Load `url` and poll until the document is ready or polling gives up
    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error>;

    /// Run `script` in the page, returning its value by value
    ///
    /// Fails with `Error::NavigationInProgress` when a navigation replaced the
    /// context the script was sent to.
    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error>;

    /// PNG of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>, Error>;

    /// Serialized `documentElement`
    async fn get_content(&self) -> Result<String, Error>;

    async fn enable_domain(&self, domain: &str) -> Result<(), Error>;

    /// Escape hatch for commands without a typed wrapper
    async fn call_method(&self, method: &str, params: Value) -> Result<Value, Error>;
}

/// What `Page.navigate` reported
#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub loader_id: Option<String>,
    pub url: String,
    /// `document.readyState` reached "complete" before polling stopped
    pub is_loaded: bool,
}

/// Value produced by `Runtime.evaluate`
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    String(String),
    Number(f64),
    Bool(bool),
    /// `null` or `undefined`
    Null,
    /// Any other JSON-serializable value
    Object(Value),
}

/// Opens page targets and attaches clients to them
#[async_trait]
pub trait CdpBrowser: Send + Sync + std::fmt::Debug {
    /// Attach a client to the target at `target_url` (its WebSocket URL)
    async fn create_client(&self, target_url: &str) -> Result<Arc<dyn CdpClient>, Error>;

    /// Open a page target at `url`; returns its WebSocket URL
    async fn create_target(&self, url: &str) -> Result<String, Error>;

    /// Close every connection opened through [`CdpBrowser::create_client`]
    async fn close(&self) -> Result<(), Error>;
}
