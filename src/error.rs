//! Unified error types for Chaser-Pages

use std::time::Duration;
use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Chaser-Pages
#[derive(Error, Debug)]
pub enum Error {
    /// A wait deadline elapsed without the condition being observed
    #[error("Timed out after {timeout:?} waiting for {condition}\n--- page source at timeout ---\n{page_source}")]
    WaitTimeout {
        condition: String,
        timeout: Duration,
        page_source: String,
    },

    /// Element reference invalidated by a DOM mutation
    #[error("Stale element reference: {0}")]
    StaleElementReference(String),

    /// The page's script context was replaced by a navigation mid-command
    #[error("Navigation in progress: {0}")]
    NavigationInProgress(String),

    /// Immediate element lookup failed
    #[error("Element not found: {locator}\n--- page source at lookup ---\n{page_source}")]
    ElementNotFound {
        locator: String,
        page_source: String,
    },

    /// Dropdown has no option with the requested visible text
    #[error("Option not found: {text:?} (available: {available:?})")]
    OptionNotFound {
        text: String,
        available: Vec<String>,
    },

    /// The automation client cannot take screenshots
    #[error("Screenshot unsupported: {0}")]
    ScreenshotUnsupported(String),

    /// Screenshot capture or persistence failed
    #[error("Diagnostic capture failed: {0}")]
    DiagnosticCapture(String),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single CDP command exceeded its deadline
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new stale element reference error
    pub fn stale<S: Into<String>>(msg: S) -> Self {
        Error::StaleElementReference(msg.into())
    }

    /// Create a new navigation-in-progress error
    pub fn navigation_in_progress<S: Into<String>>(msg: S) -> Self {
        Error::NavigationInProgress(msg.into())
    }

    /// Create a new WebSocket error
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    /// Create a new CDP error
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new navigation failed error
    pub fn navigation_failed<S: Into<String>>(msg: S) -> Self {
        Error::NavigationFailed(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Whether a poll that failed with this error should simply be retried.
    ///
    /// Stale element references and commands that raced a navigation qualify;
    /// everything else aborts a wait.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::StaleElementReference(_) | Error::NavigationInProgress(_)
        )
    }
}
