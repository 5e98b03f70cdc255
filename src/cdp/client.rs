//! CDP client implementation
//!
//! This module provides a high-level CDP client with typed methods for common operations.

use super::traits::*;
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::sync::Arc;
use tracing::{debug, info};

/// readyState polls after Page.navigate (100ms apart)
const READY_STATE_ATTEMPTS: u32 = 50;

/// Protocol error messages reported when a navigation tears down the context
/// a command was sent to
const CONTEXT_LOST_MESSAGES: [&str; 3] = [
    "Execution context was destroyed",
    "Cannot find context with specified id",
    "Inspected target navigated or closed",
];

/// Reclassify protocol errors caused by a navigation replacing the page
fn classify_context_loss(err: Error) -> Error {
    match err {
        Error::Cdp(msg) if CONTEXT_LOST_MESSAGES.iter().any(|m| msg.contains(m)) => {
            Error::navigation_in_progress(msg)
        }
        other => other,
    }
}

/// CDP client implementation
#[derive(Debug, Clone)]
pub struct CdpClientImpl {
    /// Underlying CDP connection
    connection: Arc<dyn CdpConnection>,
}

impl CdpClientImpl {
    /// Create a new CDP client
    ///
    /// # Arguments
    /// * `connection` - CDP connection instance
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self { connection }
    }

    /// Parse remote object value to evaluation result
    fn parse_remote_object(obj: &RemoteObject) -> EvaluationResult {
        let value = obj.value.as_ref();
        match obj.r#type.as_str() {
            "string" => EvaluationResult::String(
                value.and_then(|v| v.as_str()).unwrap_or("").to_string(),
            ),
            "number" => EvaluationResult::Number(value.and_then(|v| v.as_f64()).unwrap_or(0.0)),
            "boolean" => EvaluationResult::Bool(value.and_then(|v| v.as_bool()).unwrap_or(false)),
            "object" if obj.subtype.as_deref() == Some("null") => EvaluationResult::Null,
            "object" => EvaluationResult::Object(value.cloned().unwrap_or(serde_json::Value::Null)),
            _ => EvaluationResult::Null,
        }
    }

    /// Poll document.readyState until "complete" or attempts run out
    async fn wait_for_ready_state(&self) -> bool {
        for attempt in 1..=READY_STATE_ATTEMPTS {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            match self.evaluate("document.readyState", false).await {
                Ok(EvaluationResult::String(state)) if state == "complete" => {
                    debug!("Page loaded on attempt {}", attempt);
                    return true;
                }
                Ok(other) => debug!("Document ready state on attempt {}: {:?}", attempt, other),
                // Execution context is replaced mid-navigation
                Err(e) => debug!("Error checking ready state on attempt {}: {}", attempt, e),
            }
        }
        false
    }
}

#[async_trait]
impl CdpClient for CdpClientImpl {
    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error> {
        info!("Navigating to {}", url);

        let params = serde_json::to_value(NavigateParams {
            url: url.to_string(),
        })?;
        let result = self.call_method("Page.navigate", params).await?;
        let response: NavigateResponse = serde_json::from_value(result)?;

        if let Some(error_text) = response.error_text.filter(|t| !t.is_empty()) {
            return Err(Error::navigation_failed(format!("{}: {}", url, error_text)));
        }

        let is_loaded = self.wait_for_ready_state().await;
        if !is_loaded {
            info!("Page load polling timeout for {} - continuing anyway", url);
        }

        Ok(NavigationResult {
            loader_id: response.loader_id,
            url: url.to_string(),
            is_loaded,
        })
    }

    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error> {
        debug!("Evaluating script: {}", script);

        let params = serde_json::to_value(EvaluateParams {
            expression: script.to_string(),
            await_promise: Some(await_promise),
            return_by_value: Some(true),
        })?;
        let result = self
            .call_method("Runtime.evaluate", params)
            .await
            .map_err(classify_context_loss)?;

        let response: EvaluateResponse = serde_json::from_value(result)
            .map_err(|e| Error::cdp(format!("Failed to parse EvaluateResponse: {}", e)))?;

        if let Some(exception) = response.exception_details {
            return Err(Error::script_execution_failed(exception.message()));
        }

        Ok(Self::parse_remote_object(&response.result))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, Error> {
        info!("Capturing screenshot");

        let result = self
            .call_method("Page.captureScreenshot", serde_json::json!({ "format": "png" }))
            .await?;

        let data = result
            .get("data")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::cdp("No data in screenshot result"))?;

        BASE64
            .decode(data)
            .map_err(|e| Error::cdp(format!("Failed to decode screenshot: {}", e)))
    }

    async fn get_content(&self) -> Result<String, Error> {
        match self.evaluate("document.documentElement.outerHTML", false).await? {
            EvaluationResult::String(html) => Ok(html),
            _ => Ok(String::new()),
        }
    }

    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        debug!("Enabling domain: {}", domain);
        self.call_method(&format!("{}.enable", domain), serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn call_method(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, Error> {
        let response = self.connection.send_command(method, params).await?;
        response.result.ok_or_else(|| Error::cdp("No result in response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdp::mock::MockCdpConnection;
    use serde_json::json;

    fn remote(kind: &str, value: Option<serde_json::Value>) -> RemoteObject {
        RemoteObject {
            r#type: kind.to_string(),
            subtype: None,
            value,
            description: None,
        }
    }

    #[test]
    fn test_parse_remote_object() {
        assert_eq!(
            CdpClientImpl::parse_remote_object(&remote("string", Some(json!("test")))),
            EvaluationResult::String("test".to_string())
        );
        assert_eq!(
            CdpClientImpl::parse_remote_object(&remote("number", Some(json!(42.5)))),
            EvaluationResult::Number(42.5)
        );
        assert_eq!(
            CdpClientImpl::parse_remote_object(&remote("boolean", Some(json!(true)))),
            EvaluationResult::Bool(true)
        );
        assert_eq!(
            CdpClientImpl::parse_remote_object(&remote("undefined", None)),
            EvaluationResult::Null
        );
    }

    #[test]
    fn test_parse_null_object() {
        let mut obj = remote("object", None);
        obj.subtype = Some("null".to_string());
        assert_eq!(CdpClientImpl::parse_remote_object(&obj), EvaluationResult::Null);
    }

    #[tokio::test]
    async fn test_evaluate_exception_is_script_error() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .push_response(
                "Runtime.evaluate",
                json!({
                    "result": {"type": "object"},
                    "exceptionDetails": {"text": "Uncaught SyntaxError"}
                }),
            )
            .await;
        let client = CdpClientImpl::new(connection);

        let err = client.evaluate("(", false).await.unwrap_err();
        assert!(matches!(err, Error::ScriptExecutionFailed(msg) if msg == "Uncaught SyntaxError"));
    }

    #[tokio::test]
    async fn test_screenshot_decodes_base64() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .push_response("Page.captureScreenshot", json!({ "data": BASE64.encode(b"png-bytes") }))
            .await;
        let client = CdpClientImpl::new(connection.clone());

        let bytes = client.screenshot().await.unwrap();
        assert_eq!(bytes, b"png-bytes");
        let commands = connection.sent_commands().await;
        assert_eq!(commands[0].0, "Page.captureScreenshot");
        assert_eq!(commands[0].1["format"], "png");
    }

    #[tokio::test]
    async fn test_destroyed_context_is_navigation_in_progress() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .push_failure("Runtime.evaluate", "Execution context was destroyed. (-32000)")
            .await;
        connection
            .push_failure("Runtime.evaluate", "Cannot find context with specified id (-32000)")
            .await;
        let client = CdpClientImpl::new(connection);

        for _ in 0..2 {
            let err = client.evaluate("window.location.href", false).await.unwrap_err();
            assert!(matches!(err, Error::NavigationInProgress(_)));
            assert!(err.is_transient());
        }
    }

    #[tokio::test]
    async fn test_other_protocol_errors_stay_fatal() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .push_failure("Runtime.evaluate", "Session with given id not found")
            .await;
        let client = CdpClientImpl::new(connection);

        let err = client.evaluate("1", false).await.unwrap_err();
        assert!(matches!(err, Error::Cdp(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_waits_for_ready_state() {
        let connection = Arc::new(MockCdpConnection::new());
        connection.push_evaluate(json!("loading")).await;
        connection.push_evaluate(json!("complete")).await;
        let client = CdpClientImpl::new(connection.clone());

        let result = client.navigate("https://app.test/login").await.unwrap();
        assert!(result.is_loaded);
        assert_eq!(result.url, "https://app.test/login");
        assert_eq!(
            connection.sent_methods().await,
            vec!["Page.navigate", "Runtime.evaluate", "Runtime.evaluate"]
        );
    }

    #[tokio::test]
    async fn test_navigate_error_text_fails() {
        let connection = Arc::new(MockCdpConnection::new());
        connection
            .push_response(
                "Page.navigate",
                json!({ "frameId": "F", "errorText": "net::ERR_CONNECTION_REFUSED" }),
            )
            .await;
        let client = CdpClientImpl::new(connection);

        let err = client.navigate("http://localhost:1/").await.unwrap_err();
        assert!(matches!(err, Error::NavigationFailed(_)));
    }
}
