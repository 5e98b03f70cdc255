//! CDP (Chrome DevTools Protocol) wire types

use serde::{Deserialize, Serialize};

/// CDP JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    /// Request ID
    pub id: u64,
    /// Method name (e.g., "Page.navigate")
    pub method: String,
    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// CDP JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct CdpRpcResponse {
    /// Response ID (matches request ID)
    pub id: u64,
    /// Response result
    #[serde(default)]
    pub result: serde_json::Value,
    /// Error if any
    #[serde(default)]
    pub error: Option<CdpErrorDetail>,
}

/// CDP error detail
#[derive(Debug, Clone, Deserialize)]
pub struct CdpErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Page.navigate parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
    pub url: String,
}

/// Page.navigate result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub frame_id: Option<String>,
    pub loader_id: Option<String>,
    /// Set when the navigation itself failed (DNS, refused connection, ...)
    pub error_text: Option<String>,
}

/// Runtime.evaluate parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
}

/// Runtime.evaluate result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub result: RemoteObject,
    #[serde(default)]
    pub exception_details: Option<ExceptionDetails>,
}

/// Runtime.RemoteObject
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    pub r#type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Runtime.ExceptionDetails
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub text: String,
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Most specific description available
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_skips_missing_params() {
        let request = CdpRequest {
            id: 7,
            method: "Page.enable".to_string(),
            params: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"id":7,"method":"Page.enable"}"#);
    }

    #[test]
    fn test_evaluate_response_with_exception() {
        let response: EvaluateResponse = serde_json::from_value(serde_json::json!({
            "result": {"type": "object", "subtype": "error", "description": "ReferenceError: x"},
            "exceptionDetails": {
                "text": "Uncaught",
                "exception": {"type": "object", "description": "ReferenceError: x is not defined"}
            }
        }))
        .unwrap();

        let details = response.exception_details.unwrap();
        assert_eq!(details.message(), "ReferenceError: x is not defined");
    }

    #[test]
    fn test_navigate_response_error_text() {
        let response: NavigateResponse = serde_json::from_value(serde_json::json!({
            "frameId": "F1",
            "loaderId": "L1",
            "errorText": "net::ERR_NAME_NOT_RESOLVED"
        }))
        .unwrap();

        assert_eq!(response.error_text.as_deref(), Some("net::ERR_NAME_NOT_RESOLVED"));
    }
}
