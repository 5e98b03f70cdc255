//! Mock CDP implementation for testing
//!
//! A [`CdpConnection`] that answers from per-method queues of canned replies and
//! records every command it receives.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cdp::traits::*;
use crate::Error;

/// 1x1 PNG, base64 encoded
const MOCK_SCREENSHOT_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

#[derive(Debug, Clone)]
enum MockReply {
    Result(Value),
    Failure(String),
}

/// Mock CDP connection
#[derive(Debug)]
pub struct MockCdpConnection {
    is_active: Arc<AtomicBool>,
    next_id: AtomicU64,
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    sent: Mutex<Vec<(String, Value)>>,
}

impl MockCdpConnection {
    /// Create a new mock CDP connection
    pub fn new() -> Self {
        Self {
            is_active: Arc::new(AtomicBool::new(true)),
            next_id: AtomicU64::new(1),
            replies: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Queue a result for the next `method` command
    pub async fn push_response(&self, method: &str, result: Value) {
        self.push(method, MockReply::Result(result)).await;
    }

    /// Queue a protocol error for the next `method` command
    pub async fn push_failure(&self, method: &str, message: &str) {
        self.push(method, MockReply::Failure(message.to_string()))
            .await;
    }

    /// Queue the by-value result of the next `Runtime.evaluate`
    pub async fn push_evaluate(&self, value: Value) {
        let remote = match &value {
            Value::String(_) => json!({ "type": "string", "value": value }),
            Value::Number(_) => json!({ "type": "number", "value": value }),
            Value::Bool(_) => json!({ "type": "boolean", "value": value }),
            Value::Null => json!({ "type": "object", "subtype": "null", "value": null }),
            _ => json!({ "type": "object", "value": value }),
        };
        self.push_response("Runtime.evaluate", json!({ "result": remote }))
            .await;
    }

    /// Methods received so far, in order
    pub async fn sent_methods(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Commands received so far, with parameters
    pub async fn sent_commands(&self) -> Vec<(String, Value)> {
        self.sent.lock().await.clone()
    }

    async fn push(&self, method: &str, reply: MockReply) {
        self.replies
            .lock()
            .await
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    fn default_reply(method: &str) -> Value {
        match method {
            "Page.navigate" => json!({
                "frameId": uuid::Uuid::new_v4().to_string(),
                "loaderId": uuid::Uuid::new_v4().to_string(),
            }),
            "Runtime.evaluate" => json!({ "result": { "type": "undefined" } }),
            "Page.captureScreenshot" => json!({ "data": MOCK_SCREENSHOT_BASE64 }),
            _ => json!({}),
        }
    }
}

impl Default for MockCdpConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdpConnection for MockCdpConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::Relaxed) {
            return Err(Error::websocket("Connection is not active"));
        }

        self.sent.lock().await.push((method.to_string(), params));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let queued = self
            .replies
            .lock()
            .await
            .get_mut(method)
            .and_then(|queue| queue.pop_front());

        match queued {
            Some(MockReply::Failure(message)) => Err(Error::cdp(format!("{}: {}", method, message))),
            Some(MockReply::Result(result)) => Ok(CdpResponse {
                id,
                result: Some(result),
                error: None,
            }),
            None => Ok(CdpResponse {
                id,
                result: Some(Self::default_reply(method)),
                error: None,
            }),
        }
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }
}
