//! CDP WebSocket connection implementation
//!
//! This module provides WebSocket-based connection to Chrome DevTools Protocol.

use super::traits::{CdpConnection, CdpError as CdpErrorResponse, CdpResponse};
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, PendingCommand>>>;

/// CDP timeout configuration
#[derive(Debug, Clone)]
struct CdpTimeoutConfig {
    /// Default timeout for most commands (seconds)
    default_timeout_secs: u64,
    /// Timeout for screenshot commands (seconds)
    screenshot_timeout_secs: u64,
    /// Timeout for page navigation commands (seconds)
    navigation_timeout_secs: u64,
}

impl Default for CdpTimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            screenshot_timeout_secs: 90,
            navigation_timeout_secs: 60,
        }
    }
}

impl CdpTimeoutConfig {
    /// Get timeout duration for a specific command method
    fn get_timeout_for_command(&self, method: &str) -> tokio::time::Duration {
        let secs = match method {
            "Page.captureScreenshot" => self.screenshot_timeout_secs,
            "Page.navigate" | "Page.reload" => self.navigation_timeout_secs,
            _ => self.default_timeout_secs,
        };
        tokio::time::Duration::from_secs(secs)
    }
}

/// Pending command response
#[derive(Debug)]
struct PendingCommand {
    /// Response channel sender
    sender: oneshot::Sender<CdpResponse>,
    /// Command method (for logging)
    method: String,
}

/// CDP WebSocket connection implementation
///
/// Writes go through the sink half; a spawned reader task owns the stream half
/// and routes responses back to the pending command by ID. Events are ignored.
pub struct CdpWebSocketConnection {
    /// WebSocket URL
    url: String,
    /// Write half of the WebSocket
    sink: Mutex<SplitSink<WsStream, Message>>,
    /// Next command ID
    next_id: AtomicU64,
    /// Pending commands (ID -> response sender)
    pending_commands: PendingMap,
    /// Is connection active
    is_active: Arc<AtomicBool>,
    /// Timeout configuration
    timeout_config: CdpTimeoutConfig,
}

impl std::fmt::Debug for CdpWebSocketConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpWebSocketConnection")
            .field("url", &self.url)
            .field("is_active", &self.is_active.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl CdpWebSocketConnection {
    /// Create a new CDP WebSocket connection
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:9222/devtools/page/ABC123")
    pub async fn new<S: Into<String>>(url: S) -> Result<Arc<Self>, Error> {
        let url = url.into();
        info!("Connecting to WebSocket: {}", url);

        let (ws_stream, _) = connect_async(&url)
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect: {}", e)))?;
        let (sink, stream) = ws_stream.split();

        let connection = Arc::new(Self {
            url,
            sink: Mutex::new(sink),
            next_id: AtomicU64::new(1),
            pending_commands: Arc::new(Mutex::new(HashMap::new())),
            is_active: Arc::new(AtomicBool::new(true)),
            timeout_config: CdpTimeoutConfig::default(),
        });

        let pending = Arc::clone(&connection.pending_commands);
        let is_active = Arc::clone(&connection.is_active);
        tokio::spawn(async move {
            Self::read_loop(stream, &pending).await;
            is_active.store(false, Ordering::SeqCst);
            // Dropping the senders fails every waiter with "channel closed"
            pending.lock().await.clear();
            info!("CDP read loop exited");
        });

        info!("WebSocket connection established");
        Ok(connection)
    }

    /// Route incoming frames until the socket closes
    async fn read_loop(mut stream: SplitStream<WsStream>, pending: &PendingMap) {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => Self::handle_message(&text, pending).await,
                Ok(Message::Close(_)) => {
                    info!("WebSocket close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    }

    /// Handle one text frame; anything without an `id` is an event
    async fn handle_message(text: &str, pending: &PendingMap) {
        let response = match serde_json::from_str::<CdpRpcResponse>(text) {
            Ok(response) => response,
            Err(_) => {
                debug!("Ignoring CDP event: {}", text);
                return;
            }
        };

        match pending.lock().await.remove(&response.id) {
            Some(pending_cmd) => {
                debug!("Received response for command {}: {}", response.id, pending_cmd.method);
                let cdp_response = CdpResponse {
                    id: response.id,
                    result: Some(response.result),
                    error: response.error.map(|e| CdpErrorResponse {
                        code: e.code,
                        message: e.message,
                        data: e.data,
                    }),
                };
                // Waiter may have timed out already
                let _ = pending_cmd.sender.send(cdp_response);
            }
            None => warn!("Received response for unknown command ID: {}", response.id),
        }
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    /// Send a CDP command and wait for response
    async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::SeqCst) {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: if params.is_null() { None } else { Some(params) },
        };
        let json = serde_json::to_string(&request)?;

        debug!("Sending CDP command {}: {}", id, method);

        let (sender, receiver) = oneshot::channel();
        self.pending_commands.lock().await.insert(
            id,
            PendingCommand {
                sender,
                method: method.to_string(),
            },
        );

        if let Err(e) = self.sink.lock().await.send(Message::Text(json)).await {
            self.pending_commands.lock().await.remove(&id);
            return Err(Error::websocket(format!("Failed to send message: {}", e)));
        }

        let timeout_duration = self.timeout_config.get_timeout_for_command(method);
        match tokio::time::timeout(timeout_duration, receiver).await {
            Ok(Ok(response)) => {
                if let Some(error) = &response.error {
                    return Err(Error::cdp(format!(
                        "{}: {} (code: {})",
                        method, error.message, error.code
                    )));
                }
                Ok(response)
            }
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed before command {} ({}) completed",
                id, method
            ))),
            Err(_) => {
                self.pending_commands.lock().await.remove(&id);
                Err(Error::timeout(format!("Command {} ({}) timed out", id, method)))
            }
        }
    }

    /// Close the connection
    async fn close(&self) -> Result<(), Error> {
        info!("Closing CDP WebSocket connection to {}", self.url);

        self.is_active.store(false, Ordering::SeqCst);
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| Error::websocket(format!("Failed to close WebSocket: {}", e)))
    }

    /// Check if connection is active
    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_per_command() {
        let config = CdpTimeoutConfig::default();
        assert_eq!(config.get_timeout_for_command("Page.captureScreenshot").as_secs(), 90);
        assert_eq!(config.get_timeout_for_command("Page.navigate").as_secs(), 60);
        assert_eq!(config.get_timeout_for_command("Runtime.evaluate").as_secs(), 30);
    }

    #[tokio::test]
    async fn test_response_routed_to_pending_command() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (sender, receiver) = oneshot::channel();
        pending.lock().await.insert(
            3,
            PendingCommand {
                sender,
                method: "Runtime.evaluate".to_string(),
            },
        );

        CdpWebSocketConnection::handle_message(
            r#"{"id":3,"result":{"result":{"type":"boolean","value":true}}}"#,
            &pending,
        )
        .await;

        let response = receiver.await.unwrap();
        assert_eq!(response.id, 3);
        assert!(response.error.is_none());
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_events_are_ignored() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        CdpWebSocketConnection::handle_message(
            r#"{"method":"Page.loadEventFired","params":{"timestamp":1.0}}"#,
            &pending,
        )
        .await;
        assert!(pending.lock().await.is_empty());
    }
}
