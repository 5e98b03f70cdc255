//! CDP browser control implementation
//!
//! Target discovery over the DevTools HTTP endpoints, and client creation over
//! WebSocket.

use super::client::CdpClientImpl;
use super::connection::CdpWebSocketConnection;
use super::traits::*;
use crate::Error;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CDP browser implementation
#[derive(Debug)]
pub struct CdpBrowserImpl {
    /// Browser endpoint (e.g., "ws://localhost:9222")
    endpoint: String,
    /// HTTP client for the DevTools JSON endpoints
    http: reqwest::Client,
    /// Connections opened through `create_client`
    connections: tokio::sync::Mutex<Vec<Arc<dyn CdpConnection>>>,
}

impl CdpBrowserImpl {
    /// Create a new CDP browser controller
    ///
    /// # Arguments
    /// * `endpoint` - Browser endpoint (e.g., "ws://localhost:9222")
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        let endpoint = endpoint.into();
        info!("Creating CDP browser controller for endpoint: {}", endpoint);
        Self {
            endpoint,
            http: reqwest::Client::new(),
            connections: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    /// DevTools HTTP base for the WebSocket endpoint
    fn http_endpoint(&self) -> String {
        http_endpoint_for(&self.endpoint)
    }
}

/// Convert a DevTools WebSocket endpoint to its HTTP counterpart
pub fn http_endpoint_for(endpoint: &str) -> String {
    endpoint
        .trim_end_matches('/')
        .replacen("ws://", "http://", 1)
        .replacen("wss://", "https://", 1)
}

#[async_trait]
impl CdpBrowser for CdpBrowserImpl {
    async fn create_client(&self, target_url: &str) -> Result<Arc<dyn CdpClient>, Error> {
        info!("Creating CDP client for target: {}", target_url);

        let connection = CdpWebSocketConnection::new(target_url).await?;
        self.connections
            .lock()
            .await
            .push(Arc::clone(&connection) as Arc<dyn CdpConnection>);

        let client = Arc::new(CdpClientImpl::new(connection));
        client.enable_domain("Page").await?;
        client.enable_domain("Runtime").await?;

        Ok(client)
    }

    /// Uses the /json/new endpoint, which returns the new page's WebSocket URL
    async fn create_target(&self, url: &str) -> Result<String, Error> {
        let new_url = format!("{}/json/new?{}", self.http_endpoint(), url);
        debug!("Creating new page via HTTP API: {}", new_url);

        let response = self.http.put(&new_url).send().await.map_err(|e| {
            Error::internal(format!(
                "Failed to reach Chrome DevTools at {} (start Chrome with --remote-debugging-port=9222): {}",
                self.endpoint, e
            ))
        })?;

        let target: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::internal(format!("Failed to parse /json/new response: {}", e)))?;

        target
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::cdp("No webSocketDebuggerUrl in /json/new response"))
    }

    async fn close(&self) -> Result<(), Error> {
        let mut connections = self.connections.lock().await;
        info!("Closing {} CDP connections", connections.len());

        for connection in connections.drain(..) {
            if let Err(e) = connection.close().await {
                warn!("Failed to close CDP connection: {}", e);
            }
        }
        Ok(())
    }
}
