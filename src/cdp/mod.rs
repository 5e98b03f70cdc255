//! # Chrome DevTools Protocol (CDP) layer
//!
//! WebSocket transport to a Chrome/Chromium target: command/response routing,
//! a typed client for navigation, script evaluation and screenshots, and target
//! discovery over the DevTools HTTP endpoints.
//!
//! ## Modules
//! - `traits`: core CDP traits
//! - `types`: protocol wire types
//! - `connection`: WebSocket connection
//! - `client`: typed CDP client
//! - `browser`: target discovery and client creation
//! - `mock`: scripted connection for tests
//!
//! ## Example
//! ```rust,no_run
//! use chaser_pages::cdp::{CdpBrowser, CdpBrowserImpl, CdpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = CdpBrowserImpl::new("ws://localhost:9222");
//! let target = browser.create_target("about:blank").await?;
//! let client = browser.create_client(&target).await?;
//!
//! let result = client.navigate("https://example.com").await?;
//! println!("Navigated to: {}", result.url);
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod client;
pub mod connection;
pub mod mock;
pub mod traits;
pub mod types;

pub use traits::{
    CdpBrowser, CdpClient, CdpConnection, CdpError, CdpResponse, EvaluationResult,
    NavigationResult,
};

pub use browser::CdpBrowserImpl;
pub use client::CdpClientImpl;
pub use connection::CdpWebSocketConnection;
pub use mock::MockCdpConnection;
