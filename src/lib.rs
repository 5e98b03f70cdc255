//! Chaser-Pages: page objects and explicit waits for browser acceptance tests
//!
//! This library drives a browser over the Chrome DevTools Protocol behind an
//! [`AutomationClient`](driver::AutomationClient) trait, and layers page objects
//! on top whose every wait polls a condition until it holds or times out with
//! the page source attached.

pub mod error;
pub mod config;

pub mod cdp;
pub mod diagnostics;
pub mod driver;
pub mod page;
pub mod wait;

// Re-exports
pub use error::{Error, Result};
pub use config::Config;
pub use diagnostics::{Diagnostics, Screenshot};
pub use driver::{AutomationClient, Element, ElementHandle, Locator};
pub use page::{Page, PageObject};
pub use wait::{Condition, WaitOutcome, Waiter};

/// Chaser-Pages library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
