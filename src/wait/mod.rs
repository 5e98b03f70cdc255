//! # Explicit waits
//!
//! Repeatedly evaluate a read-only [`Condition`] against an
//! [`AutomationClient`](crate::driver::AutomationClient) until it holds, a
//! deadline passes, or a non-transient error occurs.
//!
//! ## Example
//! ```rust,no_run
//! use chaser_pages::driver::MockClient;
//! use chaser_pages::wait::{url_contains, Waiter};
//!
//! # async fn example() -> chaser_pages::Result<()> {
//! let client = MockClient::default();
//! let url = Waiter::from_secs(10)
//!     .wait_until(&client, &url_contains("/login"))
//!     .await?;
//! println!("Arrived at {}", url);
//! # Ok(())
//! # }
//! ```

pub mod condition;
pub mod waiter;

pub use condition::{
    element_clickable, element_present, element_visible, page_contains_text, url_contains,
    Condition, ElementReadiness, ElementState, PageContainsText, UrlContains,
};
pub use waiter::{
    Classifier, TimeoutReport, WaitOutcome, Waiter, DEFAULT_POLL_INTERVAL_MS, MIN_POLL_INTERVAL,
};
