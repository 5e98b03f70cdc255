//! # Automation client layer
//!
//! The browser handle that waits and page objects drive: navigation, current
//! URL, page source, element lookup and screenshots.
//!
//! ## Modules
//! - `locator`: immutable element locators
//! - `traits`: `AutomationClient` and `Element`
//! - `cdp`: implementation over the Chrome DevTools Protocol
//! - `scripts`: JavaScript used by the CDP implementation
//! - `mock`: scriptable fakes for tests
//!
//! ## Example
//! ```rust,no_run
//! use chaser_pages::cdp::{CdpBrowser, CdpBrowserImpl};
//! use chaser_pages::driver::{AutomationClient, CdpAutomationClient, Locator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = CdpBrowserImpl::new("ws://localhost:9222");
//! let target = browser.create_target("about:blank").await?;
//! let client = CdpAutomationClient::new(browser.create_client(&target).await?, "http://localhost:8080")?;
//!
//! client.navigate_to("/login").await?;
//! let email = client.find_element(&Locator::id("email")).await?;
//! assert!(email.is_some());
//! # Ok(())
//! # }
//! ```

pub mod cdp;
pub mod locator;
pub mod mock;
pub mod scripts;
pub mod traits;

pub use cdp::{CdpAutomationClient, CdpElement};
pub use locator::Locator;
pub use mock::{Lookup, MockClient, MockElement, ScreenshotBehavior};
pub use traits::{AutomationClient, Element, ElementHandle};
