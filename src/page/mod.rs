//! # Page objects
//!
//! A [`Page`] pairs a canonical path with the shared automation client and a
//! [`Waiter`](crate::wait::Waiter). Concrete pages embed a [`PageObject`] and
//! add their own locators:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chaser_pages::driver::{AutomationClient, Locator};
//! use chaser_pages::page::{Page, PageObject};
//! use chaser_pages::wait::Waiter;
//!
//! struct LoginPage {
//!     base: PageObject,
//! }
//!
//! impl Page for LoginPage {
//!     fn path(&self) -> &str { self.base.path() }
//!     fn client(&self) -> &Arc<dyn AutomationClient> { self.base.client() }
//!     fn waiter(&self) -> &Waiter { self.base.waiter() }
//! }
//!
//! impl LoginPage {
//!     async fn sign_in(&self, email: &str) -> chaser_pages::Result<()> {
//!         let field = self.locate(&Locator::id("email")).await?;
//!         self.set_text(&field, email).await?;
//!         self.submit(&field).await
//!     }
//! }
//! ```

pub mod object;
pub mod traits;

pub use object::PageObject;
pub use traits::Page;
