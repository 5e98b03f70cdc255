//! Generic page object

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::traits::Page;
use crate::config::Config;
use crate::driver::AutomationClient;
use crate::wait::Waiter;

/// A page identified only by its path
///
/// Concrete pages embed one and forward [`Page`]'s accessors to it.
#[derive(Clone)]
pub struct PageObject {
    path: String,
    client: Arc<dyn AutomationClient>,
    waiter: Waiter,
}

impl PageObject {
    /// Create a page object waiting up to `timeout_secs` for every condition
    pub fn new<S: Into<String>>(
        path: S,
        client: Arc<dyn AutomationClient>,
        timeout_secs: u64,
    ) -> Self {
        Self::with_waiter(path, client, Waiter::from_secs(timeout_secs))
    }

    /// Create a page object with the configured timeout and poll interval
    pub fn from_config<S: Into<String>>(
        path: S,
        client: Arc<dyn AutomationClient>,
        config: &Config,
    ) -> Self {
        Self::with_waiter(path, client, Waiter::from_config(config))
    }

    pub fn with_waiter<S: Into<String>>(
        path: S,
        client: Arc<dyn AutomationClient>,
        waiter: Waiter,
    ) -> Self {
        Self {
            path: path.into(),
            client,
            waiter,
        }
    }

    /// A page object at another path sharing this one's client and waiter
    pub fn sibling<S: Into<String>>(&self, path: S) -> Self {
        Self::with_waiter(path, Arc::clone(&self.client), self.waiter.clone())
    }
}

impl Page for PageObject {
    fn path(&self) -> &str {
        &self.path
    }

    fn client(&self) -> &Arc<dyn AutomationClient> {
        &self.client
    }

    fn waiter(&self) -> &Waiter {
        &self.waiter
    }
}

impl fmt::Debug for PageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageObject")
            .field("path", &self.path)
            .field("timeout", &self.waiter.timeout())
            .finish()
    }
}
