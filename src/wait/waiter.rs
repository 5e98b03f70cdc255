//! Wait engine
//!
//! Polls a [`Condition`] until it yields a value, the deadline passes, or a
//! non-transient error occurs.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::condition::Condition;
use crate::config::Config;
use crate::diagnostics::page_source_snapshot;
use crate::driver::AutomationClient;
use crate::{Error, Result};

/// Default delay between polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Shortest delay between polls a waiter accepts
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Decides whether a poll error is retried (`true`) or aborts the wait
pub type Classifier = Arc<dyn Fn(&Error) -> bool + Send + Sync>;

/// Result of polling a condition
#[derive(Debug)]
pub enum WaitOutcome<V> {
    /// The condition held; carries its value
    Satisfied(V),
    /// The deadline passed first
    TimedOut(TimeoutReport),
}

impl<V> WaitOutcome<V> {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, WaitOutcome::Satisfied(_))
    }

    /// Value if satisfied
    pub fn satisfied(self) -> Option<V> {
        match self {
            WaitOutcome::Satisfied(v) => Some(v),
            WaitOutcome::TimedOut(_) => None,
        }
    }
}

/// What happened during a wait that ran out of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutReport {
    /// Description of the awaited condition
    pub condition: String,
    /// Configured timeout
    pub timeout: Duration,
    /// Time actually spent
    pub elapsed: Duration,
    /// Number of condition checks started
    pub attempts: u32,
    /// Last transient error swallowed, if any
    pub last_error: Option<String>,
}

impl fmt::Display for TimeoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} attempts", self.condition, self.attempts)?;
        if let Some(err) = &self.last_error {
            write!(f, "; last suppressed error: {}", err)?;
        }
        f.write_str(")")
    }
}

/// Polls conditions against an automation client with a fixed timeout
#[derive(Clone)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
    classifier: Classifier,
}

impl fmt::Debug for Waiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl Waiter {
    /// Create a waiter polling every [`DEFAULT_POLL_INTERVAL_MS`]
    ///
    /// Errors retried by default are those [`Error::is_transient`] accepts.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            classifier: Arc::new(Error::is_transient),
        }
    }

    pub fn from_secs(timeout_secs: u64) -> Self {
        Self::new(Duration::from_secs(timeout_secs))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.wait_timeout()).with_poll_interval(config.poll_interval())
    }

    /// Set the delay between polls, raised to at least [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Replace the transient-error classifier
    pub fn with_classifier<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Error) -> bool + Send + Sync + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll `condition` until it holds or the timeout elapses
    ///
    /// The condition is checked at least once. Transient errors count as "not
    /// yet"; any other error is returned immediately. A single check that runs
    /// past the deadline by more than one poll interval is abandoned, so the
    /// call never outlives `timeout + poll_interval` by more than the time it
    /// takes to drop the pending check.
    pub async fn poll_until<C>(
        &self,
        client: &dyn AutomationClient,
        condition: &C,
    ) -> Result<WaitOutcome<C::Output>>
    where
        C: Condition + ?Sized,
    {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let mut attempts = 0u32;
        let mut last_error = None;

        loop {
            attempts += 1;
            let budget = deadline.saturating_duration_since(Instant::now()) + self.poll_interval;

            match tokio::time::timeout(budget, condition.check(client)).await {
                Ok(Ok(Some(value))) => {
                    debug!(
                        "Condition met after {} attempts: {}",
                        attempts,
                        condition.description()
                    );
                    return Ok(WaitOutcome::Satisfied(value));
                }
                Ok(Ok(None)) => {
                    trace!("Condition not met yet: {}", condition.description());
                }
                Ok(Err(e)) if (self.classifier)(&e) => {
                    debug!("Ignoring transient error while polling: {}", e);
                    last_error = Some(e.to_string());
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    last_error = Some(format!("check did not complete within {:?}", budget));
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(WaitOutcome::TimedOut(TimeoutReport {
                    condition: condition.description(),
                    timeout: self.timeout,
                    elapsed: now - start,
                    attempts,
                    last_error,
                }));
            }

            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Wait for `condition` and return its value
    ///
    /// On timeout the error carries the page source as it was at expiry.
    pub async fn wait_until<C>(
        &self,
        client: &dyn AutomationClient,
        condition: &C,
    ) -> Result<C::Output>
    where
        C: Condition + ?Sized,
    {
        match self.poll_until(client, condition).await? {
            WaitOutcome::Satisfied(value) => Ok(value),
            WaitOutcome::TimedOut(report) => {
                warn!("Wait timed out: {}", report);
                Err(Error::WaitTimeout {
                    condition: report.to_string(),
                    timeout: report.timeout,
                    page_source: page_source_snapshot(client).await,
                })
            }
        }
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
