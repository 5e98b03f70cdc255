//! Wait engine integration tests
//!
//! Timing assertions run on tokio's paused clock.

mod common;

use async_trait::async_trait;
use chaser_pages::driver::{AutomationClient, Locator, Lookup, MockElement};
use chaser_pages::wait::{
    element_clickable, element_visible, page_contains_text, url_contains, Condition,
    WaitOutcome, Waiter,
};
use chaser_pages::{Error, Result};
use common::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Raises a stale reference on its first `stale_for` checks, then yields the URL
struct FlakyUrl {
    stale_for: u32,
    calls: AtomicU32,
}

#[async_trait]
impl Condition for FlakyUrl {
    type Output = String;

    async fn check(&self, client: &dyn AutomationClient) -> Result<Option<String>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.stale_for {
            return Err(Error::stale("re-rendered"));
        }
        Ok(Some(client.current_url().await?))
    }

    fn description(&self) -> String {
        "flaky url".to_string()
    }
}

#[tokio::test(start_paused = true)]
async fn test_waiting_returns_what_an_immediate_check_would() {
    let client = mock_client();
    client.set_url("https://app.test/login?x=1").await;
    let condition = url_contains("/login");

    let immediate = condition.check(client.as_ref()).await.unwrap();
    let waited = Waiter::from_secs(5)
        .wait_until(client.as_ref(), &condition)
        .await
        .unwrap();

    assert_eq!(immediate, Some(waited));
}

#[tokio::test(start_paused = true)]
async fn test_stale_errors_absorbed_until_success() {
    let client = mock_client();
    client.set_url("https://app.test/home").await;
    let condition = FlakyUrl {
        stale_for: 4,
        calls: AtomicU32::new(0),
    };

    let url = Waiter::from_secs(5)
        .wait_until(client.as_ref(), &condition)
        .await
        .unwrap();

    assert_eq!(url, "https://app.test/home");
    assert_eq!(condition.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn test_page_text_timeout_scenario() {
    let client = mock_client();
    client.set_page_source(LOGIN_HTML).await;
    let start = Instant::now();

    let err = Waiter::from_secs(2)
        .wait_until(client.as_ref(), &page_contains_text("Welcome"))
        .await
        .unwrap_err();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed <= Duration::from_millis(2250));
    assert!(matches!(err, Error::WaitTimeout { ref page_source, .. } if page_source == LOGIN_HTML));
}

#[tokio::test(start_paused = true)]
async fn test_late_element_scenario() {
    let client = mock_client();
    let locator = Locator::css("button.save");
    let button = Arc::new(MockElement::new(locator.clone()));
    client
        .script_lookups(
            locator.clone(),
            vec![
                Lookup::Missing,
                Lookup::Missing,
                Lookup::Missing,
                Lookup::Found(button.clone()),
            ],
        )
        .await;

    let element = Waiter::from_secs(10)
        .wait_until(client.as_ref(), &element_clickable(locator.clone()))
        .await
        .unwrap();

    element.click().await.unwrap();
    assert_eq!(button.click_count(), 1);
    assert_eq!(client.lookup_count(&locator).await, 4);
}

#[tokio::test(start_paused = true)]
async fn test_poll_interval_is_respected() {
    let client = mock_client();
    let waiter = Waiter::from_secs(1).with_poll_interval(Duration::from_millis(400));

    let outcome = waiter
        .poll_until(client.as_ref(), &url_contains("/never"))
        .await
        .unwrap();

    match outcome {
        WaitOutcome::TimedOut(report) => {
            // 0, 400, 800 and the final check at the deadline
            assert_eq!(report.attempts, 4);
            assert_eq!(report.elapsed, Duration::from_secs(1));
        }
        WaitOutcome::Satisfied(_) => panic!("expected timeout"),
    }
    assert_eq!(client.url_reads(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_element_becomes_visible() {
    let client = mock_client();
    let locator = Locator::id("toast");
    let toast = Arc::new(MockElement::new(locator.clone()).with_text("Saved").hidden());
    client.add_element(locator.clone(), toast.clone()).await;

    let revealing = toast.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(900)).await;
        revealing.set_displayed(true);
    });

    let element = Waiter::from_secs(3)
        .wait_until(client.as_ref(), &element_visible(locator))
        .await
        .unwrap();
    assert_eq!(element.text().await.unwrap(), "Saved");
}

#[tokio::test(start_paused = true)]
async fn test_source_failure_at_timeout_still_reports() {
    let client = mock_client();
    client.fail_page_source(Some("target closed".into())).await;

    let err = Waiter::from_secs(1)
        .wait_until(client.as_ref(), &url_contains("/nowhere"))
        .await
        .unwrap_err();

    match err {
        Error::WaitTimeout { page_source, .. } => assert!(page_source.contains("target closed")),
        other => panic!("unexpected error: {other}"),
    }
}
