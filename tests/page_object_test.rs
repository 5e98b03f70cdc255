//! Page object integration tests
//!
//! Concrete pages built on `PageObject`, driven against the mock client.

mod common;

use chaser_pages::driver::{Locator, Lookup, MockElement, ScreenshotBehavior};
use chaser_pages::page::{Page, PageObject};
use chaser_pages::{Diagnostics, Error};
use common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_login_flow() {
    let client = mock_client();
    let (email, password) = install_login_form(&client).await;
    let login = LoginPage::new(client.clone(), 5);

    login.go_to_and_wait().await.unwrap();
    login.sign_in("ada@example.com", "hunter2").await.unwrap();

    assert_eq!(email.value().await, "ada@example.com");
    assert_eq!(password.value().await, "hunter2");
    assert_eq!(password.submit_count(), 1);

    client.set_url(format!("{}/dashboard", BASE_URL)).await;
    client.set_page_source(DASHBOARD_HTML).await;

    let dashboard = PageObject::new("/dashboard", client.clone(), 5);
    dashboard.ensure_is_current().await.unwrap();
    assert!(dashboard.is_text_present("Welcome back").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_waits_for_late_form() {
    let client = mock_client();
    let email = Arc::new(MockElement::new(LoginPage::email()));
    client
        .script_lookups(
            LoginPage::email(),
            vec![
                Lookup::Missing,
                Lookup::Stale,
                Lookup::Missing,
                Lookup::Found(email.clone()),
            ],
        )
        .await;
    client
        .add_element(
            LoginPage::password(),
            Arc::new(MockElement::new(LoginPage::password())),
        )
        .await;
    let login = LoginPage::new(client.clone(), 5);

    login.sign_in("ada@example.com", "pw").await.unwrap();
    assert_eq!(email.value().await, "ada@example.com");
}

#[tokio::test(start_paused = true)]
async fn test_redirected_navigation_times_out_with_source() {
    let client = mock_client();
    client
        .redirect("/settings", format!("{}/login?next=%2Fsettings", BASE_URL))
        .await;
    client.set_page_source(LOGIN_HTML).await;
    let settings = PageObject::new("/settings", client.clone(), 3);
    let start = Instant::now();

    let err = settings.go_to_and_wait().await.unwrap_err();

    assert!(start.elapsed() <= Duration::from_secs(3) + settings.waiter().poll_interval());
    match &err {
        Error::WaitTimeout {
            condition,
            page_source,
            ..
        } => {
            assert!(condition.contains("/settings"));
            assert_eq!(page_source, LOGIN_HTML);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(r#"<form id="login">"#));
}

#[tokio::test(start_paused = true)]
async fn test_text_appears_does_not_raise() {
    let client = mock_client();
    client.set_page_source(DASHBOARD_HTML).await;
    let page = PageObject::new("/dashboard", client, 1);

    assert!(page.text_appears("Welcome back").await.unwrap());
    assert!(!page.text_appears("Access denied").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_select_country() {
    let client = mock_client();
    let dropdown = country_dropdown();
    client.add_element(Locator::id("country"), dropdown.clone()).await;
    client.set_page_source(SIGNUP_HTML).await;
    let signup = PageObject::new("/signup", client, 5);

    let element = signup.locate(&Locator::id("country")).await.unwrap();
    signup.select_dropdown_by_text(&element, "France").await.unwrap();
    assert_eq!(dropdown.selected_text().await.as_deref(), Some("France"));

    match signup.select_dropdown_by_text(&element, "Germany").await {
        Err(Error::OptionNotFound { text, available }) => {
            assert_eq!(text, "Germany");
            assert_eq!(available, COUNTRIES);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_select_waits_for_repopulated_dropdown() {
    let client = mock_client();
    let locator = Locator::id("country");
    let loading = Arc::new(MockElement::new(locator.clone()).disabled());
    let ready = country_dropdown();
    client
        .script_lookups(
            locator.clone(),
            vec![
                Lookup::Found(loading.clone()),
                Lookup::Stale,
                Lookup::Found(ready.clone()),
            ],
        )
        .await;
    let signup = PageObject::new("/signup", client, 5);

    let element = signup.locate(&locator).await.unwrap();
    loading.mark_stale();
    signup.select_dropdown_by_text(&element, "US").await.unwrap();

    assert_eq!(ready.selected_text().await.as_deref(), Some("US"));
}

#[tokio::test]
async fn test_locate_missing_element() {
    let client = mock_client();
    client.set_page_source(SIGNUP_HTML).await;
    let page = PageObject::new("/signup", client, 5);

    match page.locate(&Locator::css("#submit")).await {
        Err(Error::ElementNotFound {
            locator,
            page_source,
        }) => {
            assert_eq!(locator, "css=#submit");
            assert_eq!(page_source, SIGNUP_HTML);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_screenshot_keeps_original_error() {
    let dir = tempfile::tempdir().unwrap();
    let client = mock_client();
    client
        .set_screenshot(ScreenshotBehavior::Fail("browser exited".into()))
        .await;
    client.set_page_source("<p>nothing here</p>").await;
    let page = PageObject::new("/", client.clone(), 1);
    let diagnostics = Diagnostics::new(dir.path());

    let err = page.is_text_present("Welcome").await.unwrap_err();
    let shot = diagnostics
        .capture_on_failure(client.as_ref(), "welcome-missing", &err)
        .await;

    assert!(shot.is_none());
    assert!(matches!(err, Error::WaitTimeout { .. }));
    assert!(err.to_string().contains("<p>nothing here</p>"));
}

#[tokio::test(start_paused = true)]
async fn test_failure_screenshot_written() {
    let dir = tempfile::tempdir().unwrap();
    let client = mock_client();
    let page = PageObject::new("/", client.clone(), 1);
    let diagnostics = Diagnostics::new(dir.path());

    let err = page.locate(&Locator::xpath("//button")).await.unwrap_err();
    let shot = diagnostics
        .capture_on_failure(client.as_ref(), "Scenario 7", &err)
        .await
        .unwrap();

    assert_eq!(shot.path, dir.path().join("Scenario 7.png"));
    assert!(shot.path.exists());
}
