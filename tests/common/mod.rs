//! Common test utilities
//!
//! Fake application pages built on the public page object API, and canned page
//! sources for the mock automation client.

#![allow(dead_code)]

use chaser_pages::driver::{AutomationClient, Locator, MockClient, MockElement};
use chaser_pages::page::{Page, PageObject};
use chaser_pages::wait::{element_clickable, Waiter};
use chaser_pages::Result;
use std::sync::Arc;

pub const BASE_URL: &str = "https://app.test";

pub const LOGIN_HTML: &str = r#"<html><body><form id="login"><input name="email"><input name="password"></form></body></html>"#;
pub const DASHBOARD_HTML: &str = r#"<html><body><h1>Welcome back, Ada</h1></body></html>"#;
pub const SIGNUP_HTML: &str = r#"<html><body><form id="signup"><select id="country"></select></form></body></html>"#;

pub const COUNTRIES: [&str; 4] = ["", "UK", "France", "US"];

/// Mock client at the test base URL
pub fn mock_client() -> Arc<MockClient> {
    Arc::new(MockClient::new(BASE_URL))
}

/// Login page of the application under test
pub struct LoginPage {
    base: PageObject,
}

impl LoginPage {
    pub fn email() -> Locator {
        Locator::name("email")
    }

    pub fn password() -> Locator {
        Locator::name("password")
    }

    pub fn new(client: Arc<dyn AutomationClient>, timeout_secs: u64) -> Self {
        Self {
            base: PageObject::new("/login", client, timeout_secs),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let email_field = self.wait_until(element_clickable(Self::email())).await?;
        self.set_text(&email_field, email).await?;

        let password_field = self.locate(&Self::password()).await?;
        self.set_text(&password_field, password).await?;
        self.submit(&password_field).await
    }
}

impl Page for LoginPage {
    fn path(&self) -> &str {
        self.base.path()
    }

    fn client(&self) -> &Arc<dyn AutomationClient> {
        self.base.client()
    }

    fn waiter(&self) -> &Waiter {
        self.base.waiter()
    }
}

/// Install login form fields on `client`
pub async fn install_login_form(client: &MockClient) -> (Arc<MockElement>, Arc<MockElement>) {
    let email = Arc::new(MockElement::new(LoginPage::email()));
    let password = Arc::new(MockElement::new(LoginPage::password()));
    client.add_element(LoginPage::email(), email.clone()).await;
    client.add_element(LoginPage::password(), password.clone()).await;
    client.set_page_source(LOGIN_HTML).await;
    (email, password)
}

/// Country dropdown with the standard options
pub fn country_dropdown() -> Arc<MockElement> {
    Arc::new(MockElement::new(Locator::id("country")).with_options(COUNTRIES))
}
