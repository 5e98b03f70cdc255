//! # Chaser-Pages probe
//!
//! Smoke-checks one page of a running application through a real browser:
//! navigates to it, waits for the URL to settle and optionally for a text.
//!
//! ```text
//! chaser-pages-probe <path> [expected-text]
//! ```
//!
//! ## Environment variables
//! - `CHASER_PAGES_BASE_URL`: application under test (default: http://localhost:8080)
//! - `CHASER_PAGES_CDP_ENDPOINT`: Chrome DevTools endpoint (default: ws://localhost:9222)
//! - `CHASER_PAGES_WAIT_TIMEOUT`: seconds per wait (default: 10)
//! - `CHASER_PAGES_SCREENSHOT_DIR`: where failure screenshots go (default: .)
//! - `RUST_LOG`: log filter, overrides `CHASER_PAGES_LOG_LEVEL`

use anyhow::{bail, Context};
use chaser_pages::{
    cdp::{CdpBrowser, CdpBrowserImpl},
    driver::{AutomationClient, CdpAutomationClient},
    Config, Diagnostics, Page, PageObject,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: chaser-pages-probe <path> [expected-text]");
    };
    let expected_text = args.next();

    info!("Chaser-Pages probe v{}", chaser_pages::VERSION);
    info!(
        "Probing {} on {} via {}",
        path, config.base_url, config.cdp_endpoint
    );

    let browser = CdpBrowserImpl::new(config.cdp_endpoint.clone());
    let target = browser
        .create_target("about:blank")
        .await
        .context("Failed to open a browser target")?;
    let cdp = browser
        .create_client(&target)
        .await
        .context("Failed to attach to the browser target")?;
    let client: Arc<dyn AutomationClient> =
        Arc::new(CdpAutomationClient::new(cdp, &config.base_url)?);

    let page = PageObject::from_config(path.as_str(), Arc::clone(&client), &config);
    let outcome = probe(&page, expected_text.as_deref()).await;

    if let Err(e) = &outcome {
        let name = format!("probe-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let diagnostics = Diagnostics::from_config(&config);
        if let Some(shot) = diagnostics.capture_on_failure(client.as_ref(), &name, e).await {
            info!("Screenshot saved to {}", shot.path.display());
        }
        error!("Probe of {} failed", path);
    }

    if let Err(e) = browser.close().await {
        error!("Failed to close browser connections: {}", e);
    }

    outcome.with_context(|| format!("Probe of {} failed", path))?;
    info!("Probe of {} passed", path);
    Ok(())
}

async fn probe(page: &PageObject, expected_text: Option<&str>) -> chaser_pages::Result<()> {
    page.go_to_and_wait().await?;
    if let Some(text) = expected_text {
        page.is_text_present(text).await?;
        info!("Found {:?} on {}", text, page.path());
    }
    Ok(())
}
