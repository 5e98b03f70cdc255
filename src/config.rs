//! Configuration management for Chaser-Pages

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Page object and browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL that relative page paths are resolved against
    pub base_url: String,

    /// CDP endpoint of the browser under test
    pub cdp_endpoint: String,

    /// Wait timeout for every page object wait, in seconds
    pub wait_timeout_secs: u64,

    /// Delay between condition polls, in milliseconds
    pub poll_interval_ms: u64,

    /// Directory that screenshots are written to
    pub screenshot_dir: PathBuf,

    /// Take a screenshot when a page operation fails
    pub capture_screenshot_on_failure: bool,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            cdp_endpoint: "ws://localhost:9222".to_string(),
            wait_timeout_secs: 10,
            poll_interval_ms: 250,
            screenshot_dir: PathBuf::from("."),
            capture_screenshot_on_failure: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(base_url) = env::var("CHASER_PAGES_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(endpoint) = env::var("CHASER_PAGES_CDP_ENDPOINT") {
            config.cdp_endpoint = endpoint;
        }

        if let Ok(timeout) = env::var("CHASER_PAGES_WAIT_TIMEOUT") {
            config.wait_timeout_secs = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_PAGES_WAIT_TIMEOUT"))?;
        }

        if let Ok(interval) = env::var("CHASER_PAGES_POLL_INTERVAL") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_PAGES_POLL_INTERVAL"))?;
        }

        if let Ok(dir) = env::var("CHASER_PAGES_SCREENSHOT_DIR") {
            config.screenshot_dir = PathBuf::from(dir);
        }

        if let Ok(capture) = env::var("CHASER_PAGES_SCREENSHOT_ON_FAILURE") {
            config.capture_screenshot_on_failure = capture
                .parse()
                .map_err(|_| Error::configuration("Invalid CHASER_PAGES_SCREENSHOT_ON_FAILURE"))?;
        }

        if let Ok(log_level) = env::var("CHASER_PAGES_LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make waits meaningless
    pub fn validate(&self) -> Result<()> {
        if self.wait_timeout_secs == 0 {
            return Err(Error::configuration("wait_timeout_secs must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::configuration("poll_interval_ms must be positive"));
        }
        if self.poll_interval() > self.wait_timeout() {
            return Err(Error::configuration(
                "poll_interval_ms must not exceed the wait timeout",
            ));
        }
        Ok(())
    }

    /// Wait timeout as a Duration
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
