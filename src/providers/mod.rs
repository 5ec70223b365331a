pub mod rico;
pub mod telegram;

use anyhow::{Context, Result};
use std::time::Duration;

/// Builds the HTTP client shared by the rate source and the notifier.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("rico-watch/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}
