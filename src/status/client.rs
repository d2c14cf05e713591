use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use reqwest::Client;

use super::models::StatusPage;
use super::parser::parse_status_page;
use crate::errors::ScrapeError;

/// The status page answers from process memory; anything slower than this
/// means the server is gone, so fail fast instead of hanging a poll cycle.
const STATUS_TIMEOUT_SECS: u64 = 5;

/// HTTP client for the dedicated server status page.
pub struct StatusClient {
    client: Client,
    base_url: String,
}

impl StatusClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Gt3Keeper/0.1")
            .timeout(Duration::from_secs(STATUS_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and parse `/status`. Timeouts and non-200 answers are explicit
    /// failures, never partial data.
    pub async fn fetch_status(&self) -> Result<StatusPage, ScrapeError> {
        let url = format!("{}/status", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Http(response.status()));
        }

        let html = response.text().await?;
        Ok(parse_status_page(&html))
    }

    /// Like [`fetch_status`](Self::fetch_status), but scrape failures are
    /// logged and reported as an empty participant set so a presentation
    /// poll loop never breaks.
    pub async fn fetch_live_status(&self) -> StatusPage {
        match self.fetch_status().await {
            Ok(page) => page,
            Err(err) => {
                warn!("Status scrape failed: {err}");
                StatusPage::default()
            }
        }
    }
}
