use thiserror::Error;

/// Failures while decoding the dedicated server stats file.
///
/// Both variants are transient: the upstream process rewrites the file
/// periodically and a half-written document parses again on the next poll.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to read snapshot file: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Failures while scraping the dedicated server status page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure, including the 5 second timeout.
    #[error("status request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("status page returned HTTP {0}")]
    Http(reqwest::StatusCode),
}
