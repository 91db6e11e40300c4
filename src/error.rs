// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Almost nothing in a crawl is fatal: a failed fetch or a broken link just
// drops one URL. These variants cover the places where an error does have to
// travel somewhere - the fetcher reports it to the crawl loop (which logs it
// and moves on), report storage reports it to the checkpointer (which logs it
// and retries at the next checkpoint), and startup reports bad config or a
// bad start URL to main.
// =============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::crawl::Rejection;

// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error (connection, timeout, TLS, redirect loop, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file could not be read or parsed
    #[error("Failed to load config '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<CrawlError>,
    },

    /// The start URL could not be parsed
    #[error("Invalid start URL '{0}'")]
    InvalidStartUrl(String),

    /// The start URL parsed but the scope policy refuses it
    #[error("Start URL '{url}' is not eligible: {reason}")]
    StartUrlRejected { url: String, reason: Rejection },

    /// Writing a report checkpoint failed
    #[error("Failed to persist report to '{}': {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: Box<CrawlError>,
    },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
