// src/fetch/mod.rs
// =============================================================================
// Talking to the outside world: getting pages and taking them apart.
//
// Submodules:
// - http: fetches pages with reqwest (HttpFetcher)
// - html: pulls hyperlinks and visible text out of HTML with scraper
//
// The crawler only depends on the Fetcher trait, so tests can swap in an
// in-memory site instead of the network.
// =============================================================================

mod html;
mod http;

use std::future::Future;

use crate::error::Result;

pub use html::{extract_text, parse_links};
pub use http::{classify_error, HttpFetcher};

// A fetched response, reduced to what the crawler looks at
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// URL after redirects (relative links resolve against this)
    pub final_url: String,
    /// Declared Content-Type header, if any
    pub content_type: Option<String>,
    /// Raw body bytes (empty or truncated if the body wasn't worth reading)
    pub body: Vec<u8>,
    /// Body length: bytes read, or the declared length if reading was skipped
    pub body_size: usize,
}

impl FetchedPage {
    // A fully read response
    pub fn new(
        status: u16,
        final_url: String,
        content_type: Option<String>,
        body: Vec<u8>,
    ) -> Self {
        let body_size = body.len();
        Self {
            status,
            final_url,
            content_type,
            body,
            body_size,
        }
    }

    // Body as text; invalid UTF-8 is replaced rather than rejected
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// Content types treated as HTML
const HTML_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

// "text/html; charset=utf-8" -> true
pub fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    HTML_TYPES.contains(&mime.as_str())
}

// Anything that can turn a URL into a FetchedPage
//
// Non-2xx responses are Ok (the content gate decides what to do with them);
// Err means the request itself failed.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage>> + Send;
}
