// src/fetch/http.rs
// =============================================================================
// Fetches pages over HTTP with reqwest.
//
// - One Client for the whole crawl (connection pooling)
// - Configured timeout and user agent
// - Follows up to 5 redirects; final_url records where we ended up
// - Non-2xx responses come back as Ok with their status - the content gate
//   rejects them. Only transport failures are errors.
// - The body is only read for 2xx HTML (or untyped) responses, and reading
//   stops once it passes max_body_bytes. Anything skipped or cut short keeps
//   its size in body_size so the gate can reject it.
//
// When a request fails, classify_error() names the failure in a short,
// log-friendly way (timeout, DNS, TLS, ...).
// =============================================================================

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use tracing::debug;

use super::{is_html, FetchedPage, Fetcher};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str, max_body_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    // Reads the body chunk by chunk, giving up once it passes the ceiling.
    // Returns the bytes read and whether the whole body was read.
    async fn read_capped(&self, response: &mut Response) -> Result<(Vec<u8>, bool)> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > self.max_body_bytes {
                return Ok((body, false));
            }
        }
        Ok((body, true))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let declared = response
            .content_length()
            .and_then(|len| usize::try_from(len).ok());

        let wanted = response.status().is_success()
            && content_type.as_deref().map_or(true, is_html)
            && declared.map_or(true, |len| len <= self.max_body_bytes);

        let (body, body_size) = if wanted {
            let (body, complete) = self.read_capped(&mut response).await?;
            if !complete {
                debug!(
                    url = %final_url,
                    limit = self.max_body_bytes,
                    "body over limit, stopped reading"
                );
            }
            let size = body.len();
            (body, size)
        } else {
            (Vec::new(), declared.unwrap_or(0))
        };

        Ok(FetchedPage {
            status,
            final_url,
            content_type,
            body,
            body_size,
        })
    }
}

// Short description of why a request failed, for logs
pub fn classify_error(error: &reqwest::Error) -> &'static str {
    let text = error.to_string().to_lowercase();

    if error.is_timeout() {
        "timeout"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_connect() {
        if text.contains("dns") {
            "dns error"
        } else {
            "connection failed"
        }
    } else if text.contains("certificate") || text.contains("ssl") || text.contains("tls") {
        "tls error"
    } else if error.is_body() || error.is_decode() {
        "body read failed"
    } else {
        "request failed"
    }
}
