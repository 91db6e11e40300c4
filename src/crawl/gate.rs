// src/crawl/gate.rs
// =============================================================================
// Content gate: two checks that decide what a fetched page contributes.
//
// 1. should_extract() runs before any parsing. Failed requests, non-HTML
//    content, and huge or empty bodies are dropped here. Nothing is taken
//    from them: no links, no statistics. The size check uses body_size, since
//    the fetcher stops reading once a body passes the ceiling.
//
// 2. check_word_count() runs after text extraction. It only decides whether
//    the page counts toward statistics:
//    - too few words: parked/error page. Skip the stats, still follow links.
//    - too many words: data dump or generated page. Skip the stats, and follow
//      links only if config says so.
// =============================================================================

use std::fmt;

use crate::config::GateConfig;
use crate::fetch::{is_html, FetchedPage};

// Why a fetched page was not parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRejection {
    /// Non-2xx status code
    Status(u16),
    /// 2xx with no body
    EmptyBody,
    /// Body over the configured ceiling
    TooLarge { size: usize, limit: usize },
    /// Declared content type isn't HTML
    NotHtml(String),
}

impl fmt::Display for PageRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageRejection::Status(code) => write!(f, "HTTP {}", code),
            PageRejection::EmptyBody => write!(f, "empty body"),
            PageRejection::TooLarge { size, limit } => {
                write!(f, "body is {} bytes (limit {})", size, limit)
            }
            PageRejection::NotHtml(content_type) => write!(f, "content type '{}'", content_type),
        }
    }
}

// Outcome of the word-count check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVerdict {
    /// Count this page in statistics
    Record,
    /// Below the floor
    TooShort,
    /// Above the ceiling
    TooLong,
}

#[derive(Debug, Clone)]
pub struct ContentGate {
    config: GateConfig,
}

impl ContentGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    // Pre-parse check on the raw response
    pub fn should_extract(&self, page: &FetchedPage) -> Result<(), PageRejection> {
        if !(200..300).contains(&page.status) {
            return Err(PageRejection::Status(page.status));
        }

        // No header at all: let the parser have a go
        if let Some(content_type) = &page.content_type {
            if !is_html(content_type) {
                return Err(PageRejection::NotHtml(content_type.clone()));
            }
        }

        if page.body_size > self.config.max_body_bytes {
            return Err(PageRejection::TooLarge {
                size: page.body_size,
                limit: self.config.max_body_bytes,
            });
        }

        if page.body.is_empty() {
            return Err(PageRejection::EmptyBody);
        }

        Ok(())
    }

    // Post-extraction check on the page's word count
    pub fn check_word_count(&self, words: usize) -> TextVerdict {
        if words < self.config.min_words {
            TextVerdict::TooShort
        } else if words > self.config.max_words {
            TextVerdict::TooLong
        } else {
            TextVerdict::Record
        }
    }

    // Whether links on a page with this verdict go to the frontier
    pub fn follows_links(&self, verdict: TextVerdict) -> bool {
        match verdict {
            TextVerdict::Record | TextVerdict::TooShort => true,
            TextVerdict::TooLong => self.config.follow_links_when_too_long,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: u16, content_type: Option<&str>, body: &str) -> FetchedPage {
        FetchedPage::new(
            status,
            "https://www.ics.uci.edu/".to_string(),
            content_type.map(str::to_string),
            body.as_bytes().to_vec(),
        )
    }

    fn gate() -> ContentGate {
        ContentGate::new(GateConfig {
            max_body_bytes: 64,
            min_words: 3,
            max_words: 10,
            follow_links_when_too_long: false,
        })
    }

    #[test]
    fn test_accepts_html() {
        let g = gate();
        let utf8 = page(200, Some("text/html; charset=UTF-8"), "<p>hi</p>");
        assert_eq!(g.should_extract(&utf8), Ok(()));
        let xhtml = page(203, Some("application/xhtml+xml"), "<p>hi</p>");
        assert_eq!(g.should_extract(&xhtml), Ok(()));
        assert_eq!(g.should_extract(&page(200, None, "<p>hi</p>")), Ok(()));
    }

    #[test]
    fn test_rejects_bad_status() {
        assert_eq!(
            gate().should_extract(&page(404, Some("text/html"), "<p>gone</p>")),
            Err(PageRejection::Status(404))
        );
        assert_eq!(
            gate().should_extract(&page(301, Some("text/html"), "moved")),
            Err(PageRejection::Status(301))
        );
    }

    #[test]
    fn test_rejects_empty_and_oversized_bodies() {
        let g = gate();
        assert_eq!(
            g.should_extract(&page(200, Some("text/html"), "")),
            Err(PageRejection::EmptyBody)
        );

        let big = "x".repeat(65);
        assert_eq!(
            g.should_extract(&page(200, Some("text/html"), &big)),
            Err(PageRejection::TooLarge { size: 65, limit: 64 })
        );
    }

    #[test]
    fn test_rejects_body_the_fetcher_stopped_reading() {
        // Declared far over the limit, nothing downloaded
        let mut skipped = page(200, Some("text/html"), "");
        skipped.body_size = 50 * 1024 * 1024;
        assert_eq!(
            gate().should_extract(&skipped),
            Err(PageRejection::TooLarge {
                size: 50 * 1024 * 1024,
                limit: 64
            })
        );
    }

    #[test]
    fn test_non_html_rejected_before_size() {
        let mut binary = page(200, Some("application/octet-stream"), "");
        binary.body_size = 50 * 1024 * 1024;
        assert_eq!(
            gate().should_extract(&binary),
            Err(PageRejection::NotHtml("application/octet-stream".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_html() {
        assert_eq!(
            gate().should_extract(&page(200, Some("application/pdf"), "%PDF-1.4")),
            Err(PageRejection::NotHtml("application/pdf".to_string()))
        );
    }

    #[test]
    fn test_word_count_band() {
        let g = gate();
        assert_eq!(g.check_word_count(2), TextVerdict::TooShort);
        assert_eq!(g.check_word_count(3), TextVerdict::Record);
        assert_eq!(g.check_word_count(10), TextVerdict::Record);
        assert_eq!(g.check_word_count(11), TextVerdict::TooLong);
    }

    #[test]
    fn test_link_following_per_verdict() {
        let g = gate();
        assert!(g.follows_links(TextVerdict::Record));
        assert!(g.follows_links(TextVerdict::TooShort));
        assert!(!g.follows_links(TextVerdict::TooLong));

        let lenient = ContentGate::new(GateConfig::default());
        assert!(lenient.follows_links(TextVerdict::TooLong));
    }
}
