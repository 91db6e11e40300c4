// src/lib.rs
// =============================================================================
// scoped-crawler: a focused web crawler.
//
// From a start URL it fetches pages breadth-first, follows only links that
// pass a scope/trap policy, and builds a report of word and subdomain
// statistics over the pages it accepts.
//
// Modules:
// - crawl: canonicalization, filtering, gating, frontier, the crawl loop
// - fetch: HTTP fetching and HTML link/text extraction
// - stats: word/subdomain counters and the crawl report
// - report: writing the report to disk at checkpoints
// - config: every tunable, loadable from JSON
// - error: the crate's error type
// - logging: tracing subscriber setup
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod report;
pub mod stats;

pub use config::Config;
pub use crawl::{CrawlSummary, Crawler};
pub use error::{CrawlError, Result};
