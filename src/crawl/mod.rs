// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Features:
// - Breadth-first crawling from a start URL (each URL fetched at most once)
// - Scope restriction to a set of allowed domains and their subdomains
// - Trap avoidance (calendar/pagination loops, known trap patterns)
// - Content gating before parsing and before counting statistics
// - Per-host politeness delay
//
// Submodules:
// - canonical: URL canonicalization (the identity key for dedup)
// - filter: scope & trap policy
// - gate: content gate
// - frontier: the queue and the visited set
// - politeness: per-host rate limiting
// - crawler: the crawl loop tying it all together
// =============================================================================

mod canonical;
mod crawler;
mod filter;
mod frontier;
mod gate;
mod politeness;

pub use canonical::{canonicalize, canonicalize_absolute, CanonicalUrl};
pub use crawler::{CrawlSummary, Crawler};
pub use filter::{Rejection, ScopePolicy};
pub use frontier::{Discovery, Frontier};
pub use gate::{ContentGate, PageRejection, TextVerdict};
pub use politeness::Politeness;
