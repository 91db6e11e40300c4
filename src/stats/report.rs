// src/stats/report.rs
// =============================================================================
// The crawl report: a read-only snapshot of the aggregator.
//
// Serialized as pretty JSON. Keys are stable and maps are sorted, so two
// checkpoints diff cleanly:
//
//   {
//     "longest_page": { "url": "https://...", "word_count": 5120 },
//     "num_unique_pages": 812,
//     "unique_subdomains": 37,
//     "subdomain_counts": { "grad.ics.uci.edu": 14, ... },
//     "top_50_words": [["research", 4410], ["students", 3987], ...]
//   }
// =============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// One accepted page and its (stop-word free) word count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Page with the most words (None until a page is recorded)
    pub longest_page: Option<PageRecord>,
    /// Accepted pages
    #[serde(rename = "num_unique_pages")]
    pub page_count: usize,
    /// Distinct hosts among accepted pages
    #[serde(rename = "unique_subdomains")]
    pub subdomain_count: usize,
    /// Host -> accepted pages on that host
    #[serde(rename = "subdomain_counts")]
    pub subdomains: BTreeMap<String, usize>,
    /// Up to 50 (word, count) pairs, most frequent first
    #[serde(rename = "top_50_words")]
    pub top_words: Vec<(String, usize)>,
}

impl CrawlReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
