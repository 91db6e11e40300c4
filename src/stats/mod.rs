// src/stats/mod.rs
// =============================================================================
// Crawl statistics.
//
// Submodules:
// - tokenize: splits page text into counted words
// - aggregator: StatsAggregator, the per-crawl counters
// - report: CrawlReport, the serializable snapshot
// =============================================================================

mod aggregator;
mod report;
mod tokenize;

pub use aggregator::StatsAggregator;
pub use report::{CrawlReport, PageRecord};
pub use tokenize::tokenize;
