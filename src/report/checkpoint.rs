// src/report/checkpoint.rs
// =============================================================================
// Writes the crawl report to storage as the crawl goes.
//
// - maybe_checkpoint() is called once per accepted page. It writes on every
//   K-th call (K = 50 by default), so a crash loses at most K pages of stats
//   and we don't rewrite the file after every page.
// - final_checkpoint() is called when the crawl ends and always writes.
//
// The page counter is one AtomicUsize, so when several workers finish pages
// at the same moment, each multiple of K still triggers exactly one write.
//
// A failed write is logged and counted, and the crawl goes on. The next
// checkpoint writes the full report again, so nothing is lost for good.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};

use crate::error::{CrawlError, Result};
use crate::stats::{CrawlReport, StatsAggregator};

// Somewhere a report can be written. Each write replaces the previous one.
pub trait ReportStore {
    fn persist(&self, report: &CrawlReport) -> Result<()>;

    // Human-readable location, for logs
    fn describe(&self) -> String;
}

// Writes the report as pretty JSON to a file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    // Write to a sibling temp file, then rename over the target, so readers
    // never see a half-written report
    fn write(&self, report: &CrawlReport) -> Result<()> {
        let json = report.to_json()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ReportStore for JsonFileStore {
    fn persist(&self, report: &CrawlReport) -> Result<()> {
        self.write(report).map_err(|source| CrawlError::Persist {
            path: self.path.clone(),
            source: Box::new(source),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct Checkpointer<S> {
    store: S,
    every: usize,
    accepted: AtomicUsize,
    written: AtomicUsize,
    failed: AtomicUsize,
}

impl<S: ReportStore> Checkpointer<S> {
    // `every` = 0 disables intermediate checkpoints
    pub fn new(store: S, every: usize) -> Self {
        Self {
            store,
            every,
            accepted: AtomicUsize::new(0),
            written: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    // Counts one accepted page; writes a checkpoint if this is the K-th.
    // Returns true if a checkpoint was written.
    pub fn maybe_checkpoint(&self, stats: &StatsAggregator) -> bool {
        let accepted = self.accepted.fetch_add(1, Ordering::SeqCst) + 1;
        if self.every == 0 || accepted % self.every != 0 {
            return false;
        }
        debug!(accepted, "checkpoint due");
        self.persist(stats)
    }

    // Always writes
    pub fn final_checkpoint(&self, stats: &StatsAggregator) -> bool {
        self.persist(stats)
    }

    pub fn written(&self) -> usize {
        self.written.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self, stats: &StatsAggregator) -> bool {
        let report = stats.snapshot();
        match self.store.persist(&report) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::SeqCst);
                info!(
                    pages = report.page_count,
                    destination = %self.store.describe(),
                    "report checkpoint written"
                );
                true
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                warn!(error = %e, "report checkpoint failed, will retry at the next one");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    // Keeps every persisted report in memory
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub reports: Mutex<Vec<CrawlReport>>,
        pub fail: AtomicBool,
    }

    impl MemoryStore {
        pub fn count(&self) -> usize {
            self.reports.lock().unwrap().len()
        }

        pub fn last(&self) -> Option<CrawlReport> {
            self.reports.lock().unwrap().last().cloned()
        }
    }

    impl ReportStore for MemoryStore {
        fn persist(&self, report: &CrawlReport) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CrawlError::Io(std::io::Error::other("disk full")));
            }
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn record_pages(stats: &StatsAggregator, checkpointer: &Checkpointer<MemoryStore>, n: usize) {
        for i in 0..n {
            stats.record(&format!("https://www.ics.uci.edu/page{i}"), "informatics research");
            checkpointer.maybe_checkpoint(stats);
        }
    }

    #[test]
    fn test_checkpoints_every_k_pages_plus_final() {
        let stats = StatsAggregator::new();
        let checkpointer = Checkpointer::new(MemoryStore::default(), 50);

        record_pages(&stats, &checkpointer, 100);
        assert_eq!(checkpointer.store().count(), 2);

        checkpointer.final_checkpoint(&stats);
        assert_eq!(checkpointer.store().count(), 3);
        assert_eq!(checkpointer.written(), 3);
        assert_eq!(checkpointer.store().last().unwrap().page_count, 100);

        let reports = checkpointer.store().reports.lock().unwrap().clone();
        assert_eq!(reports[0].page_count, 50);
        assert_eq!(reports[1].page_count, 100);
    }

    #[test]
    fn test_final_checkpoint_when_not_aligned() {
        let stats = StatsAggregator::new();
        let checkpointer = Checkpointer::new(MemoryStore::default(), 50);

        record_pages(&stats, &checkpointer, 7);
        assert_eq!(checkpointer.store().count(), 0);

        checkpointer.final_checkpoint(&stats);
        assert_eq!(checkpointer.store().last().unwrap().page_count, 7);
    }

    #[test]
    fn test_zero_interval_only_writes_final() {
        let stats = StatsAggregator::new();
        let checkpointer = Checkpointer::new(MemoryStore::default(), 0);
        record_pages(&stats, &checkpointer, 120);
        assert_eq!(checkpointer.store().count(), 0);
        checkpointer.final_checkpoint(&stats);
        assert_eq!(checkpointer.store().count(), 1);
    }

    #[test]
    fn test_failed_checkpoint_does_not_stop_later_ones() {
        let stats = StatsAggregator::new();
        let checkpointer = Checkpointer::new(MemoryStore::default(), 10);

        checkpointer.store().fail.store(true, Ordering::SeqCst);
        record_pages(&stats, &checkpointer, 10);
        assert_eq!(checkpointer.failed(), 1);
        assert_eq!(checkpointer.store().count(), 0);

        checkpointer.store().fail.store(false, Ordering::SeqCst);
        assert!(checkpointer.final_checkpoint(&stats));
        assert_eq!(checkpointer.store().last().unwrap().page_count, 10);
    }

    #[test]
    fn test_concurrent_trigger_fires_once_per_multiple() {
        let stats = std::sync::Arc::new(StatsAggregator::new());
        let checkpointer = std::sync::Arc::new(Checkpointer::new(MemoryStore::default(), 25));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let stats = std::sync::Arc::clone(&stats);
                let checkpointer = std::sync::Arc::clone(&checkpointer);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        stats.record(&format!("https://www.cs.uci.edu/{t}/{i}"), "systems");
                        checkpointer.maybe_checkpoint(&stats);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(checkpointer.store().count(), 4);
    }

    #[test]
    fn test_json_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("crawler_report.json");
        let store = JsonFileStore::new(&path);

        let stats = StatsAggregator::new();
        stats.record("https://www.ics.uci.edu/", "alpha beta");
        store.persist(&stats.snapshot()).unwrap();

        stats.record("https://www.cs.uci.edu/", "gamma");
        store.persist(&stats.snapshot()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let report: CrawlReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.page_count, 2);
        assert_eq!(report.subdomain_count, 2);

        // Only the report itself is left behind
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_json_file_store_failure_is_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        // The parent "directory" is a regular file, so nothing can be written
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let store = JsonFileStore::new(blocker.join("crawler_report.json"));
        let err = store.persist(&CrawlReport::default()).unwrap_err();
        assert!(matches!(err, CrawlError::Persist { .. }));
    }
}
