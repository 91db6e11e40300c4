// src/crawl/crawler.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Start with the start URL in the frontier
// 2. Take the next URL off the frontier (this marks it visited)
// 3. Fetch it, waiting first if its host was contacted too recently
// 4. Run the content gate; if the page passes, extract text and links
// 5. Record statistics (if the word count is in range) and maybe checkpoint
// 6. Canonicalize and filter each link; survivors go to the frontier
// 7. Repeat until the frontier is empty or the page budget is spent
// 8. Write the final report checkpoint
//
// Nothing that happens to a single page stops the crawl. A failed fetch, a
// rejected page, or a bad link is logged and skipped.
//
// With workers > 1 the loop takes a wave of up to `workers` URLs from the
// frontier and fetches them concurrently. Results are handled in the order
// the URLs were dequeued, so the frontier fills in the same order as a
// sequential crawl. Only this loop touches the frontier. Statistics and
// checkpoints are shared between pages and guard themselves.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::canonical::{canonicalize, canonicalize_absolute, CanonicalUrl};
use super::filter::{Rejection, ScopePolicy};
use super::frontier::{Discovery, Frontier};
use super::gate::{ContentGate, TextVerdict};
use super::politeness::Politeness;
use crate::config::Config;
use crate::error::{CrawlError, Result};
use crate::fetch::{self, Fetcher};
use crate::report::{Checkpointer, ReportStore};
use crate::stats::{tokenize, CrawlReport, StatsAggregator};

// What happened to one dequeued URL
#[derive(Debug)]
enum PageOutcome {
    // The request itself failed
    Failed,
    // Fetched, but the content gate refused to parse it
    Skipped,
    // Redirected somewhere the scope policy rejects
    Redirected,
    // Parsed. `links` are raw hrefs, resolved against `base`.
    Parsed {
        base: String,
        links: Vec<String>,
        verdict: TextVerdict,
    },
}

// Totals for a finished crawl
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlSummary {
    /// URLs taken off the frontier (fetch attempts)
    pub pages_fetched: usize,
    /// Pages counted in statistics
    pub pages_accepted: usize,
    /// Requests that failed outright
    pub fetch_failures: usize,
    /// Pages the content gate refused to parse
    pub pages_skipped: usize,
    /// Pages whose redirect target failed the scope policy
    pub redirects_out_of_scope: usize,
    /// Parsed pages outside the word-count band
    pub pages_out_of_band: usize,
    /// Links added to the frontier
    pub links_queued: usize,
    /// Links refused by the canonicalizer or the scope filter
    pub links_rejected: usize,
    /// Report checkpoints written (including the final one)
    pub checkpoints_written: usize,
    /// Report checkpoints that failed to write
    pub checkpoint_failures: usize,
    /// Every URL that was dequeued, sorted
    pub visited: Vec<String>,
    /// The final report
    pub report: CrawlReport,
}

pub struct Crawler<F, S> {
    fetcher: F,
    policy: ScopePolicy,
    gate: ContentGate,
    politeness: Politeness,
    stats: StatsAggregator,
    checkpointer: Checkpointer<S>,
    max_pages: usize,
    workers: usize,
}

impl<F: Fetcher, S: ReportStore> Crawler<F, S> {
    pub fn new(config: &Config, fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            policy: ScopePolicy::new(&config.scope),
            gate: ContentGate::new(config.gate.clone()),
            politeness: Politeness::new(config.crawl.politeness_delay()),
            stats: StatsAggregator::new(),
            checkpointer: Checkpointer::new(store, config.report.checkpoint_every),
            max_pages: config.crawl.max_pages,
            workers: config.crawl.workers.max(1),
        }
    }

    pub fn checkpointer(&self) -> &Checkpointer<S> {
        &self.checkpointer
    }

    // Crawls from `start_url` until the frontier runs dry or `max_pages`
    // URLs have been dequeued, then writes the final report
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlSummary> {
        let start = canonicalize_absolute(start_url)
            .ok_or_else(|| CrawlError::InvalidStartUrl(start_url.to_string()))?;
        self.policy
            .evaluate(start.as_str())
            .map_err(|reason| CrawlError::StartUrlRejected {
                url: start.to_string(),
                reason,
            })?;

        info!(
            start = %start,
            max_pages = self.max_pages,
            workers = self.workers,
            politeness = self.politeness.is_enabled(),
            "starting crawl"
        );

        let mut frontier = Frontier::new();
        frontier.discover(start);
        let mut summary = CrawlSummary::default();

        loop {
            let wave = self.next_wave(&mut frontier);
            if wave.is_empty() {
                break;
            }

            let outcomes: Vec<PageOutcome> =
                stream::iter(wave.iter().map(|url| self.process_page(url)))
                    .buffered(self.workers)
                    .collect()
                    .await;

            for outcome in outcomes {
                summary.pages_fetched += 1;
                match outcome {
                    PageOutcome::Failed => summary.fetch_failures += 1,
                    PageOutcome::Skipped => summary.pages_skipped += 1,
                    PageOutcome::Redirected => summary.redirects_out_of_scope += 1,
                    PageOutcome::Parsed {
                        base,
                        links,
                        verdict,
                    } => {
                        if verdict == TextVerdict::Record {
                            summary.pages_accepted += 1;
                        } else {
                            summary.pages_out_of_band += 1;
                        }
                        if self.gate.follows_links(verdict) {
                            for href in &links {
                                self.admit(&mut frontier, &base, href, &mut summary);
                            }
                        }
                    }
                }
            }

            info!(
                visited = frontier.visited_len(),
                queued = frontier.queued_len(),
                accepted = summary.pages_accepted,
                "progress"
            );
        }

        self.checkpointer.final_checkpoint(&self.stats);

        summary.checkpoints_written = self.checkpointer.written();
        summary.checkpoint_failures = self.checkpointer.failed();
        summary.report = self.stats.snapshot();
        summary.visited = frontier
            .into_visited()
            .into_iter()
            .map(CanonicalUrl::into_string)
            .collect();

        info!(
            fetched = summary.pages_fetched,
            accepted = summary.pages_accepted,
            failures = summary.fetch_failures,
            "crawl complete"
        );

        Ok(summary)
    }

    // Dequeues up to `workers` URLs without going over the page budget
    fn next_wave(&self, frontier: &mut Frontier) -> Vec<CanonicalUrl> {
        let mut wave = Vec::with_capacity(self.workers);
        while wave.len() < self.workers && frontier.visited_len() < self.max_pages {
            match frontier.dequeue() {
                Some(url) => wave.push(url),
                None => break,
            }
        }
        wave
    }

    // Fetches and processes one page. Statistics and checkpoints are applied
    // here; link admission is left to the crawl loop.
    async fn process_page(&self, url: &CanonicalUrl) -> PageOutcome {
        if let Some(host) = url.host() {
            self.politeness.wait(&host).await;
        }

        info!(url = %url, "crawling");

        let page = match self.fetcher.fetch(url.as_str()).await {
            Ok(page) => page,
            Err(CrawlError::Http(e)) => {
                warn!(url = %url, kind = fetch::classify_error(&e), error = %e, "fetch failed");
                return PageOutcome::Failed;
            }
            Err(e) => {
                warn!(url = %url, error = %e, "fetch failed");
                return PageOutcome::Failed;
            }
        };

        if page.final_url != url.as_str() {
            if let Err(reason) = self.check_redirect(&page.final_url) {
                debug!(
                    url = %url,
                    target = %page.final_url,
                    reason = %reason,
                    "redirect left scope"
                );
                return PageOutcome::Redirected;
            }
        }

        if let Err(rejection) = self.gate.should_extract(&page) {
            debug!(url = %url, reason = %rejection, "page not parsed");
            return PageOutcome::Skipped;
        }

        let body = page.text();
        let links = fetch::parse_links(&body);
        let tokens = tokenize(&fetch::extract_text(&body));
        let words = tokens.len();

        let verdict = self.gate.check_word_count(words);
        match verdict {
            TextVerdict::Record => {
                if self.stats.record_tokens(url.as_str(), tokens).is_some() {
                    self.checkpointer.maybe_checkpoint(&self.stats);
                }
            }
            TextVerdict::TooShort | TextVerdict::TooLong => {
                debug!(url = %url, words, verdict = ?verdict, "page left out of statistics");
            }
        }

        PageOutcome::Parsed {
            base: page.final_url,
            links,
            verdict,
        }
    }

    // A redirect target must pass the same policy as a link
    fn check_redirect(&self, final_url: &str) -> std::result::Result<(), Rejection> {
        let target = canonicalize_absolute(final_url).ok_or(Rejection::InvalidUrl)?;
        self.policy.evaluate(target.as_str())
    }

    // Canonicalizes one href, filters it, and queues it if it's new
    fn admit(&self, frontier: &mut Frontier, base: &str, href: &str, summary: &mut CrawlSummary) {
        let Some(url) = canonicalize(base, href) else {
            debug!(href, "malformed link");
            summary.links_rejected += 1;
            return;
        };

        if let Err(reason) = self.policy.evaluate(url.as_str()) {
            debug!(url = %url, reason = %reason, "link rejected");
            summary.links_rejected += 1;
            return;
        }

        if frontier.discover(url) == Discovery::Queued {
            summary.links_queued += 1;
        }
    }
}
