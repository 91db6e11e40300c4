// src/stats/aggregator.rs
// =============================================================================
// Statistics over accepted pages.
//
// One StatsAggregator per crawl. It owns:
// - a PageRecord (url, word count) for every accepted page
// - host -> page count
// - word -> total count (stop-words already removed by the tokenizer)
// - the longest page so far
//
// record() updates all four under a single lock, so a concurrent snapshot()
// sees either none or all of a page. Pages can be recorded in any order: the
// counters just add, and the longest page only changes on a strictly larger
// count.
// =============================================================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::report::{CrawlReport, PageRecord};
use super::tokenize::tokenize;

// How many words the report lists
pub const TOP_WORDS: usize = 50;

#[derive(Debug, Default)]
struct WordEntry {
    count: usize,
    // Order in which the word was first seen; breaks ties in the report
    first_seen: u64,
}

#[derive(Debug, Default)]
struct AggregateState {
    pages: Vec<PageRecord>,
    recorded_urls: HashSet<String>,
    subdomains: BTreeMap<String, usize>,
    words: HashMap<String, WordEntry>,
    next_word_seq: u64,
    longest: Option<PageRecord>,
}

#[derive(Debug, Default)]
pub struct StatsAggregator {
    state: Mutex<AggregateState>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // Tokenizes `text` and records the page. Returns the page's word count,
    // or None if the URL was already recorded.
    pub fn record(&self, url: &str, text: &str) -> Option<usize> {
        self.record_tokens(url, tokenize(text))
    }

    // Records a page from already-tokenized words
    pub fn record_tokens(&self, url: &str, tokens: Vec<String>) -> Option<usize> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();
        let word_count = tokens.len();

        let mut guard = self.lock();
        let state = &mut *guard;

        if !state.recorded_urls.insert(url.to_string()) {
            return None;
        }

        let record = PageRecord {
            url: url.to_string(),
            word_count,
        };

        *state.subdomains.entry(host).or_insert(0) += 1;

        for token in tokens {
            let seq = state.next_word_seq;
            let entry = state.words.entry(token).or_insert_with(|| WordEntry {
                count: 0,
                first_seen: seq,
            });
            entry.count += 1;
            if entry.first_seen == seq {
                state.next_word_seq += 1;
            }
        }

        let improves = state
            .longest
            .as_ref()
            .map_or(true, |longest| word_count > longest.word_count);
        if improves {
            state.longest = Some(record.clone());
        }

        state.pages.push(record);
        Some(word_count)
    }

    // Builds the report from the current state
    pub fn snapshot(&self) -> CrawlReport {
        let state = self.lock();

        let mut ranked: Vec<(&String, &WordEntry)> = state.words.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        let top_words = ranked
            .into_iter()
            .take(TOP_WORDS)
            .map(|(word, entry)| (word.clone(), entry.count))
            .collect();

        CrawlReport {
            longest_page: state.longest.clone(),
            page_count: state.pages.len(),
            subdomain_count: state.subdomains.len(),
            subdomains: state.subdomains.clone(),
            top_words,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        // Every update completes before the guard drops, so a poisoned lock
        // still holds consistent data
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
