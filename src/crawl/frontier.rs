// src/crawl/frontier.rs
// =============================================================================
// The frontier (URLs waiting to be fetched) and the visited set (URLs already
// taken off the frontier).
//
// Each URL moves one way: unseen -> queued -> visited.
//
// - discover() moves unseen -> queued. A URL that is already queued or
//   visited is left alone, so the queue never holds duplicates.
// - dequeue() moves queued -> visited. This is the only place a URL enters
//   the visited set, so a URL can be discovered any number of times but is
//   handed out for fetching once.
//
// The queue is FIFO, which makes the crawl breadth-first.
//
// Scope/trap filtering is not done here; the crawler filters before calling
// discover().
// =============================================================================

use std::collections::{HashSet, VecDeque};

use super::canonical::CanonicalUrl;

// What discover() did with a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    Queued,
    AlreadyQueued,
    AlreadyVisited,
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CanonicalUrl>,
    queued: HashSet<CanonicalUrl>,
    visited: HashSet<CanonicalUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discover(&mut self, url: CanonicalUrl) -> Discovery {
        if self.visited.contains(&url) {
            return Discovery::AlreadyVisited;
        }
        if self.queued.contains(&url) {
            return Discovery::AlreadyQueued;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        Discovery::Queued
    }

    // Pops the oldest queued URL and marks it visited
    pub fn dequeue(&mut self) -> Option<CanonicalUrl> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    #[cfg(test)]
    fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    #[cfg(test)]
    fn is_queued(&self, url: &CanonicalUrl) -> bool {
        self.queued.contains(url)
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    // Visited URLs, sorted
    pub fn into_visited(self) -> Vec<CanonicalUrl> {
        let mut visited: Vec<_> = self.visited.into_iter().collect();
        visited.sort();
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::canonical::canonicalize_absolute;

    fn url(s: &str) -> CanonicalUrl {
        canonicalize_absolute(s).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut f = Frontier::new();
        f.discover(url("https://a.ics.uci.edu/1"));
        f.discover(url("https://a.ics.uci.edu/2"));
        f.discover(url("https://a.ics.uci.edu/3"));

        assert_eq!(f.dequeue().unwrap().as_str(), "https://a.ics.uci.edu/1");
        assert_eq!(f.dequeue().unwrap().as_str(), "https://a.ics.uci.edu/2");
        assert_eq!(f.dequeue().unwrap().as_str(), "https://a.ics.uci.edu/3");
        assert!(f.dequeue().is_none());
    }

    #[test]
    fn test_no_duplicates_in_queue() {
        let mut f = Frontier::new();
        assert_eq!(f.discover(url("https://a.ics.uci.edu/")), Discovery::Queued);
        assert_eq!(f.discover(url("https://a.ics.uci.edu/")), Discovery::AlreadyQueued);
        assert_eq!(f.queued_len(), 1);
    }

    #[test]
    fn test_visited_only_on_dequeue() {
        let mut f = Frontier::new();
        let a = url("https://a.ics.uci.edu/");
        f.discover(a.clone());
        assert!(f.is_queued(&a));
        assert!(!f.is_visited(&a));
        assert_eq!(f.visited_len(), 0);

        f.dequeue();
        assert!(!f.is_queued(&a));
        assert!(f.is_visited(&a));
        assert_eq!(f.visited_len(), 1);
    }

    #[test]
    fn test_visited_urls_are_never_requeued() {
        let mut f = Frontier::new();
        let a = url("https://a.ics.uci.edu/");
        f.discover(a.clone());
        f.dequeue();

        assert_eq!(f.discover(a.clone()), Discovery::AlreadyVisited);
        assert!(f.is_empty());
        assert!(f.dequeue().is_none());
    }

    #[test]
    fn test_each_url_dequeued_once() {
        let mut f = Frontier::new();
        let urls: Vec<_> = (0..5).map(|i| url(&format!("https://a.ics.uci.edu/{i}"))).collect();

        // Discover every URL several times, interleaved with dequeues
        let mut handed_out = Vec::new();
        for round in 0..3 {
            for u in &urls {
                f.discover(u.clone());
            }
            if round > 0 {
                while let Some(u) = f.dequeue() {
                    handed_out.push(u);
                }
            }
        }

        assert_eq!(handed_out.len(), urls.len());
        let unique: HashSet<_> = handed_out.iter().collect();
        assert_eq!(unique.len(), urls.len());
        assert_eq!(f.into_visited().len(), urls.len());
    }
}
