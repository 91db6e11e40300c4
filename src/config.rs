// src/config.rs
// =============================================================================
// Crawler configuration.
//
// All policy lives here: which domains are in scope, which URL patterns are
// traps, how big and how wordy a page may be, how fast we crawl, and where
// the report goes. Defaults reproduce the UCI crawl (four school domains,
// 500ms politeness, checkpoint every 50 pages).
//
// A JSON file can override any part of it. Every section has
// #[serde(default)], so a file only needs the keys it changes:
//
//   {
//     "scope": { "allowed_domains": ["example.org"] },
//     "crawl": { "max_pages": 200, "workers": 4 }
//   }
//
// Command-line flags are applied on top of the file (see main.rs).
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CrawlError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scope: ScopeConfig,
    pub gate: GateConfig,
    pub crawl: CrawlSettings,
    pub report: ReportConfig,
}

impl Config {
    // Loads a config file, falling back to defaults for anything it omits
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: CrawlError| CrawlError::Config {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let text = std::fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        serde_json::from_str(&text).map_err(|e| wrap(e.into()))
    }

    // Default config, or the given file if there is one
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

// One entry in the trap table: a case-insensitive substring and why it's a trap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapRule {
    pub pattern: String,
    pub reason: String,
}

impl TrapRule {
    pub fn new(pattern: &str, reason: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Root domains; each one also admits its dot-separated subdomains
    pub allowed_domains: Vec<String>,
    /// Substrings that mark a URL as a crawler trap
    pub trap_rules: Vec<TrapRule>,
    /// Query parameters that loop when given a numeric value (page=3, month=11)
    pub loop_params: Vec<String>,
    /// File extensions that are never HTML pages
    pub blocked_extensions: Vec<String>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            allowed_domains: ["ics.uci.edu", "cs.uci.edu", "informatics.uci.edu", "stat.uci.edu"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            trap_rules: vec![
                TrapRule::new("?ical", "iCal export, one download per event"),
                TrapRule::new("tribe", "events-calendar plugin views page through dates forever"),
                TrapRule::new("calendar", "calendar views generate unbounded date pages"),
                TrapRule::new("?filter", "filtered listings repeat the same content"),
                TrapRule::new("?share=", "social share redirects"),
                TrapRule::new("replytocom=", "comment reply forms duplicate the post"),
                TrapRule::new("/wp-json/", "WordPress REST API, not pages"),
            ],
            loop_params: vec!["page".to_string(), "month".to_string()],
            blocked_extensions: DEFAULT_BLOCKED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

// Binary, media, archive and document formats
const DEFAULT_BLOCKED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx",
    "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar", "gz",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Bodies larger than this are not parsed at all
    pub max_body_bytes: usize,
    /// Pages with fewer words are not counted in statistics
    pub min_words: usize,
    /// Pages with more words are not counted in statistics
    pub max_words: usize,
    /// Whether links on pages over `max_words` are still followed
    pub follow_links_when_too_long: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 5 * 1024 * 1024,
            min_words: 50,
            max_words: 100_000,
            follow_links_when_too_long: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Stop after this many URLs have been dequeued
    pub max_pages: usize,
    /// Minimum time between two requests to the same host (milliseconds)
    pub politeness_delay_ms: u64,
    /// Pages fetched concurrently (1 = strictly sequential)
    pub workers: usize,
    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl CrawlSettings {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            politeness_delay_ms: 500,
            workers: 1,
            request_timeout_secs: 10,
            user_agent: format!("scoped-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where the JSON report is written (overwritten on every checkpoint)
    pub output: PathBuf,
    /// Write a checkpoint every N accepted pages (0 = only at the end)
    pub checkpoint_every: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("crawler_report.json"),
            checkpoint_every: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scope.allowed_domains.len(), 4);
        assert!(config.scope.blocked_extensions.contains(&"pdf".to_string()));
        assert_eq!(config.report.checkpoint_every, 50);
        assert_eq!(config.crawl.workers, 1);
        assert_eq!(config.crawl.politeness_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "scope": {{ "allowed_domains": ["example.org"] }},
                "crawl": {{ "max_pages": 20 }}
            }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scope.allowed_domains, vec!["example.org"]);
        // Trap table wasn't mentioned, so the default one is used
        assert!(!config.scope.trap_rules.is_empty());
        assert_eq!(config.crawl.max_pages, 20);
        assert_eq!(config.crawl.workers, 1);
        assert_eq!(config.gate.min_words, 50);
    }

    #[test]
    fn test_trap_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "scope": {{ "trap_rules": [{{ "pattern": "/archive/", "reason": "old listing" }}] }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scope.trap_rules, vec![TrapRule::new("/archive/", "old listing")]);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, CrawlError::Config { .. }));

        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CrawlError::Config { .. }));
    }
}
