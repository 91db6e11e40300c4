// src/crawl/filter.rs
// =============================================================================
// Scope & trap filtering: decides whether a canonical URL may enter the
// frontier.
//
// Checks run in a fixed order and stop at the first failure:
// 1. scheme is http or https
// 2. host is one of the allowed root domains or a subdomain of one
// 3. URL contains none of the configured trap substrings
// 4. query has no pagination/calendar loop parameter (page=3, month=11, ...)
// 5. path doesn't end in a blocked file extension
//
// Everything the filter knows comes from ScopeConfig, so the rules are data:
// trap patterns come as a (pattern -> reason) table, and each rejection says
// which rule fired. Missing a trap is tolerable; rejecting real pages is not,
// so keep trap patterns specific.
// =============================================================================

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::{ScopeConfig, TrapRule};

// Why a URL was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The string doesn't parse as a URL
    InvalidUrl,
    /// Scheme other than http/https
    Scheme(String),
    /// Host outside every allowed domain (or no host at all)
    OutOfScope(String),
    /// Matched a configured trap pattern
    Trap { pattern: String, reason: String },
    /// Query has `<param>=<digits>` for a loop parameter
    QueryLoop { param: String },
    /// Path ends in a blocked file extension
    BlockedExtension(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidUrl => write!(f, "invalid URL"),
            Rejection::Scheme(scheme) => write!(f, "unsupported scheme '{}'", scheme),
            Rejection::OutOfScope(host) => write!(f, "host '{}' is out of scope", host),
            Rejection::Trap { pattern, reason } => {
                write!(f, "trap pattern '{}' ({})", pattern, reason)
            }
            Rejection::QueryLoop { param } => {
                write!(f, "pagination/calendar loop on '{}='", param)
            }
            Rejection::BlockedExtension(ext) => write!(f, "blocked file type '.{}'", ext),
        }
    }
}

// The compiled scope policy. Built once from config at startup.
#[derive(Debug, Clone)]
pub struct ScopePolicy {
    allowed_domains: Vec<String>,
    // (lower-cased pattern, original rule)
    traps: Vec<(String, TrapRule)>,
    loop_params: HashSet<String>,
    blocked_extensions: HashSet<String>,
}

impl ScopePolicy {
    pub fn new(config: &ScopeConfig) -> Self {
        let allowed_domains = config
            .allowed_domains
            .iter()
            .map(|d| d.trim().trim_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let traps = config
            .trap_rules
            .iter()
            .filter(|rule| !rule.pattern.is_empty())
            .map(|rule| (rule.pattern.to_lowercase(), rule.clone()))
            .collect();

        let loop_params = config
            .loop_params
            .iter()
            .map(|p| p.to_ascii_lowercase())
            .collect();

        let blocked_extensions = config
            .blocked_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Self {
            allowed_domains,
            traps,
            loop_params,
            blocked_extensions,
        }
    }

    // true if the URL may be queued
    pub fn is_eligible(&self, url: &str) -> bool {
        self.evaluate(url).is_ok()
    }

    // Runs all five checks; Err carries the first one that failed
    pub fn evaluate(&self, url: &str) -> Result<(), Rejection> {
        let parsed = Url::parse(url).map_err(|_| Rejection::InvalidUrl)?;

        // 1. Scheme
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(Rejection::Scheme(other.to_string())),
        }

        // 2. Domain scope
        let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.host_in_scope(&host) {
            return Err(Rejection::OutOfScope(host));
        }

        // 3. Trap substrings, against the full URL
        let lowered = url.to_lowercase();
        if let Some((pattern, rule)) = self
            .traps
            .iter()
            .find(|(p, _)| lowered.contains(p.as_str()))
        {
            return Err(Rejection::Trap {
                pattern: pattern.clone(),
                reason: rule.reason.clone(),
            });
        }

        // 4. Pagination / calendar loops
        for (key, value) in parsed.query_pairs() {
            let key = key.to_ascii_lowercase();
            if self.loop_params.contains(&key)
                && !value.is_empty()
                && value.chars().all(|c| c.is_ascii_digit())
            {
                return Err(Rejection::QueryLoop { param: key });
            }
        }

        // 5. File extension on the last path segment
        if let Some(ext) = path_extension(parsed.path()) {
            if self.blocked_extensions.contains(&ext) {
                return Err(Rejection::BlockedExtension(ext));
            }
        }

        Ok(())
    }

    // Dot-boundary match: "ics.uci.edu" and "*.ics.uci.edu" pass,
    // "notics.uci.edu" doesn't.
    fn host_in_scope(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.');
        if host.is_empty() {
            return false;
        }
        self.allowed_domains.iter().any(|domain| {
            host == domain
                || (host.len() > domain.len()
                    && host.ends_with(domain.as_str())
                    && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
        })
    }
}

// Lower-cased extension of the last path segment, if it has one
fn path_extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
