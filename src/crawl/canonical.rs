// src/crawl/canonical.rs
// =============================================================================
// URL canonicalization.
//
// Every link we find goes through here before anything else looks at it. The
// canonical form is the crawler's identity key: two hrefs that end up as the
// same CanonicalUrl are the same page as far as the frontier and the visited
// set are concerned.
//
// Canonical form:
// - absolute (relative hrefs resolved against the page they came from)
// - no fragment (#section is client-side only)
// - lower-cased host
//
// The url crate also drops default ports (:80 / :443) when it serializes.
// Trailing slashes and query parameter order are left alone.
// =============================================================================

use std::fmt;

use url::Url;

// A URL in canonical form. Only canonicalize() builds these, so holding one
// means the string is absolute, fragment-free and has a lower-case host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Host part of the URL (e.g. "www.ics.uci.edu"), if it has one
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.0)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Resolves `raw_href` against `base_url` and returns its canonical form
//
// Returns None when either string can't be parsed as a URL - callers treat
// that as "reject this link".
//
// Examples (base = "https://www.ics.uci.edu/about/"):
//   "people"                    -> https://www.ics.uci.edu/about/people
//   "/faq#top"                  -> https://www.ics.uci.edu/faq
//   "https://WWW.CS.UCI.EDU/x"  -> https://www.cs.uci.edu/x
pub fn canonicalize(base_url: &str, raw_href: &str) -> Option<CanonicalUrl> {
    let base = Url::parse(base_url).ok()?;
    let mut url = base.join(raw_href).ok()?;

    url.set_fragment(None);

    // The url crate already lower-cases hosts for http(s); other schemes keep
    // whatever case they came with, so do it here for those.
    if let Some(host) = url.host_str() {
        if host.chars().any(|c| c.is_ascii_uppercase()) {
            let lower = host.to_ascii_lowercase();
            url.set_host(Some(&lower)).ok()?;
        }
    }

    Some(CanonicalUrl(url.into()))
}

// Canonicalizes an absolute URL on its own (used for the start URL)
pub fn canonicalize_absolute(url: &str) -> Option<CanonicalUrl> {
    Url::parse(url).ok()?;
    canonicalize(url, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.ics.uci.edu/about/index.html";

    #[test]
    fn test_resolve_relative_link() {
        let url = canonicalize(BASE, "people.html").unwrap();
        assert_eq!(url.as_str(), "https://www.ics.uci.edu/about/people.html");
    }

    #[test]
    fn test_resolve_root_relative_link() {
        let url = canonicalize(BASE, "/faq").unwrap();
        assert_eq!(url.as_str(), "https://www.ics.uci.edu/faq");
    }

    #[test]
    fn test_resolve_parent_link() {
        let url = canonicalize(BASE, "../grad/").unwrap();
        assert_eq!(url.as_str(), "https://www.ics.uci.edu/grad/");
    }

    #[test]
    fn test_strips_fragment() {
        let url = canonicalize(BASE, "/faq#admissions").unwrap();
        assert_eq!(url.as_str(), "https://www.ics.uci.edu/faq");

        // A bare fragment points back at the page itself
        let url = canonicalize(BASE, "#top").unwrap();
        assert_eq!(url.as_str(), BASE);
    }

    #[test]
    fn test_lowercases_host_but_not_path() {
        let url = canonicalize(BASE, "https://WWW.Stat.UCI.edu/Courses/").unwrap();
        assert_eq!(url.as_str(), "https://www.stat.uci.edu/Courses/");
    }

    #[test]
    fn test_drops_default_port() {
        let url = canonicalize(BASE, "http://www.cs.uci.edu:80/x").unwrap();
        assert_eq!(url.as_str(), "http://www.cs.uci.edu/x");
    }

    #[test]
    fn test_keeps_query_and_trailing_slash_as_is() {
        let a = canonicalize(BASE, "/search?b=2&a=1").unwrap();
        assert_eq!(a.as_str(), "https://www.ics.uci.edu/search?b=2&a=1");

        let with_slash = canonicalize(BASE, "/grad/").unwrap();
        let without = canonicalize(BASE, "/grad").unwrap();
        assert_ne!(with_slash, without);
    }

    #[test]
    fn test_idempotent() {
        let hrefs = [
            "people.html",
            "/faq#x",
            "https://GRAD.ics.uci.edu/a/../b?q=1#frag",
            "//www.informatics.uci.edu/",
            "mailto:someone@uci.edu",
        ];
        for href in hrefs {
            let once = canonicalize(BASE, href).unwrap();
            let twice = canonicalize(once.as_str(), once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {href}");
            // Resolving against any other base doesn't change an absolute URL
            let again = canonicalize("https://example.com/", once.as_str()).unwrap();
            assert_eq!(once, again);
        }
    }

    #[test]
    fn test_invalid_input_is_none() {
        assert!(canonicalize("not a url", "/faq").is_none());
        assert!(canonicalize(BASE, "http://[::1").is_none());
        assert!(canonicalize_absolute("/relative/only").is_none());
    }

    #[test]
    fn test_host_accessor() {
        let url = canonicalize_absolute("https://Grad.ICS.uci.edu/x").unwrap();
        assert_eq!(url.host().as_deref(), Some("grad.ics.uci.edu"));
    }
}
