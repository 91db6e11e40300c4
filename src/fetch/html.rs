// src/fetch/html.rs
// =============================================================================
// Pulls hyperlinks and visible text out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, so broken markup is fine)
// - Supports CSS selectors for finding elements
//
// Links come back raw (exactly what the href says). Resolving and
// normalizing them is the canonicalizer's job.
// =============================================================================

use scraper::{Html, Node, Selector};

// Elements whose text never renders on the page
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

// Returns the raw href of every <a href> in the page, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a> <a href='#top'>Top</a>"
//   result = ["/docs", "#top"]
pub fn parse_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" = all <a> tags that have an href attribute
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

// Returns the page's visible text, one space between text nodes
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| INVISIBLE.contains(&element.name()));
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    pieces.join(" ")
}
