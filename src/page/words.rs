// src/page/words.rs
// =============================================================================
// Word frequencies for the visible text of a page.
//
// Text nodes are joined in document order with nothing in between, then
// lowercased and split on whitespace. Punctuation stays attached to its
// word, so "risk" and "risk." are counted separately.
// =============================================================================

use scraper::{Html, Node};
use std::collections::BTreeMap;

// Elements whose text content never shows up on screen
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

// Counts lowercase whitespace-separated tokens of the page's visible text
//
// A BTreeMap keeps the keys sorted, which is the order they are written
// to word_count.json in.
pub fn word_count(document: &Html) -> BTreeMap<String, usize> {
    let mut freq = BTreeMap::new();

    for word in visible_text(document).to_lowercase().split_whitespace() {
        *freq.entry(word.to_string()).or_insert(0) += 1;
    }

    freq
}

fn visible_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(fragment) = node.value() {
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
                _ => false,
            });
            if !hidden {
                text.push_str(fragment);
            }
        }
    }

    text
}
