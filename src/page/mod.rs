// src/page/mod.rs
// =============================================================================
// This module fetches one web page and answers questions about it.
//
// Submodules:
// - fetch: The Scraper type - one HTTP GET, one parsed document
// - links: External resource references, anchor hrefs, privacy-policy link
// - words: Word frequencies of the page's visible text
//
// The Scraper owns at most one document at a time. Every query works on
// "document present or not" and returns an empty result when there is none.
// =============================================================================

mod fetch;
mod links;
mod words;

// Re-export the public API so callers can write `page::Scraper`
pub use fetch::{Scraper, DEFAULT_TIMEOUT};
pub use links::ResourceRef;
