// src/report/mod.rs
// =============================================================================
// This module writes the report files to disk.
//
// Files written (inside the output directory):
// - external_links.json: array of {"type", "resource"} objects
// - word_count.json: object mapping each word to its count, keys sorted
//
// Both are pretty-printed with a 4-space indent.
// =============================================================================

mod json;

pub use json::{ensure_output_dir, write_external_links, write_word_count};

#[cfg(test)]
pub use json::{EXTERNAL_LINKS_FILE, WORD_COUNT_FILE};
