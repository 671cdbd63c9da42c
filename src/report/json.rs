// src/report/json.rs
// =============================================================================
// JSON output for the two report files.
//
// serde_json's to_string_pretty() indents with 2 spaces. We want 4, so we
// drive a Serializer with a PrettyFormatter configured for 4 spaces.
// =============================================================================

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::page::ResourceRef;

pub const EXTERNAL_LINKS_FILE: &str = "external_links.json";
pub const WORD_COUNT_FILE: &str = "word_count.json";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Creates the output directory (and parents) unless it already exists
pub fn ensure_output_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

// Writes external_links.json, keeping the order of `links`
//
// Returns the path of the written file.
pub fn write_external_links(dir: &Path, links: &[ResourceRef]) -> Result<PathBuf, ReportError> {
    let path = dir.join(EXTERNAL_LINKS_FILE);
    write_pretty(&path, links)?;
    info!(path = %path.display(), count = links.len(), "wrote external links");
    Ok(path)
}

// Writes word_count.json; BTreeMap iteration gives us sorted keys
pub fn write_word_count(
    dir: &Path,
    counts: &BTreeMap<String, usize>,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(WORD_COUNT_FILE);
    write_pretty(&path, counts)?;
    info!(path = %path.display(), words = counts.len(), "wrote word count");
    Ok(path)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ReportError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut serializer)
        .map_err(|source| ReportError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    fs::write(path, buf).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
