// src/page/fetch.rs
// =============================================================================
// This module holds the Scraper: it fetches a page and keeps the parsed
// document around so it can be queried.
//
// How it works:
// 1. open(url) makes one GET request with a fixed timeout
// 2. The body is parsed into a DOM with the `scraper` crate
// 3. external_links / hrefs / privacy / wordcount read from that DOM
//
// Failure handling:
// - Transport failures (bad URL, DNS, timeout, refused connection) are
//   logged and leave the Scraper with no document
// - HTTP error statuses (404, 500, ...) are NOT transport failures. The
//   document is kept, but queries treat it as unusable and return nothing
// - Queries never fail; with no usable document they return empty results
//
// Rust concepts:
// - Option<Document>: "maybe a page" without a placeholder value
// - thiserror: Typed errors with Display messages derived for us
// =============================================================================

use reqwest::{Client, StatusCode};
use scraper::Html;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::links::{self, ResourceRef, SitePattern};
use super::words;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// Ways a fetch can fail before we ever get an HTTP response
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    // Sorts a reqwest error into one of our variants
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url, source }
        } else if source.is_connect() {
            FetchError::Connect { url, source }
        } else {
            FetchError::Request { url, source }
        }
    }
}

// A fetched and parsed page
struct Document {
    status: StatusCode,
    html: Html,
    site: Option<SitePattern>,
}

impl Document {
    // 4xx and 5xx pages are kept but never queried
    fn is_usable(&self) -> bool {
        !(self.status.is_client_error() || self.status.is_server_error())
    }
}

/// Fetches one page at a time and answers queries about it.
pub struct Scraper {
    timeout: Duration,
    site_label: Option<String>,
    document: Option<Document>,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

impl Scraper {
    /// Creates a Scraper with no page loaded and the default 15 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            site_label: None,
            document: None,
        }
    }

    /// Uses `label` to recognise same-site URLs instead of deriving it from
    /// the URL passed to [`Scraper::open`].
    pub fn with_site_label(mut self, label: impl Into<String>) -> Self {
        self.site_label = Some(label.into());
        self
    }

    /// Fetches `url` and replaces the held document.
    ///
    /// Returns whether a document is loaded afterwards. A transport failure
    /// is logged and leaves no document; it is not returned as an error.
    pub async fn open(&mut self, url: &str) -> bool {
        match fetch_page(url, self.timeout).await {
            Ok((status, body)) => {
                debug!(%url, %status, bytes = body.len(), "fetched page");
                self.load(url, status, &body);
            }
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                self.document = None;
            }
        }
        self.document.is_some()
    }

    // Parses `body` as the page at `url` and makes it the current document
    fn load(&mut self, url: &str, status: StatusCode, body: &str) {
        let label = self.site_label.clone().or_else(|| links::site_label(url));
        let site = label.and_then(|label| match SitePattern::new(&label) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(%label, error = %e, "could not build same-site pattern");
                None
            }
        });

        self.document = Some(Document {
            status,
            html: Html::parse_document(body),
            site,
        });
    }

    // The current document, if there is one worth querying
    fn usable(&self) -> Option<&Document> {
        self.document.as_ref().filter(|doc| doc.is_usable())
    }

    /// Every distinct off-site `{type, resource}` reference on the page.
    pub fn external_links(&self) -> Vec<ResourceRef> {
        match self.usable() {
            Some(doc) => links::external_links(&doc.html, doc.site.as_ref()),
            None => Vec::new(),
        }
    }

    /// Anchor hrefs in first-occurrence order, without duplicates.
    pub fn hrefs(&self) -> Vec<String> {
        match self.usable() {
            Some(doc) => links::hrefs(&doc.html),
            None => Vec::new(),
        }
    }

    /// The first href containing "privacy-policy".
    pub fn privacy(&self) -> Option<String> {
        let hrefs = self.hrefs();
        links::privacy_link(&hrefs).map(str::to_string)
    }

    /// Lowercase word frequencies of the page's visible text.
    pub fn wordcount(&self) -> BTreeMap<String, usize> {
        match self.usable() {
            Some(doc) => words::word_count(&doc.html),
            None => BTreeMap::new(),
        }
    }
}

// Makes the GET request and returns the status and decoded body
//
// Redirects and TLS use reqwest's defaults; no extra headers are sent.
async fn fetch_page(url: &str, timeout: Duration) -> Result<(StatusCode, String), FetchError> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(FetchError::Client)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    Ok((status, body))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<Document> instead of an empty Document?
//    - None says "nothing was loaded" without inventing a fake page
//    - Every query has to match on it, so the compiler makes sure we
//      handle the missing case
//
// 2. Why doesn't open() return a Result?
//    - A failed fetch is an expected outcome for this tool
//    - The caller carries on and simply gets empty results
//    - The error is still logged with tracing::warn!
//
// 3. What does .filter() on an Option do?
//    - Some(x) stays Some(x) if the closure returns true
//    - Otherwise it becomes None
//    - We use it to hide 4xx/5xx pages from the queries
//
// 4. What is %url in the tracing macros?
//    - % records the value using its Display implementation
//    - Fields show up as key=value pairs in the log line
// -----------------------------------------------------------------------------
