// src/page/links.rs
// =============================================================================
// This module pulls links out of a parsed HTML document.
//
// Three queries live here:
// - external_links: every tag with an href/src that points off-site
// - hrefs: every <a href> in document order, without duplicates
// - privacy_link: the first href that looks like a privacy-policy page
//
// "Off-site" means: not site-relative ("/..."), not an in-page anchor
// ("#..."), and not an absolute URL on the site's own domain. The own
// domain is recognised by a SitePattern built from a single label such as
// "cfcunderwriting".
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::{Host, Url};

// One off-site reference found on the page.
//
// Serialized as {"type": "script", "resource": "https://cdn.example/app.js"}.
// The field is called `kind` in Rust because `type` is a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Tag name the reference was found on (a, link, script, img, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// The raw attribute value, exactly as written in the HTML
    pub resource: String,
}

/// Recognises absolute URLs that belong to the scanned site itself.
///
/// Matches an optional `[a-z0-9]+.` subdomain, the literal site label, then
/// any single character followed by lowercase letters (the TLD part).
#[derive(Debug, Clone)]
pub struct SitePattern {
    regex: Regex,
}

impl SitePattern {
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        let pattern = format!("(?:[a-z0-9]+.)?{}.[a-z]+", regex::escape(label));
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn matches(&self, resource: &str) -> bool {
        self.regex.is_match(resource)
    }
}

// Works out the site label for a page URL
//
// Examples:
//   "https://www.cfcunderwriting.com" -> Some("cfcunderwriting")
//   "https://cfcunderwriting.co"      -> Some("cfcunderwriting")
//   "https://www.cfcunderwriting.co.uk" -> Some("cfcunderwriting")
//   "https://co.uk"                   -> Some("co.uk")
//   "http://localhost:8080"           -> Some("localhost")
//   "http://127.0.0.1:3000"           -> Some("127.0.0.1")
//   "not a url"                       -> None
pub fn site_label(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    match url.host()? {
        Host::Domain(domain) => {
            let labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
            let n = labels.len();
            match n {
                0 => None,
                1 => Some(labels[0].to_string()),
                _ if is_second_level_suffix(labels[n - 2], labels[n - 1]) => {
                    // "co.uk" on its own has no site label, use the whole host
                    if n >= 3 {
                        Some(labels[n - 3].to_string())
                    } else {
                        Some(domain.to_string())
                    }
                }
                _ => Some(labels[n - 2].to_string()),
            }
        }
        ip => Some(ip.to_string()),
    }
}

// Second-level labels registries put under two-letter country codes
const SECOND_LEVEL_SUFFIXES: [&str; 14] = [
    "ac", "co", "com", "edu", "gov", "ltd", "me", "net", "nhs", "or", "org", "plc", "sch", "ne",
];

// True for the "co" in "example.co.uk" or the "com" in "example.com.au"
fn is_second_level_suffix(label: &str, tld: &str) -> bool {
    tld.len() == 2 && SECOND_LEVEL_SUFFIXES.contains(&label)
}

// Collects every off-site href/src reference in the document
//
// Tags are visited once, in document order. For each tag we read `href`
// and fall back to `src` only when `href` is missing. Exact duplicate
// (type, resource) pairs are dropped after their first occurrence.
//
// Parameters:
//   document: the parsed page
//   site: pattern for the page's own domain (None = keep all absolute URLs)
pub fn external_links(document: &Html, site: Option<&SitePattern>) -> Vec<ResourceRef> {
    // Constant selector, known to be valid
    let selector = Selector::parse("[href], [src]").unwrap();

    let mut seen = HashSet::new();
    let mut resources = Vec::new();

    for element in document.select(&selector) {
        let value = element.value();
        let resource = match value.attr("href").or_else(|| value.attr("src")) {
            Some(resource) => resource,
            None => continue,
        };

        if !is_external(resource, site) {
            continue;
        }

        let reference = ResourceRef {
            kind: value.name().to_string(),
            resource: resource.to_string(),
        };

        if seen.insert(reference.clone()) {
            resources.push(reference);
        }
    }

    resources
}

fn is_external(resource: &str, site: Option<&SitePattern>) -> bool {
    if resource.is_empty() || resource.starts_with('/') || resource.starts_with('#') {
        return false;
    }
    match site {
        Some(pattern) => !pattern.matches(resource),
        None => true,
    }
}

// Returns the href of every <a> tag, in the order they first appear
//
// Empty hrefs are skipped. Relative hrefs are returned as written,
// nothing is resolved against the page URL.
pub fn hrefs(document: &Html) -> Vec<String> {
    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut hrefs = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if !href.is_empty() && seen.insert(href) {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

// Picks the first href containing "privacy-policy"
pub fn privacy_link(hrefs: &[String]) -> Option<&str> {
    hrefs
        .iter()
        .map(String::as_str)
        .find(|href| href.contains("privacy-policy"))
}
