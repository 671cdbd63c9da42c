// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag is optional. With no flags at all the tool scans the CFC
// Underwriting home page and writes into ./output, which is the whole job
// it was written for.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::page::DEFAULT_TIMEOUT;
use crate::ReportConfig;

/// Page scanned when no --url is given
pub const DEFAULT_URL: &str = "https://www.cfcunderwriting.com";

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "page-report",
    version = "0.1.0",
    about = "Reports external resources, hyperlinks and privacy-policy word counts for a web page",
    long_about = "page-report fetches a single web page, lists its hyperlinks, writes every \
                  off-site resource it loads to external_links.json and, when the page links to \
                  a privacy policy, writes that page's word frequencies to word_count.json."
)]
pub struct Cli {
    /// Page to scan
    ///
    /// The privacy-policy href is appended to this string as-is to build
    /// the second URL, so leave off any trailing slash.
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Directory the JSON files are written to (created if missing)
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Request timeout in seconds, per page
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Domain label that marks a URL as same-site (e.g. "cfcunderwriting")
    ///
    /// Defaults to the registrable label of the --url host ("example" for
    /// www.example.com and www.example.co.uk).
    #[arg(long)]
    pub site_token: Option<String>,

    /// Print debug logging to stderr
    ///
    /// RUST_LOG, when set, takes precedence.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Converts parsed arguments into the driver's configuration
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            base_url: self.url.clone(),
            output_dir: self.output_dir.clone(),
            timeout: Duration::from_secs(self.timeout),
            site_token: self.site_token.clone(),
        }
    }
}
