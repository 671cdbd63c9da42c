// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Fetch the target page and list its hyperlinks
// 3. Write every off-site resource to external_links.json
// 4. If the page links to a privacy policy, fetch it and write its word
//    counts to word_count.json
// 5. Exit with proper code (0 = done, 1 = error such as an unwritable
//    output directory)
//
// A page that cannot be fetched is NOT an error: it is logged and the
// report is produced from empty results.
//
// Rust concepts used:
// - async/await: reqwest's client is async, so we run on tokio
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;    // src/cli.rs - command-line parsing
mod page;   // src/page/ - fetching and querying one page
mod report; // src/report/ - writing the JSON files

use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use page::Scraper;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Everything the driver needs to know to produce one report
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Page to scan; also the prefix for the privacy-policy URL
    pub base_url: String,
    /// Where external_links.json and word_count.json go
    pub output_dir: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
    /// Overrides the same-site label derived from base_url
    pub site_token: Option<String>,
}

// What a finished run produced
#[derive(Debug)]
pub struct ReportSummary {
    pub hrefs: Vec<String>,
    /// Absolute URL of the privacy-policy page, if one was linked
    pub privacy_url: Option<String>,
    pub external_count: usize,
    pub external_links_path: PathBuf,
    /// None when the word count step was skipped
    pub word_count_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // std::process::exit() terminates the program with the given code
    let exit_code = match run(&cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// Sends tracing output to stderr so it never mixes with the report on stdout
//
// RUST_LOG wins when it is set; otherwise only warnings are shown, or debug
// output for this crate with --verbose.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,page_report=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let summary = generate_report(&cli.report_config()).await?;

    debug!(
        hrefs = summary.hrefs.len(),
        external = summary.external_count,
        privacy_url = summary.privacy_url.as_deref().unwrap_or("-"),
        external_links = %summary.external_links_path.display(),
        word_count = ?summary.word_count_path,
        "report finished"
    );

    println!("Done!");
    Ok(())
}

fn scraper_for(config: &ReportConfig) -> Scraper {
    let scraper = Scraper::with_timeout(config.timeout);
    match &config.site_token {
        Some(token) => scraper.with_site_label(token.clone()),
        None => scraper,
    }
}

// Runs the whole report: fetch, print, write
//
// Only filesystem problems come back as Err. Fetch failures are logged
// inside the Scraper and simply produce empty results here.
async fn generate_report(config: &ReportConfig) -> Result<ReportSummary> {
    let base_url = config.base_url.as_str();

    let mut scraper = scraper_for(config);
    scraper.open(base_url).await;
    let external = scraper.external_links();
    let hrefs = scraper.hrefs();
    let policy_href = scraper.privacy();

    print_hrefs(&hrefs);
    match &policy_href {
        Some(href) => println!("\nPrivacy policy URL was found at: {}\n", href),
        None => println!("\nPrivacy policy URL was not found on {}\n", base_url),
    }

    report::ensure_output_dir(&config.output_dir)?;

    println!(
        "Creating JSON file for all external resources hosted on {}",
        base_url
    );
    let external_links_path = report::write_external_links(&config.output_dir, &external)
        .context("writing external links report")?;

    // The href is appended verbatim: "https://site.com" + "/privacy-policy"
    let privacy_url = policy_href.map(|href| format!("{}{}", base_url, href));

    let word_count_path = match &privacy_url {
        Some(url) => {
            println!("Creating JSON file for all word occurrences at {}", url);
            let mut privacy_scraper = scraper_for(config);
            privacy_scraper.open(url).await;
            let counts = privacy_scraper.wordcount();
            let path = report::write_word_count(&config.output_dir, &counts)
                .context("writing word count report")?;
            Some(path)
        }
        None => {
            println!(
                "JSON file for word occurrences was skipped as privacy policy page was not found."
            );
            None
        }
    };

    Ok(ReportSummary {
        hrefs,
        privacy_url,
        external_count: external.len(),
        external_links_path,
        word_count_path,
    })
}

// Prints the hyperlinks in page order, numbered from 0
fn print_hrefs(hrefs: &[String]) {
    println!("\nList of all hyperlinks (anchor tags) on the page:\n");
    for (i, href) in hrefs.iter().enumerate() {
        println!("{}: {}", i, href);
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the privacy URL built with format! instead of Url::join?
//    - It matches how the report has always been produced
//    - "https://site.com" + "/privacy-policy" gives the expected URL
//    - An absolute href would produce a broken URL; the fetch then fails,
//      gets logged, and word_count.json is written empty
//
// 2. What does .context() do?
//    - It comes from anyhow's Context trait
//    - Wraps an error with a message describing what we were doing
//    - "{:#}" in main prints the message and the underlying cause
//
// 3. Why is the output directory created before any file is written?
//    - create_dir_all is a no-op when the directory already exists
//    - A failure here stops the run with exit code 1
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const HOME_WITH_POLICY: &str = r#"<html><head>
        <link rel="stylesheet" href="https://fonts.example/css">
        <script src="/static/app.js"></script>
        </head><body>
        <a href="/about">About</a>
        <a href="https://partner.example/">Partner</a>
        <a href="/privacy-policy">Privacy</a>
        </body></html>"#;

    const HOME_WITHOUT_POLICY: &str = r##"<html><body>
        <img src="https://images.example/logo.png">
        <a href="/about">About</a>
        <a href="#top">Top</a>
        </body></html>"##;

    const POLICY_PAGE: &str = "<html><body><p>We value privacy. Privacy matters.</p></body></html>";

    // Serves fixed pages over plain HTTP on 127.0.0.1; unknown paths get a 404
    async fn serve(pages: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let response = match pages.iter().find(|(p, _)| *p == path) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    fn config(base_url: String, output_dir: PathBuf) -> ReportConfig {
        ReportConfig {
            base_url,
            output_dir,
            timeout: Duration::from_secs(5),
            site_token: None,
        }
    }

    #[tokio::test]
    async fn test_report_with_privacy_policy() {
        let base = serve(vec![("/", HOME_WITH_POLICY), ("/privacy-policy", POLICY_PAGE)]).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");

        let summary = generate_report(&config(format!("{}/", base), output.clone()))
            .await
            .unwrap();

        assert_eq!(
            summary.hrefs,
            vec!["/about", "https://partner.example/", "/privacy-policy"]
        );
        assert_eq!(summary.external_count, 2);
        // Plain concatenation, so the trailing slash of the base doubles up
        assert_eq!(
            summary.privacy_url,
            Some(format!("{}//privacy-policy", base))
        );

        let external: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.external_links_path).unwrap())
                .unwrap();
        assert_eq!(
            external,
            serde_json::json!([
                {"type": "link", "resource": "https://fonts.example/css"},
                {"type": "a", "resource": "https://partner.example/"}
            ])
        );

        // "//privacy-policy" is not served, so the second page is a 404 and
        // its word count is empty
        let words_path = summary.word_count_path.unwrap();
        assert_eq!(fs::read_to_string(words_path).unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_report_fetches_concatenated_privacy_url() {
        let base = serve(vec![("/", HOME_WITH_POLICY), ("/privacy-policy", POLICY_PAGE)]).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");

        let summary = generate_report(&config(base.clone(), output.clone()))
            .await
            .unwrap();

        assert_eq!(
            summary.privacy_url,
            Some(format!("{}/privacy-policy", base))
        );
        let words_path = summary.word_count_path.unwrap();
        assert_eq!(words_path, output.join(report::WORD_COUNT_FILE));

        let written = fs::read_to_string(words_path).unwrap();
        assert_eq!(
            written,
            "{\n    \"matters.\": 1,\n    \"privacy\": 1,\n    \"privacy.\": 1,\n    \"value\": 1,\n    \"we\": 1\n}"
        );
    }

    #[tokio::test]
    async fn test_report_without_privacy_policy() {
        let base = serve(vec![("/", HOME_WITHOUT_POLICY)]).await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");

        let summary = generate_report(&config(base, output.clone())).await.unwrap();

        assert_eq!(summary.hrefs, vec!["/about", "#top"]);
        assert_eq!(summary.privacy_url, None);
        assert_eq!(summary.word_count_path, None);
        assert!(!output.join(report::WORD_COUNT_FILE).exists());

        let external: Vec<page::ResourceRef> =
            serde_json::from_str(&fs::read_to_string(output.join(report::EXTERNAL_LINKS_FILE)).unwrap())
                .unwrap();
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].kind, "img");
        assert_eq!(external[0].resource, "https://images.example/logo.png");
    }

    #[tokio::test]
    async fn test_report_when_fetch_fails() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");

        let summary = generate_report(&config(format!("http://127.0.0.1:{}", port), output.clone()))
            .await
            .unwrap();

        assert!(summary.hrefs.is_empty());
        assert_eq!(summary.word_count_path, None);
        assert_eq!(
            fs::read_to_string(output.join(report::EXTERNAL_LINKS_FILE)).unwrap(),
            "[]"
        );
    }

    #[tokio::test]
    async fn test_report_fails_on_unwritable_output() {
        let base = serve(vec![("/", HOME_WITHOUT_POLICY)]).await;
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("output");
        fs::write(&blocker, "a file, not a directory").unwrap();

        assert!(generate_report(&config(base, blocker)).await.is_err());
    }
}
