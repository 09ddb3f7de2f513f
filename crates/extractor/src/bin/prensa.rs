// ABOUTME: CLI binary for the Prensa news-article extractor.
// ABOUTME: Fetches one or more article URLs and prints extracted title/body as text or JSON.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use prensa_extractor::{
    ensure_scheme, site_key, HttpBackend, ProfileError, Scraper, ScraperBuilder,
};
use serde_json::json;

#[cfg(feature = "browser")]
use prensa_extractor::{ChromiumBackend, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "prensa")]
#[command(about = "Fetch news articles and extract title and body")]
struct Args {
    /// Article URLs to fetch (scheme optional; https:// is assumed)
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output as JSON instead of plain text
    #[arg(long = "json")]
    json_output: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Rendering attempts per URL
    #[arg(long = "max-retries", default_value_t = 2)]
    max_retries: u32,

    /// Seconds to let dynamic content settle after navigation
    /// (defaults to 0 for plain HTTP, 15 with --browser)
    #[arg(long = "settle-secs")]
    settle_secs: Option<u64>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Render pages with a headless browser instead of a plain HTTP fetch
    #[cfg(feature = "browser")]
    #[arg(long = "browser")]
    browser: bool,
}

fn default_settle_secs(args: &Args) -> u64 {
    #[cfg(feature = "browser")]
    {
        if args.browser {
            return 15;
        }
    }
    let _ = args;
    0
}

fn configure(builder: ScraperBuilder, args: &Args) -> Result<Scraper, ProfileError> {
    let settle = args.settle_secs.unwrap_or_else(|| default_settle_secs(args));
    builder
        .max_retries(args.max_retries)
        .settle_delay(Duration::from_secs(settle))
        .build()
}

async fn make_scraper(args: &Args) -> Result<Scraper, String> {
    #[cfg(feature = "browser")]
    if args.browser {
        let backend = ChromiumBackend::launch(&SessionConfig::default())
            .await
            .map_err(|err| format!("failed to launch browser: {}", err))?;
        return configure(ScraperBuilder::new(backend), args).map_err(|err| err.to_string());
    }
    configure(ScraperBuilder::new(HttpBackend::new()), args).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let scraper = match make_scraper(&args).await {
        Ok(scraper) => scraper,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let mut entries = Vec::new();
    let mut had_error = false;

    for raw in &args.urls {
        let url = ensure_scheme(raw);
        let article = scraper.fetch_and_extract(&url).await;
        if article.is_failure() {
            eprintln!("error fetching {}: {}", url, article.body);
            had_error = true;
        }
        entries.push((url, article));
    }

    let elapsed = start.elapsed();

    let output = if args.json_output {
        let values: Vec<_> = entries
            .iter()
            .map(|(url, article)| {
                json!({
                    "url": url,
                    "domain": site_key(url),
                    "title": article.title,
                    "body": article.body,
                })
            })
            .collect();
        if values.len() == 1 {
            serde_json::to_string_pretty(&values[0]).unwrap()
        } else {
            serde_json::to_string_pretty(&values).unwrap()
        }
    } else {
        entries
            .iter()
            .map(|(_, article)| format!("{}\n\n{}", article.title, article.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    if let Some(output_path) = &args.output {
        if let Err(err) = fs::write(output_path, &output) {
            eprintln!("error writing to {:?}: {}", output_path, err);
            had_error = true;
        }
    } else {
        println!("{}", output);
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
