// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load the config (file, then flag overrides)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with a proper code
//    (0 = success, 1 = a checked URL was rejected, 2 = error)
// =============================================================================

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use scoped_crawler::crawl::{canonicalize_absolute, ScopePolicy};
use scoped_crawler::fetch::HttpFetcher;
use scoped_crawler::report::JsonFileStore;
use scoped_crawler::{logging, Config, CrawlSummary, Crawler};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Crawl {
            start_url,
            max_pages,
            delay_ms,
            workers,
            checkpoint_every,
            output,
            json,
        } => {
            let overrides = CrawlOverrides {
                max_pages,
                delay_ms,
                workers,
                checkpoint_every,
                output,
            };
            handle_crawl(overrides.apply(config), &start_url, json).await
        }
        Commands::Check { urls } => Ok(handle_check(&config, &urls)),
    }
}

// Command-line values that take precedence over the config file
struct CrawlOverrides {
    max_pages: Option<usize>,
    delay_ms: Option<u64>,
    workers: Option<usize>,
    checkpoint_every: Option<usize>,
    output: Option<PathBuf>,
}

impl CrawlOverrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(max_pages) = self.max_pages {
            config.crawl.max_pages = max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawl.politeness_delay_ms = delay_ms;
        }
        if let Some(workers) = self.workers {
            config.crawl.workers = workers;
        }
        if let Some(every) = self.checkpoint_every {
            config.report.checkpoint_every = every;
        }
        if let Some(output) = self.output {
            config.report.output = output;
        }
        config
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(config: Config, start_url: &str, json: bool) -> Result<i32> {
    println!("🔍 Crawling from: {}", start_url);
    println!(
        "📊 Max pages: {}, workers: {}, politeness: {}ms",
        config.crawl.max_pages, config.crawl.workers, config.crawl.politeness_delay_ms
    );

    let fetcher = HttpFetcher::new(
        config.crawl.request_timeout(),
        &config.crawl.user_agent,
        config.gate.max_body_bytes,
    )
    .context("Failed to create HTTP client")?;
    let store = JsonFileStore::new(config.report.output.clone());

    let crawler = Crawler::new(&config, fetcher, store);
    let summary = crawler.crawl(start_url).await?;

    print_results(&summary, &config.report.output, json)?;
    Ok(0)
}

// Handles the 'check' subcommand
// Returns 1 if any URL would be rejected
fn handle_check(config: &Config, urls: &[String]) -> i32 {
    let policy = ScopePolicy::new(&config.scope);
    let mut rejected = 0;

    for raw in urls {
        let verdict = match canonicalize_absolute(raw) {
            Some(url) => match policy.evaluate(url.as_str()) {
                Ok(()) => format!("✅ CRAWL  {}", url),
                Err(reason) => {
                    rejected += 1;
                    format!("❌ SKIP   {}  ({})", url, reason)
                }
            },
            None => {
                rejected += 1;
                format!("❌ SKIP   {}  (invalid URL)", raw)
            }
        };
        println!("{}", verdict);
    }

    if rejected > 0 {
        1
    } else {
        0
    }
}

// Prints the final report either as a summary table or JSON
fn print_results(summary: &CrawlSummary, output: &std::path::Path, json: bool) -> Result<()> {
    if json {
        println!("{}", summary.report.to_json()?);
    } else {
        print_table(summary, output);
    }
    Ok(())
}

// Prints the crawl summary as a human-readable table
fn print_table(summary: &CrawlSummary, output: &std::path::Path) {
    let report = &summary.report;

    println!();
    println!("📊 Crawl summary:");
    println!("   📄 Fetched: {}", summary.pages_fetched);
    println!("   ✅ Accepted: {}", summary.pages_accepted);
    println!("   ⏭️  Skipped by content gate: {}", summary.pages_skipped);
    println!("   ↪️  Redirected out of scope: {}", summary.redirects_out_of_scope);
    println!("   📏 Outside word-count band: {}", summary.pages_out_of_band);
    println!("   ❌ Fetch failures: {}", summary.fetch_failures);
    println!(
        "   🔗 Links queued / rejected: {} / {}",
        summary.links_queued, summary.links_rejected
    );

    if let Some(longest) = &report.longest_page {
        println!("   📚 Longest page: {} ({} words)", longest.url, longest.word_count);
    }

    println!();
    println!("{:<50} {:>8}", "SUBDOMAIN", "PAGES");
    println!("{}", "=".repeat(59));
    for (host, count) in &report.subdomains {
        println!("{:<50} {:>8}", host, count);
    }

    println!();
    println!("{:<50} {:>8}", "WORD", "COUNT");
    println!("{}", "=".repeat(59));
    for (word, count) in report.top_words.iter().take(10) {
        println!("{:<50} {:>8}", word, count);
    }
    if report.top_words.len() > 10 {
        println!("   ... {} more in the report", report.top_words.len() - 10);
    }

    println!();
    if summary.checkpoint_failures > 0 {
        println!(
            "⚠️  {} checkpoint(s) could not be written to {} (see log)",
            summary.checkpoint_failures,
            output.display()
        );
    }
    if summary.checkpoints_written > 0 {
        println!(
            "💾 Report written to {} ({} checkpoint(s))",
            output.display(),
            summary.checkpoints_written
        );
    }
}
