// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl: run a crawl from a start URL and write the report
// - check: ask the scope/trap policy about one or more URLs, without fetching
//
// Flags given here override the config file (see main.rs).
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "scoped-crawler",
    version,
    about = "A focused web crawler with scope/trap filtering and crawl statistics",
    long_about = "scoped-crawler crawls a set of allowed domains breadth-first, skips crawler traps \
                  (calendars, pagination loops, binary files), and writes a JSON report of word \
                  and subdomain statistics over the pages it accepts."
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file (any keys it omits keep their defaults)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a start URL and write the statistics report
    ///
    /// Example: scoped-crawler crawl https://www.ics.uci.edu/ --max-pages 500
    Crawl {
        /// URL to start from (must itself be in scope)
        start_url: String,

        /// Stop after this many pages have been fetched
        #[arg(long)]
        max_pages: Option<usize>,

        /// Minimum delay between requests to the same host, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Number of pages fetched concurrently
        #[arg(long)]
        workers: Option<usize>,

        /// Write a report checkpoint every N accepted pages (0 = only at the end)
        #[arg(long)]
        checkpoint_every: Option<usize>,

        /// Where to write the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the final report as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },

    /// Show whether URLs would be crawled, and why not
    ///
    /// Example: scoped-crawler check "https://www.ics.uci.edu/events/?ical=1"
    Check {
        /// URLs to check
        #[arg(required = true)]
        urls: Vec<String>,
    },
}
