//! Command-line interface definitions for Headline Ledger.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every argument is optional: with none given the program fetches CNN top
//! headlines into `./output`. Some options can also come from environment
//! variables or a YAML settings file (see [`crate::config`]).

use clap::Parser;

/// Command-line arguments for the Headline Ledger application.
///
/// # Examples
///
/// ```sh
/// # Defaults: CNN headlines into ./output
/// NEWSAPI_KEY=... headline_ledger
///
/// # Different output directory and a settings file
/// headline_ledger -o /var/lib/headlines -c ./ledger.yaml
///
/// # Backfill yesterday's ledger, tolerating damaged rows
/// headline_ledger --date 2026-10-17 --skip-malformed
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the dated ledger files
    #[arg(short, long, env = "LEDGER_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// NewsAPI key, sent as the `apiKey` query parameter
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Top-headlines endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Comma-separated NewsAPI source ids
    #[arg(long)]
    pub sources: Option<String>,

    /// Request deadline in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Ledger date as YYYY-MM-DD instead of today's local date
    #[arg(long)]
    pub date: Option<String>,

    /// Skip undecodable ledger rows instead of ignoring everything after the first one
    #[arg(long)]
    pub skip_malformed: bool,

    /// Also drop repeated articles within a single fetched batch
    #[arg(long)]
    pub dedupe_batch: bool,
}
