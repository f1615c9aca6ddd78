//! # Headline Ledger
//!
//! Fetches the current top headlines from NewsAPI and appends the ones not yet
//! seen today to a dated CSV ledger.
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... headline_ledger -o ./output
//! ```
//!
//! ## Architecture
//!
//! Each run is one pass through a single-threaded pipeline:
//! 1. **Fetching**: request the top-headlines endpoint and decode the articles
//! 2. **Reading**: load today's ledger if it exists, validating its header
//! 3. **Merging**: keep only articles whose `(url, title)` is not recorded yet
//! 4. **Writing**: create the ledger or append the new rows to it
//!
//! Failures surface as a [`LedgerError`] and are reported once, here, with a
//! distinct exit code per kind.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod ledger;
mod models;
mod pipeline;
mod sources;
mod utils;

use cli::Cli;
use config::Settings;
use error::LedgerError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_ledger starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, "Parsed CLI arguments");

    let outcome = match Settings::load(&args).await {
        Ok(settings) => pipeline::run(&settings).await,
        Err(e) => Err(e),
    };

    let elapsed = start_time.elapsed();
    match outcome {
        Ok(report) => {
            info!(
                path = %report.path.display(),
                created = report.created,
                fetched = report.fetched,
                added = report.added,
                ?elapsed,
                "Execution complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn report_failure(e: &LedgerError) {
    match e {
        LedgerError::HeaderMismatch { .. } => {
            error!(error = %e, "Existing ledger is in an unexpected format; not merging")
        }
        LedgerError::Write { .. } => {
            error!(error = %e, "Ledger may be partially written")
        }
        _ => error!(error = %e, "Run aborted"),
    }
}
