//! One ledger run: fetch, read, merge, write.
//!
//! ```text
//! fetch_headlines ──► dedupe_batch ──┐
//!                                    ├─► compute_delta ──► append_ledger
//! read_ledger(path) ─────────────────┘
//! ```
//!
//! The ledger path is computed once from the run date and passed to every
//! step. Nothing here prints; outcomes are returned as [`RunReport`] or a
//! [`LedgerError`] for `main` to report.

use crate::config::Settings;
use crate::error::LedgerError;
use crate::ledger::merge::{DedupePolicy, compute_delta, dedupe_batch};
use crate::ledger::reader::{LedgerContents, MalformedPolicy, read_ledger};
use crate::ledger::writer::append_ledger;
use crate::ledger::ledger_path;
use crate::models::Record;
use crate::sources::newsapi;
use crate::utils::ensure_writable_dir;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub path: PathBuf,
    /// The ledger did not exist before this run.
    pub created: bool,
    pub fetched: usize,
    pub added: usize,
}

/// Merge an already fetched batch into the ledger at `path`.
///
/// A missing ledger is created with every record of the batch. An existing
/// one gets only the records whose `(url, title)` it does not already hold.
///
/// # Errors
///
/// [`LedgerError::HeaderMismatch`] or [`LedgerError::Read`] from reading, in
/// which case nothing is written; [`LedgerError::Write`] from writing.
#[instrument(level = "info", skip_all, fields(path = %path.display(), incoming = incoming.len()))]
pub async fn ingest(
    path: &Path,
    incoming: Vec<Record>,
    malformed: MalformedPolicy,
    dedupe: DedupePolicy,
) -> Result<RunReport, LedgerError> {
    let fetched = incoming.len();
    let batch = dedupe_batch(incoming, dedupe);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (created, added) = match read_ledger(path, malformed).await? {
        LedgerContents::Absent => {
            info!("Creating {}...", name);
            (true, append_ledger(path, &batch, true).await?)
        }
        LedgerContents::Present(existing) => {
            info!("{} found. Updating...", name);
            let delta = compute_delta(&existing, &batch);
            (false, append_ledger(path, &delta, false).await?)
        }
    };

    info!("{} entries added.", added);
    Ok(RunReport {
        path: path.to_path_buf(),
        created,
        fetched,
        added,
    })
}

/// Full run for `settings`: check the output directory, fetch, then [`ingest`].
#[instrument(level = "info", skip_all, fields(date = %settings.date))]
pub async fn run(settings: &Settings) -> Result<RunReport, LedgerError> {
    let path = ledger_path(&settings.output_dir, settings.date);
    ensure_writable_dir(&settings.output_dir).await?;

    let incoming = newsapi::fetch_headlines(&settings.source).await?;
    ingest(&path, incoming, settings.malformed, settings.dedupe).await
}
