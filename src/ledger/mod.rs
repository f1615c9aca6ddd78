//! The per-day CSV ledger of recorded headlines.
//!
//! # Submodules
//!
//! - [`codec`]: encodes and decodes single ledger rows
//! - [`reader`]: loads an existing ledger and validates its header
//! - [`merge`]: works out which fetched records are not yet recorded
//! - [`writer`]: creates or appends to the ledger file
//!
//! # File Layout
//!
//! ```text
//! output/
//! ├── top_headlines_October_17_2026.csv
//! └── top_headlines_October_18_2026.csv
//! ```
//!
//! Each file starts with the [`HEADER`] line followed by one row per article
//! in insertion order. Files are only ever created or appended to.

pub mod codec;
pub mod merge;
pub mod reader;
pub mod writer;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// First line of every ledger, unquoted.
pub const HEADER: &str = "Source,Author,Title,URL,Published At";

/// File name of the ledger for `date`, e.g. `top_headlines_October_08_2026.csv`.
pub fn ledger_file_name(date: NaiveDate) -> String {
    format!("top_headlines_{}.csv", date.format("%B_%d_%Y"))
}

/// Full path of the ledger for `date` inside `output_dir`.
pub fn ledger_path(output_dir: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    output_dir.as_ref().join(ledger_file_name(date))
}
