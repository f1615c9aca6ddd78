//! Error taxonomy for a ledger run.
//!
//! Every failure a run can hit is a variant of [`LedgerError`]. Errors are
//! propagated with `?` up to `main`, which logs them once and turns them into
//! a process exit code via [`LedgerError::exit_code`].

use std::path::PathBuf;

/// Failures that can occur while fetching, reading, merging or writing.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The upstream request failed or its body could not be decoded.
    #[error("HTTP request error: {0}")]
    Fetch(#[from] FetchError),

    /// An existing ledger does not start with the canonical header line.
    #[error("Ledger {} has an unexpected header: {:?}", .path.display(), .found)]
    HeaderMismatch { path: PathBuf, found: String },

    /// A ledger line did not split into exactly five quoted fields.
    #[error("Malformed ledger row on line {line_number}: {detail}")]
    MalformedRecord { line_number: usize, detail: String },

    /// An existing ledger could not be opened or read.
    #[error("CSV read error on {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating or appending to the ledger failed partway.
    #[error("CSV write error on {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be loaded or are invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Ways the upstream collaborator can fail.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LedgerError {
    /// Distinct non-zero process exit code per error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            LedgerError::Fetch(_) => 2,
            LedgerError::HeaderMismatch { .. } => 3,
            LedgerError::Read { .. } => 4,
            LedgerError::Write { .. } => 5,
            LedgerError::Config(_) => 6,
            LedgerError::MalformedRecord { .. } => 7,
        }
    }
}
