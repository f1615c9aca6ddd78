//! Creating and appending to a ledger file.

use super::{HEADER, codec};
use crate::error::LedgerError;
use crate::models::Record;
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, instrument};

/// Write `delta` to the ledger at `path` and return how many rows were added.
///
/// With `is_new_file` the parent directories are created, the file is created
/// and the header is written first; a file that already exists at `path` is
/// left untouched and reported as a failure. Otherwise rows are appended to
/// the existing file.
///
/// The file is flushed and closed before returning. A failure partway through
/// can leave some rows written.
///
/// # Errors
///
/// [`LedgerError::Write`] on any I/O failure.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = delta.len(), is_new_file = is_new_file))]
pub async fn append_ledger(path: &Path, delta: &[Record], is_new_file: bool) -> Result<usize, LedgerError> {
    write_rows(path, delta, is_new_file)
        .await
        .map_err(|source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_rows(path: &Path, delta: &[Record], is_new_file: bool) -> std::io::Result<usize> {
    let file = if is_new_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        OpenOptions::new().write(true).create_new(true).open(path).await?
    } else {
        OpenOptions::new().append(true).open(path).await?
    };

    let mut out = BufWriter::new(file);
    if is_new_file {
        out.write_all(HEADER.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }

    let mut added = 0usize;
    for record in delta {
        let mut line = codec::encode(record);
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        added += 1;
    }

    out.flush().await?;
    out.into_inner().sync_all().await?;
    info!(added, "Wrote ledger rows");
    Ok(added)
}
