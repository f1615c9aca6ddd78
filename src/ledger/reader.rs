//! Loading an existing ledger from disk.

use super::{HEADER, codec};
use crate::error::LedgerError;
use crate::models::Record;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// What to do when a row fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Stop reading at the first bad row and keep what was decoded before it.
    #[default]
    Stop,
    /// Log the bad row, skip it and keep reading.
    Skip,
}

/// Result of looking for a ledger on disk.
#[derive(Debug, PartialEq, Eq)]
pub enum LedgerContents {
    /// No file exists yet; the caller has to create one.
    Absent,
    /// The file exists and these rows were decoded from it.
    Present(Vec<Record>),
}

/// Read the ledger at `path`.
///
/// A missing file is not an error and yields [`LedgerContents::Absent`]. An
/// existing file must start with [`HEADER`]; every following line is decoded
/// with [`codec::decode`]. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD rather than failing the read.
///
/// # Errors
///
/// - [`LedgerError::HeaderMismatch`] if the first line is missing or differs
///   from the header. No records are returned in that case.
/// - [`LedgerError::Read`] if the file cannot be opened or read.
#[instrument(level = "info", skip_all, fields(path = %path.display(), ?policy))]
pub async fn read_ledger(path: &Path, policy: MalformedPolicy) -> Result<LedgerContents, LedgerError> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No ledger on disk");
            return Ok(LedgerContents::Absent);
        }
        Err(source) => {
            return Err(LedgerError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let read_err = |source| LedgerError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut lines = BufReader::new(file).split(b'\n');

    let first = lines
        .next_segment()
        .await
        .map_err(read_err)?
        .map(|raw| line_text(raw, 1));
    let header = first.as_deref().map(|l| l.strip_suffix('\r').unwrap_or(l));
    if header != Some(HEADER) {
        return Err(LedgerError::HeaderMismatch {
            path: path.to_path_buf(),
            found: first.unwrap_or_default(),
        });
    }

    let mut records = Vec::new();
    let mut line_number = 1usize;
    while let Some(raw) = lines.next_segment().await.map_err(read_err)? {
        line_number += 1;
        let line = line_text(raw, line_number);
        match codec::decode(&line, line_number) {
            Ok(record) => records.push(record),
            Err(e) => match policy {
                MalformedPolicy::Stop => {
                    warn!(error = %e, kept = records.len(), "Malformed ledger row; ignoring the rest of the file");
                    break;
                }
                MalformedPolicy::Skip => {
                    warn!(error = %e, "Malformed ledger row; skipping it");
                }
            },
        }
    }

    info!(count = records.len(), "Read ledger");
    Ok(LedgerContents::Present(records))
}

fn line_text(raw: Vec<u8>, line_number: usize) -> String {
    match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => {
            warn!(line_number, "Ledger line is not valid UTF-8; decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    const ROW_1: &str = r#""CNN","","T1","http://x/1","2020-01-01T00:00:00Z""#;
    const ROW_2: &str = r#""CNN","A","T,2","http://x/2","2020-01-01T00:05:00Z""#;
    const BAD: &str = r#""CNN","A","T3""#;

    async fn ledger_with(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(&path, body).await.unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let contents = read_ledger(&dir.path().join("nope.csv"), MalformedPolicy::Stop)
            .await
            .unwrap();
        assert_eq!(contents, LedgerContents::Absent);
    }

    #[tokio::test]
    async fn test_header_only_is_present_and_empty() {
        let (_dir, path) = ledger_with(&[HEADER]).await;
        let contents = read_ledger(&path, MalformedPolicy::Stop).await.unwrap();
        assert_eq!(contents, LedgerContents::Present(vec![]));
    }

    #[tokio::test]
    async fn test_reads_rows_in_order() {
        let (_dir, path) = ledger_with(&[HEADER, ROW_1, ROW_2]).await;
        let contents = read_ledger(&path, MalformedPolicy::Stop).await.unwrap();
        assert_eq!(
            contents,
            LedgerContents::Present(vec![
                Record::new("CNN", "", "T1", "http://x/1", "2020-01-01T00:00:00Z"),
                Record::new("CNN", "A", "T,2", "http://x/2", "2020-01-01T00:05:00Z"),
            ])
        );
    }

    #[tokio::test]
    async fn test_header_mismatch() {
        let (_dir, path) = ledger_with(&["source,author,title,url,published", ROW_1]).await;
        match read_ledger(&path, MalformedPolicy::Stop).await {
            Err(LedgerError::HeaderMismatch { found, .. }) => {
                assert_eq!(found, "source,author,title,url,published");
            }
            other => panic!("expected HeaderMismatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_file_is_header_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").await.unwrap();
        assert!(matches!(
            read_ledger(&path, MalformedPolicy::Stop).await,
            Err(LedgerError::HeaderMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_policy_keeps_rows_before_bad_line() {
        let (_dir, path) = ledger_with(&[HEADER, ROW_1, BAD, ROW_2]).await;
        let contents = read_ledger(&path, MalformedPolicy::Stop).await.unwrap();
        let LedgerContents::Present(records) = contents else {
            panic!("expected Present");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "T1");
    }

    #[tokio::test]
    async fn test_skip_policy_continues_past_bad_line() {
        let (_dir, path) = ledger_with(&[HEADER, ROW_1, BAD, ROW_2]).await;
        let contents = read_ledger(&path, MalformedPolicy::Skip).await.unwrap();
        let LedgerContents::Present(records) = contents else {
            panic!("expected Present");
        };
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T,2"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_row_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut body = format!("{}\n{}\n", HEADER, ROW_1).into_bytes();
        body.extend_from_slice(b"\"CNN\",\"\xff\",\"T9\",\"u9\",\"t\"\n");
        fs::write(&path, body).await.unwrap();

        let contents = read_ledger(&path, MalformedPolicy::Stop).await.unwrap();
        let LedgerContents::Present(records) = contents else {
            panic!("expected Present");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "T1");
        assert_eq!(records[1].author, "\u{FFFD}");
        assert_eq!(records[1].title, "T9");
    }

    #[tokio::test]
    async fn test_invalid_utf8_header_is_header_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut body = b"Source,Author,\xffTitle,URL,Published At\n".to_vec();
        body.extend_from_slice(ROW_1.as_bytes());
        fs::write(&path, body).await.unwrap();

        assert!(matches!(
            read_ledger(&path, MalformedPolicy::Stop).await,
            Err(LedgerError::HeaderMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_crlf_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.csv");
        fs::write(&path, format!("{}\r\n{}\r\n", HEADER, ROW_1)).await.unwrap();
        let contents = read_ledger(&path, MalformedPolicy::Stop).await.unwrap();
        assert_eq!(
            contents,
            LedgerContents::Present(vec![Record::new(
                "CNN",
                "",
                "T1",
                "http://x/1",
                "2020-01-01T00:00:00Z"
            )])
        );
    }
}
