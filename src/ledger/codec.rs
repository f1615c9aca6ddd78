//! Line codec for ledger rows.
//!
//! A row is five double-quoted fields joined by commas:
//!
//! ```text
//! "CNN","Jane Doe","Markets rally, then slip","https://cnn.com/a","2020-01-01T00:00:00Z"
//! ```
//!
//! Quote characters inside a field are written as-is, so a field containing
//! `"` does not survive a round trip.

use crate::error::LedgerError;
use crate::models::Record;

/// Number of columns in every ledger row.
pub const COLUMNS: usize = 5;

/// Encode a record as a ledger row, without the trailing newline.
pub fn encode(record: &Record) -> String {
    [
        &record.source,
        &record.author,
        &record.title,
        &record.url,
        &record.published_at,
    ]
    .iter()
    .map(|field| quote(field))
    .collect::<Vec<_>>()
    .join(",")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field)
}

/// Decode one ledger row back into a [`Record`].
///
/// `line_number` is only used to label the error.
///
/// # Errors
///
/// [`LedgerError::MalformedRecord`] when the row does not split into exactly
/// five fields, or when a field does not both start and end with `"`.
pub fn decode(line: &str, line_number: usize) -> Result<Record, LedgerError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let tokens = split_quoted(line);
    if tokens.len() != COLUMNS {
        return Err(LedgerError::MalformedRecord {
            line_number,
            detail: format!("wrong number of columns ({} instead of {})", tokens.len(), COLUMNS),
        });
    }

    let fields = tokens
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            unquote(token)
                .map(str::to_string)
                .ok_or_else(|| LedgerError::MalformedRecord {
                    line_number,
                    detail: format!("field {} is not enclosed in double quotes: {:?}", i + 1, token),
                })
        })
        .collect::<Result<Vec<String>, LedgerError>>()?;

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    Ok(Record {
        source: next(),
        author: next(),
        title: next(),
        url: next(),
        published_at: next(),
    })
}

/// Split on commas that have an even number of `"` before them on the line.
pub fn split_quoted(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(COLUMNS);
    let mut quotes = 0usize;
    let mut start = 0usize;

    for (i, b) in line.bytes().enumerate() {
        match b {
            b'"' => quotes += 1,
            b',' if quotes % 2 == 0 => {
                tokens.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&line[start..]);
    tokens
}

/// Strip exactly one leading and one trailing quote character.
///
/// `None` unless the token is at least two bytes long and quoted at both ends.
fn unquote(token: &str) -> Option<&str> {
    token.strip_prefix('"')?.strip_suffix('"')
}
