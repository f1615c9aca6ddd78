//! Working out which fetched records are new.
//!
//! Identity is the `(url, title)` pair from [`Record::key`]. The existing
//! ledger is indexed once into a hash set so each incoming record costs a
//! single lookup.

use crate::models::{Record, RecordKey};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::debug;

/// Whether repeated articles inside one fetched batch are collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupePolicy {
    /// Only drop records already in the ledger. Repeats within the batch are all kept.
    #[default]
    AgainstLedger,
    /// Also keep only the first occurrence of each article within the batch.
    WithinBatch,
}

/// Records from `incoming` whose identity matches nothing in `existing`.
///
/// Order of `incoming` is preserved. Repeats inside `incoming` are kept.
pub fn compute_delta(existing: &[Record], incoming: &[Record]) -> Vec<Record> {
    let seen: HashSet<RecordKey<'_>> = existing.iter().map(Record::key).collect();
    let delta: Vec<Record> = incoming
        .iter()
        .filter(|r| !seen.contains(&r.key()))
        .cloned()
        .collect();
    debug!(
        existing = existing.len(),
        incoming = incoming.len(),
        new = delta.len(),
        "Computed delta"
    );
    delta
}

/// Apply `policy` to a batch before it is merged or written.
pub fn dedupe_batch(batch: Vec<Record>, policy: DedupePolicy) -> Vec<Record> {
    match policy {
        DedupePolicy::AgainstLedger => batch,
        DedupePolicy::WithinBatch => batch
            .into_iter()
            .unique_by(|r| (r.url.clone(), r.title.clone()))
            .collect(),
    }
}
