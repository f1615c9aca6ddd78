//! Upstream headline sources.
//!
//! A source turns one HTTP request into a batch of [`crate::models::Record`]s
//! in upstream order. Fetching is a single attempt: a failed request or an
//! undecodable body is reported as [`crate::error::LedgerError::Fetch`] and
//! the run stops before the ledger is touched.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | NewsAPI top headlines | [`newsapi`] | JSON API, `apiKey` query parameter |

pub mod newsapi;
