//! Data models for fetched headlines and ledger records.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Record`]: one article as stored in a ledger row
//! - [`RecordKey`]: the `(url, title)` pair that decides article identity
//! - [`TopHeadlines`], [`ApiArticle`], [`ApiSource`]: the upstream JSON payload
//!
//! The upstream models use camelCase field names to match the NewsAPI schema.

use serde::Deserialize;

/// One article as recorded in the ledger.
///
/// Every field is an arbitrary string; nothing is validated. The derived
/// `PartialEq` compares all five fields. Article identity is decided by
/// [`Record::key`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Display name of the publishing outlet.
    pub source: String,
    /// Byline, often empty.
    pub author: String,
    /// The headline.
    pub title: String,
    /// Canonical article URL.
    pub url: String,
    /// Publication timestamp exactly as the upstream reported it.
    pub published_at: String,
}

/// Identity of an article: two records with equal keys are the same article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey<'a> {
    pub url: &'a str,
    pub title: &'a str,
}

impl Record {
    pub fn new(
        source: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        published_at: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            author: author.into(),
            title: title.into(),
            url: url.into(),
            published_at: published_at.into(),
        }
    }

    /// The `(url, title)` pair used for duplicate detection.
    ///
    /// Comparison is byte-exact and case-sensitive. Author, source and
    /// timestamp play no part in identity.
    pub fn key(&self) -> RecordKey<'_> {
        RecordKey {
            url: &self.url,
            title: &self.title,
        }
    }
}

/// Top-level response of the top-headlines endpoint.
///
/// Only `articles` is required; `status` and `totalResults` are kept for logging.
#[allow(non_snake_case)]
#[derive(Debug, Deserialize)]
pub struct TopHeadlines {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub totalResults: Option<u64>,
    pub articles: Vec<ApiArticle>,
}

/// A single upstream article. Any field may be absent or `null`.
#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
pub struct ApiArticle {
    #[serde(default)]
    pub source: Option<ApiSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub publishedAt: Option<String>,
}

/// The nested `source` object of an upstream article.
#[derive(Debug, Default, Deserialize)]
pub struct ApiSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ApiArticle> for Record {
    fn from(article: ApiArticle) -> Self {
        Record::new(
            article.source.and_then(|s| s.name).unwrap_or_default(),
            article.author.unwrap_or_default(),
            article.title.unwrap_or_default(),
            article.url.unwrap_or_default(),
            article.publishedAt.unwrap_or_default(),
        )
    }
}
