//! NewsAPI top-headlines client.
//!
//! Requests `GET {endpoint}?sources={sources}&apiKey={key}` and maps the
//! `articles` array of the response into ledger records. Absent or `null`
//! article fields become empty strings rather than failing the batch.

use crate::config::SourceSettings;
use crate::error::{FetchError, LedgerError};
use crate::models::{Record, TopHeadlines};
use crate::utils::truncate_for_log;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Build the request URL for `settings`.
pub fn request_url(settings: &SourceSettings) -> Result<Url, FetchError> {
    let mut params = vec![("sources", settings.sources.as_str())];
    if let Some(key) = settings.api_key.as_deref() {
        params.push(("apiKey", key));
    }
    Ok(Url::parse_with_params(&settings.endpoint, &params)?)
}

/// Decode a response body into records, keeping upstream order.
pub fn records_from_body(body: &str) -> Result<Vec<Record>, FetchError> {
    let page: TopHeadlines = serde_json::from_str(body)?;
    debug!(status = ?page.status, total = ?page.totalResults, "Decoded top headlines");
    Ok(page.articles.into_iter().map(Record::from).collect())
}

/// Fetch the current top headlines.
///
/// # Errors
///
/// [`LedgerError::Fetch`] if the request fails, times out, returns a non-2xx
/// status, or the body is not a top-headlines document.
#[instrument(level = "info", skip_all, fields(endpoint = %settings.endpoint, sources = %settings.sources))]
pub async fn fetch_headlines(settings: &SourceSettings) -> Result<Vec<Record>, LedgerError> {
    Ok(fetch(settings).await?)
}

async fn fetch(settings: &SourceSettings) -> Result<Vec<Record>, FetchError> {
    if settings.api_key.is_none() {
        warn!("No API key configured; the endpoint will likely reject the request");
    }

    let url = request_url(settings)?;
    let client = Client::builder().timeout(settings.timeout).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "Upstream rejected request");
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let records = records_from_body(&body).inspect_err(|e| {
        warn!(error = %e, body = %truncate_for_log(&body, 300), "Response is not a top-headlines document");
    })?;
    info!(count = records.len(), "Fetched headlines");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(api_key: Option<&str>) -> SourceSettings {
        SourceSettings {
            endpoint: "https://newsapi.org/v2/top-headlines".to_string(),
            sources: "cnn".to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_request_url_with_key() {
        let url = request_url(&settings(Some("k3y"))).unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?sources=cnn&apiKey=k3y"
        );
    }

    #[test]
    fn test_request_url_without_key() {
        let url = request_url(&settings(None)).unwrap();
        assert_eq!(url.as_str(), "https://newsapi.org/v2/top-headlines?sources=cnn");
    }

    #[test]
    fn test_request_url_invalid_endpoint() {
        let mut s = settings(None);
        s.endpoint = "not a url".to_string();
        assert!(matches!(request_url(&s), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_records_from_body_tolerates_nulls() {
        let body = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {"source": {"id": "cnn", "name": "CNN"}, "author": null, "title": "T1",
                 "url": "http://x/1", "publishedAt": "2020-01-01T00:00:00Z"},
                {"source": {"name": "CNN"}, "title": "T2", "url": "http://x/2"},
                {}
            ]
        }"#;

        let records = records_from_body(body).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("CNN", "", "T1", "http://x/1", "2020-01-01T00:00:00Z"),
                Record::new("CNN", "", "T2", "http://x/2", ""),
                Record::default(),
            ]
        );
    }

    #[test]
    fn test_records_from_body_requires_articles() {
        let body = r#"{"status": "error", "code": "apiKeyMissing"}"#;
        assert!(matches!(records_from_body(body), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_records_from_body_rejects_garbage() {
        assert!(records_from_body("<html>").is_err());
    }
}
