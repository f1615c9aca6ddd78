//! Run settings, layered from defaults, an optional YAML file and the CLI.
//!
//! Precedence is CLI > YAML file > built-in defaults. A settings file looks like:
//!
//! ```yaml
//! output_dir: /var/lib/headlines
//! endpoint: https://newsapi.org/v2/top-headlines
//! sources: cnn
//! api_key: 0123456789abcdef
//! timeout_secs: 30
//! skip_malformed: false
//! dedupe_batch: false
//! ```

use crate::cli::Cli;
use crate::error::LedgerError;
use crate::ledger::merge::DedupePolicy;
use crate::ledger::reader::MalformedPolicy;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_SOURCES: &str = "cnn";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of the optional YAML settings file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub output_dir: Option<String>,
    pub endpoint: Option<String>,
    pub sources: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_malformed: Option<bool>,
    pub dedupe_batch: Option<bool>,
}

/// Where and how to fetch headlines.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub endpoint: String,
    pub sources: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    /// The day whose ledger this run reads and appends to.
    pub date: NaiveDate,
    pub source: SourceSettings,
    pub malformed: MalformedPolicy,
    pub dedupe: DedupePolicy,
}

/// Parse a YAML settings document.
pub fn parse_file_settings(yaml: &str) -> Result<FileSettings, LedgerError> {
    serde_yaml::from_str(yaml).map_err(|e| LedgerError::Config(format!("invalid settings file: {}", e)))
}

/// Load the YAML settings file at `path`.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn load_file_settings(path: &str) -> Result<FileSettings, LedgerError> {
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LedgerError::Config(format!("cannot read {}: {}", path, e)))?;
    parse_file_settings(&yaml)
}

impl Settings {
    /// Merge CLI arguments over file settings over defaults.
    ///
    /// `today` is used when no `--date` was given; the run date is fixed here
    /// once and passed down from then on.
    pub fn resolve(cli: &Cli, file: FileSettings, today: NaiveDate) -> Result<Self, LedgerError> {
        let date = match cli.date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| LedgerError::Config(format!("invalid --date {:?}: {}", raw, e)))?,
            None => today,
        };

        let output_dir = cli
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(LedgerError::Config("timeout_secs must be positive".to_string()));
        }

        let source = SourceSettings {
            endpoint: cli
                .endpoint
                .clone()
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            sources: cli
                .sources
                .clone()
                .or(file.sources)
                .unwrap_or_else(|| DEFAULT_SOURCES.to_string()),
            api_key: cli.api_key.clone().or(file.api_key),
            timeout: Duration::from_secs(timeout_secs),
        };

        let malformed = if cli.skip_malformed || file.skip_malformed.unwrap_or(false) {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Stop
        };
        let dedupe = if cli.dedupe_batch || file.dedupe_batch.unwrap_or(false) {
            DedupePolicy::WithinBatch
        } else {
            DedupePolicy::AgainstLedger
        };

        let settings = Settings {
            output_dir: PathBuf::from(output_dir),
            date,
            source,
            malformed,
            dedupe,
        };
        debug!(?settings.output_dir, %settings.date, ?settings.malformed, ?settings.dedupe, "Resolved settings");
        Ok(settings)
    }

    /// Resolve settings from parsed CLI arguments, reading the settings file if one was given.
    pub async fn load(cli: &Cli) -> Result<Self, LedgerError> {
        let file = match cli.config.as_deref() {
            Some(path) => load_file_settings(path).await?,
            None => FileSettings::default(),
        };
        Self::resolve(cli, file, Local::now().date_naive())
    }
}
