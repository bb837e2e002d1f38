use thiserror::Error;

use nfo_scout_core::ExtractionError;
use nfo_scout_lib::{CacheError, ScanError, SettingsError, TranslateError};
use nfo_scout_scraper::ScrapeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Translation cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// The run finished but some items failed
    #[error("{0} item(s) failed")]
    ItemsFailed(usize),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
