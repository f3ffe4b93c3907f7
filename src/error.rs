use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Category '{category}' unavailable: {reason}")]
    CategoryUnavailable { category: String, reason: String },

    #[error("Malformed result row: {0}")]
    RowParse(String),

    #[error("Failed to write snapshot to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser command failed: {0}")]
    Browser(String),

    #[error("Timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScraperError {
    /// Fatal errors end the run; everything else is absorbed at category level or below.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScraperError::Configuration(_)
                | ScraperError::Authentication(_)
                | ScraperError::Persistence { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
