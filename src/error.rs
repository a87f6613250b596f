use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Remote ledger lookup/list failures. Every occurrence is non-fatal:
/// the pipeline records the failure and moves to the next sibling item.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },
}

/// File download failures, split by the step that failed
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },

    #[error("creating {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        AppError::Http(format!("HTTP request error: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for remote ledger calls
pub type LedgerResult<T> = Result<T, LedgerError>;
