//! Error types for the three failure domains of the pipeline.
//!
//! Each domain is absorbed at a different layer:
//! - [`FetchError`] stops at the walker and becomes a skip notice.
//! - [`SummaryError`] stops at the summarizer and becomes the extractive fallback.
//! - [`ConfigError`] is fatal at startup.

use reqwest::StatusCode;
use thiserror::Error;

/// Why a page could not be turned into an [`ArticleRecord`](crate::models::ArticleRecord).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The site answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    /// The canonical URL could not be built from the id.
    #[error("invalid article url: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure of the generative summary tier.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summary request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("summary service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("summary service returned no completion text")]
    EmptyCompletion,
}

/// Startup configuration problems. None of these are recoverable per call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key for the summary service; set OPENAI_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid base url {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
