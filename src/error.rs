use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while fetching a document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(StatusCode),
}

impl FetchError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Errors that terminate a pipeline run
///
/// Per-entry failures are recovered inside the pipeline and only ever show up as log events.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unable to fetch root document: {0}")]
    RootFetch(#[source] FetchError),

    #[error("Root document is not valid JSON: {0}")]
    RootParse(#[source] serde_json::Error),

    #[error("Root document has an unexpected shape: {0}")]
    RootShape(String),

    #[error("Unable to write playlist '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
