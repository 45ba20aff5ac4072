//! Error types for the summarization client

use thiserror::Error;

/// Rejected selection changes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select a maximum of {max} files ({attempted} selected)")]
    TooManyFiles { attempted: usize, max: usize },

    #[error("No file at position {index} (selection has {count})")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Failure to obtain and decode a response from the service
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not reach the summarization server: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("could not build the upload: {0}")]
    InvalidRequest(String),

    #[error("unexpected response from the summarization server: {0}")]
    MalformedBody(String),
}

/// Caller-side misuse of the submit trigger
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("No files selected")]
    EmptySelection,

    #[error("A summarization request is already running")]
    AlreadyInFlight,
}

/// Clipboard and download failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export for this result")]
    NothingToExport,

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_files must be at least 1")]
    ZeroMaxFiles,

    #[error("endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),
}
