// src/error.rs
// =============================================================================
// Error types for every layer of the application.
//
// Only a few things are real errors here:
// - ScanError: the tokenizer hit a hard failure (the document is unusable)
// - AnalyzeError: the analysis could not produce a report at all
// - FetchError: a single link probe failed (never leaves the prober)
// - PageError: the page we were asked to analyze could not be retrieved
// - ConfigError: a configuration value could not be understood
//
// Rejected links and cancelled probes are NOT errors: they show up in the
// report's counts and its probe_status field.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// A hard tokenizer failure. Recoverable HTML mistakes never produce one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("token of {size} bytes exceeds the {limit} byte buffer limit")]
    TokenTooLarge { size: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("html document is not valid: {0}")]
    DocumentInvalid(#[from] ScanError),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not perform request: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error("error while performing HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("could not get a response from url: HTTP {0}")]
    Status(StatusCode),

    #[error("response content type wasn't text/html: {0:?}")]
    ContentType(String),

    #[error("could not read the response body: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid duration '{0}', expected e.g. 30s, 500ms or 2m")]
    InvalidDuration(String),

    #[error("base path `{0}` does not exist")]
    MissingLogDirectory(String),

    #[error("error while opening file `{path}` for logging: {reason}")]
    LogFile { path: String, reason: String },
}
