//! Error taxonomy for the sentinel
//!
//! Fatal errors (`ConfigError`) abort startup before the detection loop
//! runs. Everything else is cycle-scoped: caught at the boundary of the
//! operation that produced it, logged, and the loop moves on.

use reqwest::StatusCode;
use thiserror::Error;

/// Fatal startup errors. The process never enters the detection loop if
/// one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("required environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("placeholder host detected in prometheus_url: {0}")]
    PlaceholderHost(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Recoverable metric-fetch errors, scoped to a single cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    HttpStatus(StatusCode),

    #[error("malformed response body: {0}")]
    Parse(String),

    #[error("query returned no results")]
    EmptyResult,

    #[error("invalid time range: {0}")]
    InvalidRange(String),
}

/// Recoverable model-fit errors. A failed fit costs one classification,
/// never the process.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("not enough samples to fit: {got} < {need}")]
    TooFewSamples { got: usize, need: usize },

    #[error("degenerate training data (near-zero spread)")]
    DegenerateData,
}

/// Recoverable alert-delivery errors.
#[derive(Debug, Error)]
pub enum DeliverError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("webhook returned HTTP status: {0}")]
    HttpStatus(StatusCode),
}
