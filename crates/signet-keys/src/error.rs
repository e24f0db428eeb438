//! Key sourcing errors.

use thiserror::Error;

/// A result type using `SourceError`.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors raised while resolving raw key bytes from a source.
///
/// These never reach request-handling callers: the broker's background loop
/// logs them and retries on its next tick. They are a separate taxonomy
/// from token-validation errors and the two are never conflated.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source was configured with an empty value, path, variable name
    /// or URL; no I/O is attempted.
    #[error("source configuration is empty")]
    EmptyConfig,

    /// Reading a key file failed.
    #[error("failed to read key file: {0}")]
    Io(#[from] std::io::Error),

    /// The configured environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVar(String),

    /// The HTTP request for the key failed.
    #[error("key request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The key endpoint answered with a non-success status.
    #[error("key endpoint returned status {0}")]
    Status(u16),

    /// Every source in the chain failed. The individual causes are logged
    /// rather than aggregated, keeping this error stable for comparison.
    #[error("no key source resolved ({attempted} attempted)")]
    Exhausted {
        /// How many sources were tried before giving up.
        attempted: usize,
    },
}
