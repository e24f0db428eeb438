//! Key byte sources.
//!
//! A [`KeySource`] resolves raw PEM bytes from exactly one origin: an
//! inline configuration value, a local file, an environment variable or an
//! HTTP endpoint. Sources are stateless descriptors of *where* bytes live;
//! retry policy belongs to the broker that polls them.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SourceError};

/// Default request timeout for [`HttpSource`].
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves raw key bytes from one origin.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] describing why this origin could not
    /// produce bytes. A source bound to an empty configuration value fails
    /// fast with [`SourceError::EmptyConfig`] before attempting any I/O.
    async fn get(&self) -> Result<Vec<u8>>;

    /// Short human-readable origin description used in fallthrough logs.
    fn describe(&self) -> String;
}

/// A key embedded directly in configuration.
#[derive(Debug, Clone)]
pub struct ValueSource {
    value: String,
}

impl ValueSource {
    /// Create a source serving `value` as-is.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

#[async_trait]
impl KeySource for ValueSource {
    async fn get(&self) -> Result<Vec<u8>> {
        if self.value.is_empty() {
            return Err(SourceError::EmptyConfig);
        }
        Ok(self.value.clone().into_bytes())
    }

    fn describe(&self) -> String {
        "inline value".to_string()
    }
}

/// A key read from a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl KeySource for FileSource {
    async fn get(&self) -> Result<Vec<u8>> {
        if self.path.as_os_str().is_empty() {
            return Err(SourceError::EmptyConfig);
        }
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A key read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSource {
    name: String,
}

impl EnvSource {
    /// Create a source reading the variable called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl KeySource for EnvSource {
    async fn get(&self) -> Result<Vec<u8>> {
        if self.name.is_empty() {
            return Err(SourceError::EmptyConfig);
        }
        match std::env::var(&self.name) {
            Ok(value) if value.is_empty() => Err(SourceError::EmptyConfig),
            Ok(value) => Ok(value.into_bytes()),
            Err(_) => Err(SourceError::MissingVar(self.name.clone())),
        }
    }

    fn describe(&self) -> String {
        format!("env {}", self.name)
    }
}

/// A key fetched with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source fetching from `url` with the default timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen
    /// with default TLS).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a source fetching from `url` with a custom request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen
    /// with default TLS).
    #[must_use]
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { url: url.into(), client }
    }
}

#[async_trait]
impl KeySource for HttpSource {
    async fn get(&self) -> Result<Vec<u8>> {
        if self.url.is_empty() {
            return Err(SourceError::EmptyConfig);
        }

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
