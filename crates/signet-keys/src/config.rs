//! Broker configuration types.
//!
//! The crate never reads the environment itself: collaborators deserialize
//! a [`BrokerConfig`] from wherever they load configuration and pass it to
//! the broker's constructor.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::chain::SourceChain;
use crate::source::{EnvSource, FileSource, HttpSource, KeySource, ValueSource};

/// Configuration for a key broker and its source chain.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Inline PEM value, tried first when set.
    #[serde(default)]
    pub key_value: Option<String>,

    /// Path to a PEM file, tried second when set.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Name of an environment variable holding PEM material, tried third
    /// when set.
    #[serde(default)]
    pub key_env: Option<String>,

    /// URL serving PEM material, tried last when set.
    #[serde(default)]
    pub key_url: Option<String>,

    /// Poll interval in seconds.
    #[serde(default = "BrokerConfig::default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Request timeout for the URL source in seconds.
    #[serde(default = "BrokerConfig::default_http_timeout")]
    pub http_timeout_seconds: u64,
}

impl BrokerConfig {
    const fn default_poll_interval() -> u64 {
        300
    }

    const fn default_http_timeout() -> u64 {
        10
    }

    /// The poll interval as a `Duration`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// The URL source timeout as a `Duration`.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Build the ordered source chain from the configured locations.
    ///
    /// Unset locations are skipped; the order is inline value, file,
    /// environment variable, URL.
    #[must_use]
    pub fn source_chain(&self) -> SourceChain {
        let mut sources: Vec<Box<dyn KeySource>> = Vec::new();
        if let Some(value) = &self.key_value {
            sources.push(Box::new(ValueSource::new(value.clone())));
        }
        if let Some(path) = &self.key_file {
            sources.push(Box::new(FileSource::new(path.clone())));
        }
        if let Some(name) = &self.key_env {
            sources.push(Box::new(EnvSource::new(name.clone())));
        }
        if let Some(url) = &self.key_url {
            sources.push(Box::new(HttpSource::with_timeout(url.clone(), self.http_timeout())));
        }
        SourceChain::new(sources)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            key_value: None,
            key_file: None,
            key_env: None,
            key_url: None,
            poll_interval_seconds: Self::default_poll_interval(),
            http_timeout_seconds: Self::default_http_timeout(),
        }
    }
}
