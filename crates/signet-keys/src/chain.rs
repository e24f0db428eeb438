//! Ordered fallback across key sources.

use async_trait::async_trait;

use crate::error::{Result, SourceError};
use crate::source::KeySource;

/// An ordered, immutable list of key sources tried first to last.
///
/// Resolution returns the bytes of the first source that succeeds. A chain
/// is itself a [`KeySource`], so chains compose.
pub struct SourceChain {
    sources: Vec<Box<dyn KeySource>>,
}

impl SourceChain {
    /// Create a chain that tries `sources` in order.
    #[must_use]
    pub fn new(sources: Vec<Box<dyn KeySource>>) -> Self {
        Self { sources }
    }

    /// Number of sources in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when the chain holds no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve bytes from the first source that succeeds.
    ///
    /// Each failed attempt is logged at debug level and the next source is
    /// tried.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Exhausted`] reporting the attempted count
    /// when every source fails.
    pub async fn get(&self) -> Result<Vec<u8>> {
        for source in &self.sources {
            match source.get().await {
                Ok(bytes) => return Ok(bytes),
                Err(error) => {
                    tracing::debug!(source = %source.describe(), %error, "key source failed, trying next");
                }
            }
        }
        Err(SourceError::Exhausted { attempted: self.sources.len() })
    }
}

#[async_trait]
impl KeySource for SourceChain {
    async fn get(&self) -> Result<Vec<u8>> {
        Self::get(self).await
    }

    fn describe(&self) -> String {
        format!("chain of {} sources", self.sources.len())
    }
}
