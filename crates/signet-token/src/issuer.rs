//! Token issuance.

use chrono::Duration;
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::claims::Claims;
use crate::consumer::Consumer;
use crate::error::{Result, TokenError};

/// Validity applied when a non-positive period is configured.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 60;

/// Signs claims into transportable token strings.
///
/// An issuer is constructed once at service start and immutable afterwards.
/// Signing is a pure function of its fields and the supplied claims, so a
/// single issuer is safe to share across request-handling tasks.
#[derive(Clone)]
pub struct Issuer {
    key: EncodingKey,
    name: String,
    validity: Duration,
    algorithm: Algorithm,
}

impl Issuer {
    /// Create an issuer from an already parsed private key.
    ///
    /// `validity_minutes` values of zero or below fall back to
    /// [`DEFAULT_VALIDITY_MINUTES`]. The signing algorithm defaults to
    /// RS256.
    #[must_use]
    pub fn new(key: EncodingKey, name: impl Into<String>, validity_minutes: i64) -> Self {
        let minutes = if validity_minutes > 0 {
            validity_minutes
        } else {
            DEFAULT_VALIDITY_MINUTES
        };
        Self {
            key,
            name: name.into(),
            validity: Duration::minutes(minutes),
            algorithm: Algorithm::RS256,
        }
    }

    /// Create an issuer from PEM-encoded RSA private key material.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] when the PEM cannot be parsed.
    pub fn from_pem(pem: &[u8], name: impl Into<String>, validity_minutes: i64) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self::new(key, name, validity_minutes))
    }

    /// Pin a different signing algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// The display name stamped into the `iss` claim.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validity period applied by [`Issuer::issue`].
    #[must_use]
    pub const fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign a fresh token for `consumer`.
    ///
    /// The claims get a new v4 token id, this issuer's name, and a validity
    /// window starting now and ending after the configured period.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when the key cannot produce a
    /// signature.
    pub fn issue(&self, consumer: Consumer) -> Result<String> {
        let claims = Claims::new(consumer, self.name.clone(), self.validity);
        self.issue_with_claims(&claims)
    }

    /// Sign caller-supplied claims verbatim, without defaulting any field.
    ///
    /// Gives tests and advanced callers control over every temporal field.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] when the key cannot produce a
    /// signature.
    pub fn issue_with_claims(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}
