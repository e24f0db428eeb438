//! Token error taxonomy.

use thiserror::Error;

/// A result type using `TokenError`.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Errors raised while issuing or verifying tokens.
///
/// Every verification failure maps to exactly one variant so callers can
/// apply differentiated policy by kind instead of matching on message text.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is structurally invalid and cannot be decoded at all.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token is outside its validity window: `exp` has passed or `nbf`
    /// has not been reached yet.
    #[error("token expired or not yet valid")]
    Expired,

    /// The signature does not verify under the current key, or no
    /// verification key is held at all.
    #[error("token signature mismatch")]
    Signature,

    /// The payload decoded as JSON but is not the expected claims shape.
    #[error("token claims have an unexpected shape")]
    AssertClaims,

    /// Any other validation failure, e.g. an unexpected signing algorithm.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Key material could not be parsed at construction time.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Signing failed while issuing a token.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// True when the caller should hint its key broker to renew: the
    /// verification key may have rotated since it was last resolved.
    #[must_use]
    pub const fn should_renew_key(&self) -> bool {
        matches!(self, Self::Signature)
    }

    /// True for failures of the presented token itself, as opposed to
    /// failures of the local setup.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::Expired | Self::Signature | Self::AssertClaims | Self::Invalid(_)
        )
    }

    /// The appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Malformed(_)
            | Self::Expired
            | Self::Signature
            | Self::AssertClaims
            | Self::Invalid(_) => 401,
            Self::InvalidKey(_) | Self::Signing(_) => 500,
        }
    }
}
