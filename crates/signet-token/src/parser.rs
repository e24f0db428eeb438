//! Token verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::claims::Claims;
use crate::error::{Result, TokenError};

/// Verifies token signatures and temporal claims against one public key.
///
/// A parser is either constructed once for a static key, or rebuilt per
/// request from a freshly copied broker key when the key rotates. It is
/// stateless beyond the key and safe for concurrent use.
#[derive(Clone)]
pub struct Parser {
    key: Option<DecodingKey>,
    algorithm: Algorithm,
    verifying: Validation,
    unverified: Validation,
}

impl Parser {
    /// Create a parser verifying RS256 signatures with `key`.
    #[must_use]
    pub fn new(key: DecodingKey) -> Self {
        Self::with_algorithm(key, Algorithm::RS256)
    }

    /// Create a parser pinned to `algorithm`.
    #[must_use]
    pub fn with_algorithm(key: DecodingKey, algorithm: Algorithm) -> Self {
        Self {
            key: Some(key),
            algorithm,
            verifying: verifying_validation(algorithm),
            unverified: unverified_validation(algorithm),
        }
    }

    /// Create a parser from PEM-encoded RSA public key material.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] when the PEM cannot be parsed.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    /// Create a parser that holds no key and rejects every token with
    /// [`TokenError::Signature`].
    ///
    /// This is the behavior required of callers before a key broker has
    /// resolved any material: verification fails closed instead of
    /// erroring, and the signature-mismatch result hints the broker to
    /// renew.
    #[must_use]
    pub fn fail_closed() -> Self {
        let algorithm = Algorithm::RS256;
        Self {
            key: None,
            algorithm,
            verifying: verifying_validation(algorithm),
            unverified: unverified_validation(algorithm),
        }
    }

    /// Decode `raw`, verify its signature and validity window, and return
    /// the embedded claims.
    ///
    /// Failures are reported with a fixed precedence so callers can branch
    /// on the kind: structural problems first, then claim shape, then the
    /// validity window, then the signature, then everything else. The
    /// window is checked before the signature so that a rotated key cannot
    /// mask an expired token.
    ///
    /// # Errors
    ///
    /// Exactly one of [`TokenError::Malformed`],
    /// [`TokenError::AssertClaims`], [`TokenError::Expired`],
    /// [`TokenError::Signature`] or [`TokenError::Invalid`].
    pub fn parse(&self, raw: &str) -> Result<Claims> {
        let header = decode_header(raw).map_err(|e| TokenError::Malformed(e.to_string()))?;
        if header.alg != self.algorithm {
            return Err(TokenError::Invalid(format!(
                "unexpected signing algorithm {:?}",
                header.alg
            )));
        }

        // Shape and validity window, without the signature.
        decode::<Claims>(raw, &DecodingKey::from_secret(&[]), &self.unverified)
            .map_err(|e| classify(&e))?;

        let key = self.key.as_ref().ok_or(TokenError::Signature)?;
        let data = decode::<Claims>(raw, key, &self.verifying).map_err(|e| classify(&e))?;
        Ok(data.claims)
    }
}

fn verifying_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation
}

fn unverified_validation(algorithm: Algorithm) -> Validation {
    let mut validation = verifying_validation(algorithm);
    validation.insecure_disable_signature_validation();
    validation
}

fn classify(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            TokenError::Malformed(err.to_string())
        }
        ErrorKind::Json(source) => {
            if source.classify() == serde_json::error::Category::Data {
                TokenError::AssertClaims
            } else {
                TokenError::Malformed(err.to_string())
            }
        }
        ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::Signature,
        _ => TokenError::Invalid(err.to_string()),
    }
}
