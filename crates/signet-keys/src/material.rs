//! Brokered key material.
//!
//! The broker core is generic over *what* it publishes; the two
//! specializations here differ only in how PEM bytes parse and in which
//! token-side component they feed: [`VerificationKey`] builds parsers,
//! [`SigningKey`] builds issuers.

use jsonwebtoken::{DecodingKey, EncodingKey};
use signet_token::{Issuer, Parser, Result as TokenResult, TokenError};

/// Key material a [`KeyBroker`](crate::KeyBroker) can resolve, cache and
/// publish.
///
/// The placeholder is the documented value served before the first
/// successful resolution: it carries no key and zero bytes, and anything
/// built from it fails closed.
pub trait BrokeredKey: Clone + Send + Sync + 'static {
    /// Role label used in broker log context.
    const ROLE: &'static str;

    /// Parse PEM bytes into key material.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] when the bytes are not a valid
    /// PEM key of the expected type.
    fn from_pem(pem: &[u8]) -> TokenResult<Self>;

    /// The explicitly zeroed value served before any resolution succeeds.
    fn placeholder() -> Self;

    /// True for the pre-resolution placeholder.
    fn is_placeholder(&self) -> bool;

    /// Size of the original PEM blob in bytes, zero for the placeholder.
    fn byte_len(&self) -> usize;

    /// Short content hash of the PEM blob for log correlation, empty for
    /// the placeholder.
    fn fingerprint(&self) -> &str;
}

/// Public key material used to verify token signatures.
#[derive(Clone)]
pub struct VerificationKey {
    key: Option<DecodingKey>,
    pem_len: usize,
    fingerprint: String,
}

impl VerificationKey {
    /// Build a parser over this material.
    ///
    /// The placeholder yields a fail-closed parser rejecting every token
    /// with a signature error, which in turn makes callers hint their
    /// broker to renew.
    #[must_use]
    pub fn parser(&self) -> Parser {
        match &self.key {
            Some(key) => Parser::new(key.clone()),
            None => Parser::fail_closed(),
        }
    }

    /// The parsed decoding key, absent for the placeholder.
    #[must_use]
    pub const fn decoding_key(&self) -> Option<&DecodingKey> {
        self.key.as_ref()
    }
}

impl BrokeredKey for VerificationKey {
    const ROLE: &'static str = "verification";

    fn from_pem(pem: &[u8]) -> TokenResult<Self> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key: Some(key),
            pem_len: pem.len(),
            fingerprint: fingerprint(pem),
        })
    }

    fn placeholder() -> Self {
        Self {
            key: None,
            pem_len: 0,
            fingerprint: String::new(),
        }
    }

    fn is_placeholder(&self) -> bool {
        self.key.is_none()
    }

    fn byte_len(&self) -> usize {
        self.pem_len
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Private key material used to sign tokens.
#[derive(Clone)]
pub struct SigningKey {
    key: Option<EncodingKey>,
    pem_len: usize,
    fingerprint: String,
}

impl SigningKey {
    /// Build an issuer signing with this material.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] for the placeholder: nothing can
    /// be signed before the broker has resolved private key material.
    pub fn issuer(&self, name: impl Into<String>, validity_minutes: i64) -> TokenResult<Issuer> {
        match &self.key {
            Some(key) => Ok(Issuer::new(key.clone(), name, validity_minutes)),
            None => Err(TokenError::InvalidKey("no signing key resolved yet".to_string())),
        }
    }

    /// The parsed encoding key, absent for the placeholder.
    #[must_use]
    pub const fn encoding_key(&self) -> Option<&EncodingKey> {
        self.key.as_ref()
    }
}

impl BrokeredKey for SigningKey {
    const ROLE: &'static str = "signing";

    fn from_pem(pem: &[u8]) -> TokenResult<Self> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key: Some(key),
            pem_len: pem.len(),
            fingerprint: fingerprint(pem),
        })
    }

    fn placeholder() -> Self {
        Self {
            key: None,
            pem_len: 0,
            fingerprint: String::new(),
        }
    }

    fn is_placeholder(&self) -> bool {
        self.key.is_none()
    }

    fn byte_len(&self) -> usize {
        self.pem_len
    }

    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint(pem: &[u8]) -> String {
    hex::encode(&blake3::hash(pem).as_bytes()[..8])
}

#[cfg(test)]
mod tests {
    use signet_token::{testkeys, Consumer};

    use super::*;

    #[test]
    fn verification_key_parses_public_pem() {
        let key = VerificationKey::from_pem(testkeys::RSA_PUBLIC_PEM.as_bytes()).unwrap();
        assert!(!key.is_placeholder());
        assert_eq!(key.byte_len(), testkeys::RSA_PUBLIC_PEM.len());
        assert_eq!(key.fingerprint().len(), 16);
    }

    #[test]
    fn verification_key_rejects_garbage() {
        let result = VerificationKey::from_pem(b"not a key");
        assert!(matches!(result, Err(TokenError::InvalidKey(_))));
    }

    #[test]
    fn placeholder_is_zeroed() {
        let key = VerificationKey::placeholder();
        assert!(key.is_placeholder());
        assert_eq!(key.byte_len(), 0);
        assert!(key.fingerprint().is_empty());
        assert!(key.decoding_key().is_none());
    }

    #[test]
    fn placeholder_parser_fails_closed() {
        let issuer =
            Issuer::from_pem(testkeys::RSA_PRIVATE_PEM.as_bytes(), "identity-service", 60).unwrap();
        let token = issuer.issue(Consumer::default()).unwrap();

        let result = VerificationKey::placeholder().parser().parse(&token);
        assert!(matches!(result, Err(TokenError::Signature)));
    }

    #[test]
    fn signing_key_issues_tokens() {
        let key = SigningKey::from_pem(testkeys::RSA_PRIVATE_PEM.as_bytes()).unwrap();
        let issuer = key.issuer("identity-service", 60).unwrap();
        let token = issuer.issue(Consumer::default()).unwrap();

        let parser = VerificationKey::from_pem(testkeys::RSA_PUBLIC_PEM.as_bytes())
            .unwrap()
            .parser();
        assert!(parser.parse(&token).is_ok());
    }

    #[test]
    fn signing_placeholder_cannot_issue() {
        let result = SigningKey::placeholder().issuer("identity-service", 60);
        assert!(matches!(result, Err(TokenError::InvalidKey(_))));
    }

    #[test]
    fn distinct_material_has_distinct_fingerprints() {
        let a = VerificationKey::from_pem(testkeys::RSA_PUBLIC_PEM.as_bytes()).unwrap();
        let b = VerificationKey::from_pem(testkeys::ALT_RSA_PUBLIC_PEM.as_bytes()).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
