//! Signature-failure recovery.
//!
//! Verifying callers copy the broker's current key per request. When a
//! token's signature does not verify, the key may have rotated since the
//! broker's last successful poll, so the verifier hints the broker to
//! renew; the broker's loop re-resolves off the request path and the next
//! copy reflects the new key.

use std::sync::Arc;

use signet_token::{Claims, Result};

use crate::broker::VerificationKeyBroker;

/// Verifies tokens against broker-fresh key material and triggers a
/// renewal on signature mismatches.
///
/// The request that observed the mismatch is still rejected; recovery is
/// asynchronous by design, so no caller ever blocks on key resolution.
pub struct RotatingVerifier {
    broker: Arc<VerificationKeyBroker>,
}

impl RotatingVerifier {
    /// Create a verifier reading from `broker`.
    #[must_use]
    pub fn new(broker: Arc<VerificationKeyBroker>) -> Self {
        Self { broker }
    }

    /// Verify `token` against the broker's current key and return its
    /// claims.
    ///
    /// On a signature mismatch the broker is asked to renew, fire and
    /// forget, before the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// The [`TokenError`](signet_token::TokenError) taxonomy of
    /// [`Parser::parse`](signet_token::Parser::parse).
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let parser = self.broker.copy().parser();
        match parser.parse(token) {
            Err(error) if error.should_renew_key() => {
                tracing::debug!("signature mismatch, requesting key renewal");
                self.broker.renew();
                Err(error)
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use signet_token::{testkeys, Consumer, Issuer, TokenError};

    use super::*;
    use crate::broker::KeyBroker;
    use crate::chain::SourceChain;
    use crate::source::ValueSource;

    fn issuer(private_pem: &str) -> Issuer {
        Issuer::from_pem(private_pem.as_bytes(), "identity-service", 60).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn verifies_against_current_material() {
        let chain = SourceChain::new(vec![Box::new(ValueSource::new(testkeys::RSA_PUBLIC_PEM))]);
        let broker = Arc::new(KeyBroker::new(chain, Duration::from_secs(60)));
        broker.run();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let verifier = RotatingVerifier::new(Arc::clone(&broker));
        let token = issuer(testkeys::RSA_PRIVATE_PEM).issue(Consumer::default()).unwrap();
        assert!(verifier.verify(&token).is_ok());

        broker.close();
    }

    #[tokio::test(start_paused = true)]
    async fn mismatch_rejects_and_renews() {
        let chain = SourceChain::new(vec![Box::new(ValueSource::new(testkeys::RSA_PUBLIC_PEM))]);
        let broker = Arc::new(KeyBroker::new(chain, Duration::from_secs(60)));
        broker.run();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let verifier = RotatingVerifier::new(Arc::clone(&broker));
        let foreign = issuer(testkeys::ALT_RSA_PRIVATE_PEM).issue(Consumer::default()).unwrap();
        assert!(matches!(verifier.verify(&foreign), Err(TokenError::Signature)));

        broker.close();
    }

    #[tokio::test(start_paused = true)]
    async fn non_signature_failures_do_not_renew() {
        let chain = SourceChain::new(vec![Box::new(ValueSource::new(testkeys::RSA_PUBLIC_PEM))]);
        let broker = Arc::new(KeyBroker::new(chain, Duration::from_secs(60)));
        broker.run();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let verifier = RotatingVerifier::new(Arc::clone(&broker));
        assert!(matches!(
            verifier.verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));

        broker.close();
    }
}
