//! The signed token payload.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consumer::Consumer;

/// The signed payload of a token: the consumer plus the registered claims.
///
/// The registered fields use their standard short names on the wire and
/// carry instants as epoch seconds. A well-behaved issuer keeps
/// `exp >= nbf >= iat`; the verifier checks each field against the current
/// instant independently and never enforces that ordering. Claims have no
/// durable form other than the signed token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated principal.
    pub consumer: Consumer,
    /// Issuer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Unique token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Expiration instant, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued-at instant, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Not-before instant, epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl Claims {
    /// Build claims for `consumer`, valid from now for `validity`.
    ///
    /// Stamps a fresh v4 token id, sets `iat` and `nbf` to the current
    /// instant and `exp` to the current instant plus `validity`.
    #[must_use]
    pub fn new(consumer: Consumer, issuer: impl Into<String>, validity: Duration) -> Self {
        let now = Utc::now();
        Self {
            consumer,
            iss: Some(issuer.into()),
            jti: Some(Uuid::new_v4().to_string()),
            exp: Some((now + validity).timestamp()),
            iat: Some(now.timestamp()),
            nbf: Some(now.timestamp()),
        }
    }

    /// The expiration instant, when set.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// The issued-at instant, when set.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// The not-before instant, when set.
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.nbf.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_registered_claims() {
        let claims = Claims::new(Consumer::default(), "identity-service", Duration::minutes(60));

        assert_eq!(claims.iss.as_deref(), Some("identity-service"));
        assert!(claims.jti.is_some());
        assert_eq!(claims.exp.unwrap() - claims.iat.unwrap(), 3600);
        assert_eq!(claims.iat, claims.nbf);
    }

    #[test]
    fn fresh_token_ids_are_unique() {
        let a = Claims::new(Consumer::default(), "svc", Duration::minutes(1));
        let b = Claims::new(Consumer::default(), "svc", Duration::minutes(1));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn wire_shape_matches_convention() {
        let claims = Claims::new(Consumer::default(), "svc", Duration::minutes(5));
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&claims).unwrap()).unwrap();

        assert!(value.get("consumer").is_some_and(serde_json::Value::is_object));
        assert!(value.get("iss").is_some());
        assert!(value.get("jti").is_some());
        assert!(value.get("exp").is_some_and(serde_json::Value::is_i64));
        assert!(value.get("iat").is_some());
        assert!(value.get("nbf").is_some());
    }

    #[test]
    fn unset_fields_are_omitted() {
        let claims = Claims {
            consumer: Consumer::default(),
            iss: None,
            jti: None,
            exp: None,
            iat: None,
            nbf: None,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("exp"));
        assert!(!json.contains("iss"));
    }

    #[test]
    fn instant_accessors() {
        let claims = Claims::new(Consumer::default(), "svc", Duration::minutes(10));
        let expires = claims.expires_at().unwrap();
        let issued = claims.issued_at().unwrap();
        assert_eq!((expires - issued).num_seconds(), 600);
        assert_eq!(claims.not_before(), claims.issued_at());
    }
}
