//! The authenticated principal carried inside every token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal embedded in a token's claims.
///
/// A consumer is assembled by the issuing service before signing and is
/// reconstructed fresh on every successful parse; the verifier never mutates
/// it in place. The three attribute sets may be empty but always serialize
/// as arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    /// Numeric identifier.
    pub id: u64,
    /// Stable UUID identifier.
    #[serde(default)]
    pub uuid: Uuid,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Preferred locale, e.g. `en` or `nl`.
    #[serde(default)]
    pub language: String,
    /// Fine-grained permissions.
    #[serde(default)]
    pub grants: Vec<String>,
    /// Coarse permission groupings.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Required-action flags, e.g. a pending password reset.
    #[serde(default)]
    pub needs: Vec<String>,
}

impl Consumer {
    /// True when the consumer holds the given fine-grained permission.
    #[must_use]
    pub fn has_grant(&self, grant: &str) -> bool {
        self.grants.iter().any(|g| g == grant)
    }

    /// True when the consumer is a member of the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// True when the given required-action flag is set.
    #[must_use]
    pub fn has_need(&self, need: &str) -> bool {
        self.needs.iter().any(|n| n == need)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Consumer {
        Consumer {
            id: 42,
            uuid: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            language: "en".to_string(),
            grants: vec!["billing.read".to_string()],
            roles: vec!["admin".to_string()],
            needs: vec![],
        }
    }

    #[test]
    fn serde_roundtrip() {
        let consumer = sample();
        let json = serde_json::to_string(&consumer).unwrap();
        let parsed: Consumer = serde_json::from_str(&json).unwrap();
        assert_eq!(consumer, parsed);
    }

    #[test]
    fn empty_sets_serialize_as_arrays() {
        let json = serde_json::to_string(&Consumer::default()).unwrap();
        assert!(json.contains("\"grants\":[]"));
        assert!(json.contains("\"roles\":[]"));
        assert!(json.contains("\"needs\":[]"));
    }

    #[test]
    fn missing_sets_deserialize_empty() {
        let parsed: Consumer = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(parsed.id, 7);
        assert!(parsed.grants.is_empty());
        assert!(parsed.roles.is_empty());
        assert!(parsed.needs.is_empty());
    }

    #[test]
    fn attribute_predicates() {
        let consumer = sample();
        assert!(consumer.has_grant("billing.read"));
        assert!(!consumer.has_grant("billing.write"));
        assert!(consumer.has_role("admin"));
        assert!(!consumer.has_role("support"));
        assert!(!consumer.has_need("password_reset"));
    }
}
