//! Token introspection response (RFC 7662).

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result of asking an authorization server about a bearer token.
///
/// Every field is optional: authorization servers are free to omit claims,
/// and an inactive token usually carries nothing but `"active": false`.
/// Claims not modelled here are kept verbatim in [`extra`](Self::extra).
///
/// # Example
///
/// ```
/// use introspection_core::TokenIntrospection;
///
/// let body = r#"{"active": true, "sub": "user-42", "exp": 1700000000, "aud": "recipes"}"#;
/// let parsed: TokenIntrospection = serde_json::from_str(body).unwrap();
///
/// assert!(parsed.is_active());
/// assert_eq!(parsed.subject(), Some("user-42"));
/// assert_eq!(parsed.aud, Some(vec!["recipes".to_string()]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenIntrospection {
    /// Whether the token is currently active. `None` means the server did not say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Client identifier for which the token was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Human-readable identifier of the resource owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Space-delimited list of scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Token type, usually `Bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Expiration time, unix epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued-at time, unix epoch seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Subject identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Intended audiences. Accepts a single string or an array on input.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub aud: Option<Vec<String>>,

    /// Issuer identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Provider specific user identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Granted scopes as an array (some providers send this instead of `scope`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,

    /// Any other claim returned by the server.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenIntrospection {
    /// An active result for the given subject, without expiration.
    pub fn active_for(subject: impl Into<String>) -> Self {
        Self {
            active: Some(true),
            sub: Some(subject.into()),
            ..Self::default()
        }
    }

    /// An inactive result (revoked, expired or unknown token).
    pub fn inactive() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }

    /// Sets the `exp` claim.
    pub fn with_exp(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Sets the space-delimited `scope` claim.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Returns true only when the server explicitly reported `"active": true`.
    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }

    /// Returns the `exp` claim.
    pub fn expires_at(&self) -> Option<i64> {
        self.exp
    }

    /// Returns the `sub` claim.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Union of `scope` and `scopes`.
    pub fn scope_set(&self) -> BTreeSet<&str> {
        let mut set: BTreeSet<&str> = self
            .scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default();

        if let Some(scopes) = &self.scopes {
            set.extend(scopes.iter().map(String::as_str));
        }
        set
    }

    /// Returns true if the token carries the given scope.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope_set().contains(scope)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_active_is_not_active() {
        let parsed: TokenIntrospection = serde_json::from_str(r#"{"sub": "u1"}"#).unwrap();

        assert_eq!(parsed.active, None);
        assert!(!parsed.is_active());
    }

    #[test]
    fn test_audience_array() {
        let parsed: TokenIntrospection =
            serde_json::from_str(r#"{"active": true, "aud": ["a", "b"]}"#).unwrap();

        assert_eq!(parsed.aud, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_extra_claims_are_preserved() {
        let body = r#"{"active": true, "tenant": "acme", "roles": ["admin"]}"#;
        let parsed: TokenIntrospection = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.extra.get("tenant"), Some(&Value::from("acme")));

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["roles"][0], "admin");
        assert!(json.get("sub").is_none());
    }

    #[test]
    fn test_scope_set_merges_both_forms() {
        let mut value = TokenIntrospection::active_for("u1").with_scope("recipes:read  profile");
        value.scopes = Some(vec!["recipes:write".to_string(), "profile".to_string()]);

        let scopes: Vec<&str> = value.scope_set().into_iter().collect();
        assert_eq!(scopes, vec!["profile", "recipes:read", "recipes:write"]);
        assert!(value.has_scope("recipes:write"));
        assert!(!value.has_scope("admin"));
    }

    #[test]
    fn test_builders() {
        let active = TokenIntrospection::active_for("chef").with_exp(42);
        assert!(active.is_active());
        assert_eq!(active.subject(), Some("chef"));
        assert_eq!(active.expires_at(), Some(42));

        let inactive = TokenIntrospection::inactive();
        assert_eq!(inactive.active, Some(false));
        assert!(inactive.subject().is_none());
    }
}
