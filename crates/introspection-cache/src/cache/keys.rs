//! Cache key for bearer tokens.

use std::borrow::Borrow;
use std::fmt;

/// Key unica del cache: el valor del bearer token.
///
/// `Debug` and `Display` never print the token itself, so a key can be logged
/// freely. Only the first characters and the length are shown.
///
/// # Examples
///
/// ```
/// use introspection_cache::cache::TokenKey;
///
/// let key = TokenKey::new("eyJhbGciOiJSUzI1NiJ9.payload.signature");
/// assert_eq!(key.to_string(), "eyJhbG…(38)");
/// assert_eq!(key.as_str().len(), 38);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenKey(String);

impl TokenKey {
    /// Crea una nueva key a partir del token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Retorna el token original.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TokenKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenKey {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for TokenKey {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Redacted(&self.0).fmt(f)
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenKey({})", Redacted(&self.0))
    }
}

/// Displays a token without leaking it.
pub(crate) struct Redacted<'a>(pub(crate) &'a str);

/// Tokens shorter than this are fully masked.
const MIN_VISIBLE_LEN: usize = 12;
const VISIBLE_PREFIX: usize = 6;

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.chars().count();
        if len < MIN_VISIBLE_LEN {
            return write!(f, "***({})", len);
        }

        let prefix: String = self.0.chars().take(VISIBLE_PREFIX).collect();
        write!(f, "{}…({})", prefix, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_is_redacted() {
        let key = TokenKey::new("abcdefghijklmnopqrstuvwxyz");

        assert_eq!(key.to_string(), "abcdef…(26)");
        assert_eq!(format!("{:?}", key), "TokenKey(abcdef…(26))");
        assert!(!format!("{:?}", key).contains("ghij"));
    }

    #[test]
    fn test_short_tokens_are_masked() {
        let key = TokenKey::new("tok-A");
        assert_eq!(key.to_string(), "***(5)");
    }

    #[test]
    fn test_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(TokenKey::new("opaque-token-value"));

        // La key debe encontrarse usando solo &str
        assert!(set.contains("opaque-token-value"));
        assert!(!set.contains("other-token"));
    }

    #[test]
    fn test_multibyte_prefix() {
        let key = TokenKey::new("ñandú-token-ñandú-token");
        assert_eq!(key.to_string(), "ñandú-…(23)");
    }
}
