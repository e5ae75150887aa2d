//! Bearer token handling.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims the client cares about. The signature is never checked here.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// An opaque bearer token as issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token, for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the payload when the token is a JWT.
    pub fn claims(&self) -> Option<TokenClaims> {
        let mut parts = self.0.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Expiry time, when the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims()
            .and_then(|c| c.exp)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the token is known to be expired at `now`. Tokens without a
    /// readable expiry are left for the backend to judge.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "BearerToken({prefix}…)")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn jwt_with_exp(exp: i64) -> BearerToken {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"user_id":1,"exp":{exp}}}"#));
        BearerToken::new(format!("{header}.{payload}.c2lnbmF0dXJl"))
    }

    #[test]
    fn test_jwt_expiry_decoded() {
        let token = jwt_with_exp(1_700_000_000);
        let exp = token.expires_at().expect("exp");
        assert_eq!(exp.timestamp(), 1_700_000_000);
        assert!(token.is_expired_at(exp));
        assert!(!token.is_expired_at(exp - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_opaque_token_has_no_claims() {
        let token = BearerToken::new("not-a-jwt");
        assert!(token.claims().is_none());
        assert!(!token.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_debug_redacts() {
        let token = BearerToken::new("abcdefghijklmnop");
        assert_eq!(format!("{token:?}"), "BearerToken(abcdef…)");
    }
}
