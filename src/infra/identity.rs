use async_trait::async_trait;
use serde::Deserialize;

/// Token triple returned by the identity service on login and refresh.
/// `expires_in` is seconds of access-token validity from issuance.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalRecord {
    pub id: i64,
    pub email: String,
    pub is_verified: bool,
}

/// Successful credential exchange: a token pair plus the principal it
/// belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginGrant {
    #[serde(flatten)]
    pub tokens: TokenGrant,
    pub user: PrincipalRecord,
}

/// Backend-reported or transport-level failure, already reduced to the best
/// human-readable message available. `status` is absent for pure transport
/// failures.
#[derive(Debug, Clone)]
pub struct BackendFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl BackendFailure {
    pub fn transport(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// The identity service boundary. The production implementation talks to
/// the Xano auth API group; tests substitute an in-memory fake.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, BackendFailure>;

    /// Exchanges a refresh token for a fresh pair. Refresh tokens are
    /// single-use: the backend invalidates the presented token on success.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, BackendFailure>;

    async fn logout(&self, refresh_token: &str) -> Result<(), BackendFailure>;
}

/// Pulls the most useful message out of an error payload. Backends wrap
/// errors a few different ways; fall back to the canonical reason phrase,
/// then to a generic string.
pub fn backend_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidate = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("message").and_then(|v| v.as_str()))
            .or_else(|| value.get("error").and_then(|v| v.as_str()));
        if let Some(msg) = candidate {
            if !msg.trim().is_empty() {
                return msg.to_string();
            }
        }
    }
    match status {
        400 => "Bad Request".into(),
        401 => "Unauthorized".into(),
        403 => "Forbidden".into(),
        404 => "Not Found".into(),
        500 => "Internal Server Error".into(),
        _ => "An unexpected error occurred".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_prefers_nested_error_object() {
        let body = r#"{"error":{"message":"This account is unknown","status":401}}"#;
        assert_eq!(backend_message(401, body), "This account is unknown");
    }

    #[test]
    fn message_falls_back_to_flat_fields() {
        assert_eq!(
            backend_message(400, r#"{"message":"Missing param: email"}"#),
            "Missing param: email"
        );
        assert_eq!(
            backend_message(400, r#"{"error":"invalid filter"}"#),
            "invalid filter"
        );
    }

    #[test]
    fn message_falls_back_to_reason_phrase_for_junk_bodies() {
        assert_eq!(backend_message(404, "<html>nope</html>"), "Not Found");
        assert_eq!(backend_message(401, ""), "Unauthorized");
        assert_eq!(backend_message(418, "{}"), "An unexpected error occurred");
    }

    #[test]
    fn login_grant_parses_the_wire_shape() {
        let body = r#"{
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "expires_in": 3600,
            "user": {"id": 7, "email": "a@b.com", "is_verified": true}
        }"#;
        let grant: LoginGrant = serde_json::from_str(body).expect("grant should parse");
        assert_eq!(grant.tokens.access_token, "at-1");
        assert_eq!(grant.tokens.expires_in, 3600);
        assert_eq!(grant.user.id, 7);
        assert!(grant.user.is_verified);
    }
}
