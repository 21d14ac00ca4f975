use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

use super::identity::{backend_message, BackendFailure, IdentityApi, LoginGrant, TokenGrant};

/// Connection context for the Xano workspace. Each concern lives in its own
/// API group, so the base URLs are tracked separately.
#[derive(Clone)]
pub struct XanoCtx {
    /// Authentication group: login, refresh, logout, signup.
    pub auth_url: String,
    /// Primary REST group: jobs, companies, users, profile updates.
    pub core_url: String,
    /// User-records group: candidate pool queries, employer profile reads.
    pub user_url: String,
    /// Skills taxonomy group: skill autocomplete.
    pub skills_url: String,
    pub http: Client,
}

impl XanoCtx {
    pub fn from_env() -> anyhow::Result<Self> {
        let auth_url = first_env(&["XANO_AUTH_API_URL", "XANO_API_GROUP_BASE_URL"]).ok_or_else(
            || {
                anyhow::anyhow!(
                    "Xano auth API group URL missing (set XANO_AUTH_API_URL or XANO_API_GROUP_BASE_URL)"
                )
            },
        )?;
        let core_url = first_env(&["XANO_CORE_API_URL", "XANO_API_BASE_URL"]).ok_or_else(|| {
            anyhow::anyhow!("Xano core API URL missing (set XANO_CORE_API_URL or XANO_API_BASE_URL)")
        })?;
        let user_url = first_env(&["XANO_USER_API_URL"]).unwrap_or_else(|| {
            warn!("XANO_USER_API_URL not set; candidate queries will use the core API group");
            core_url.clone()
        });
        let skills_url = first_env(&["XANO_SKILLS_API_URL"]).unwrap_or_else(|| {
            warn!("XANO_SKILLS_API_URL not set; skill queries will use the core API group");
            core_url.clone()
        });

        let http = Client::builder()
            .user_agent("fount-employer-api")
            .build()?;

        Ok(Self {
            auth_url: trim_slash(auth_url),
            core_url: trim_slash(core_url),
            user_url: trim_slash(user_url),
            skills_url: trim_slash(skills_url),
            http,
        })
    }

    /// Unauthenticated GET, used by flows that run before a session exists
    /// (verification lookups).
    pub async fn public_get(&self, url: &str) -> Result<Value, BackendFailure> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(BackendFailure::transport)?;
        read_json(resp).await
    }

    pub async fn public_post(&self, url: &str, body: &Value) -> Result<Value, BackendFailure> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(BackendFailure::transport)?;
        read_json(resp).await
    }

    pub async fn public_patch(&self, url: &str, body: &Value) -> Result<Value, BackendFailure> {
        let resp = self
            .http
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(BackendFailure::transport)?;
        read_json(resp).await
    }
}

#[async_trait]
impl IdentityApi for XanoCtx {
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, BackendFailure> {
        let value = self
            .public_post(
                &format!("{}/auth/login", self.auth_url),
                &json!({ "email": email, "password": password }),
            )
            .await?;
        serde_json::from_value(value).map_err(|e| BackendFailure {
            status: None,
            message: format!("malformed login response: {e}"),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, BackendFailure> {
        let value = self
            .public_post(
                &format!("{}/auth/refresh", self.auth_url),
                &json!({ "refresh_token": refresh_token }),
            )
            .await?;
        serde_json::from_value(value).map_err(|e| BackendFailure {
            status: None,
            message: format!("malformed refresh response: {e}"),
        })
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), BackendFailure> {
        self.public_post(
            &format!("{}/auth/logout", self.auth_url),
            &json!({ "refresh_token": refresh_token }),
        )
        .await
        .map(|_| ())
    }
}

/// Turns a response into JSON, or into a `BackendFailure` with the best
/// message the error payload offers.
async fn read_json(resp: reqwest::Response) -> Result<Value, BackendFailure> {
    let status = resp.status();
    let body = resp.text().await.map_err(BackendFailure::transport)?;
    if !status.is_success() {
        return Err(BackendFailure {
            status: Some(status.as_u16()),
            message: backend_message(status.as_u16(), &body),
        });
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| BackendFailure {
        status: Some(status.as_u16()),
        message: format!("malformed response body: {e}"),
    })
}

fn first_env(keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(val) = std::env::var(key) {
            if !val.trim().is_empty() {
                return Some(val);
            }
        }
    }
    None
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
