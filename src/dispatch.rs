use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::infra::identity::backend_message;
use crate::session::SessionHandle;

/// Dispatch-level failures. Auth problems collapse to `Unauthenticated`
/// once the one-shot recovery is spent; everything else keeps its status
/// and best-effort message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
}

/// Attaches the session's bearer credential to every outbound backend call
/// and recovers exactly once from a rejected credential.
pub struct Dispatcher {
    http: Client,
    session: SessionHandle,
}

impl Dispatcher {
    pub fn new(http: Client, session: SessionHandle) -> Self {
        Self { http, session }
    }

    pub async fn get_json(&self, url: &str) -> Result<Value, DispatchError> {
        self.send(Method::GET, url, None).await
    }

    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value, DispatchError> {
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn patch_json(&self, url: &str, body: &Value) -> Result<Value, DispatchError> {
        self.send(Method::PATCH, url, Some(body)).await
    }

    /// Issues the request with a valid token. A 401 answer forces one
    /// renewal (the backend outranks our clock on token validity) and one
    /// retry; a second 401 is terminal. Retry state lives here in the call
    /// stack, so concurrent requests cannot contaminate each other.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, DispatchError> {
        let mut token = self
            .session
            .access_token()
            .await
            .map_err(|_| DispatchError::Unauthenticated)?;
        let mut retried = false;
        loop {
            let mut req = self.http.request(method.clone(), url).bearer_auth(&token);
            if let Some(body) = body {
                req = req.json(body);
            }
            let resp = req
                .send()
                .await
                .map_err(|e| DispatchError::Transport(e.to_string()))?;
            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED {
                if retried {
                    return Err(DispatchError::Unauthenticated);
                }
                retried = true;
                token = self
                    .session
                    .renew(&token)
                    .await
                    .map_err(|_| DispatchError::Unauthenticated)?;
                continue;
            }
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(DispatchError::Backend {
                    status: status.as_u16(),
                    message: backend_message(status.as_u16(), &text),
                });
            }

            let text = resp
                .text()
                .await
                .map_err(|e| DispatchError::Transport(e.to_string()))?;
            if text.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| DispatchError::Transport(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::identity::{
        BackendFailure, IdentityApi, LoginGrant, PrincipalRecord, TokenGrant,
    };
    use async_trait::async_trait;
    use axum::{
        extract::State,
        http::HeaderMap,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct RotatingIdentity {
        refresh_calls: AtomicUsize,
        token_seq: AtomicUsize,
    }

    impl RotatingIdentity {
        fn new() -> Self {
            Self {
                refresh_calls: AtomicUsize::new(0),
                token_seq: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityApi for RotatingIdentity {
        async fn login(&self, _: &str, _: &str) -> Result<LoginGrant, BackendFailure> {
            Ok(LoginGrant {
                tokens: TokenGrant {
                    access_token: "access-0".into(),
                    refresh_token: "refresh-0".into(),
                    expires_in: 3600,
                },
                user: PrincipalRecord {
                    id: 9,
                    email: "e@example.com".into(),
                    is_verified: true,
                },
            })
        }

        async fn refresh(&self, _: &str) -> Result<TokenGrant, BackendFailure> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            let n = self.token_seq.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(TokenGrant {
                access_token: format!("access-{n}"),
                refresh_token: format!("refresh-{n}"),
                expires_in: 3600,
            })
        }

        async fn logout(&self, _: &str) -> Result<(), BackendFailure> {
            Ok(())
        }
    }

    /// Scripted resource server: accepts only the bearer tokens in
    /// `allowed`, counts every hit.
    struct Gate {
        allowed: Mutex<HashSet<String>>,
        hits: AtomicUsize,
    }

    async fn guarded(State(gate): State<Arc<Gate>>, headers: HeaderMap) -> impl IntoResponse {
        gate.hits.fetch_add(1, Ordering::SeqCst);
        let bearer = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .unwrap_or_default()
            .to_string();
        if gate.allowed.lock().unwrap().contains(&bearer) {
            (
                axum::http::StatusCode::OK,
                Json(json!({ "data": "payload" })),
            )
        } else {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Unauthorized" } })),
            )
        }
    }

    async fn broken(State(gate): State<Arc<Gate>>) -> impl IntoResponse {
        gate.hits.fetch_add(1, Ordering::SeqCst);
        (
            axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Invalid filter" })),
        )
    }

    async fn spawn_resource_server(allowed: &[&str]) -> (Arc<Gate>, String) {
        let gate = Arc::new(Gate {
            allowed: Mutex::new(allowed.iter().map(|s| s.to_string()).collect()),
            hits: AtomicUsize::new(0),
        });
        let router = Router::new()
            .route("/data", get(guarded))
            .route("/broken", get(broken))
            .with_state(gate.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        (gate, format!("http://{addr}"))
    }

    async fn dispatcher(backend: Arc<RotatingIdentity>) -> Dispatcher {
        let session = SessionHandle::authenticate(backend, "e@example.com", "pw")
            .await
            .expect("login");
        Dispatcher::new(Client::new(), session)
    }

    #[tokio::test]
    async fn accepted_token_passes_straight_through() {
        let backend = Arc::new(RotatingIdentity::new());
        let (gate, base) = spawn_resource_server(&["access-0"]).await;
        let dispatcher = dispatcher(backend.clone()).await;

        let data = dispatcher
            .get_json(&format!("{base}/data"))
            .await
            .expect("request should succeed");
        assert_eq!(data["data"], "payload");
        assert_eq!(gate.hits.load(Ordering::SeqCst), 1);
        assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_rejection_is_recovered_by_a_forced_renewal() {
        let backend = Arc::new(RotatingIdentity::new());
        // the backend no longer honors access-0 even though it looks
        // time-valid locally; only the rotated token works
        let (gate, base) = spawn_resource_server(&["access-1"]).await;
        let dispatcher = dispatcher(backend.clone()).await;

        let data = dispatcher
            .get_json(&format!("{base}/data"))
            .await
            .expect("retry should succeed");
        assert_eq!(data["data"], "payload");
        assert_eq!(gate.hits.load(Ordering::SeqCst), 2);
        assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn two_rejections_are_terminal_with_no_third_attempt() {
        let backend = Arc::new(RotatingIdentity::new());
        let (gate, base) = spawn_resource_server(&[]).await;
        let dispatcher = dispatcher(backend.clone()).await;

        let err = dispatcher
            .get_json(&format!("{base}/data"))
            .await
            .expect_err("must give up");
        assert!(matches!(err, DispatchError::Unauthenticated));
        assert_eq!(gate.hits.load(Ordering::SeqCst), 2);
        assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_auth_failures_are_classified_and_never_retried() {
        let backend = Arc::new(RotatingIdentity::new());
        let (gate, base) = spawn_resource_server(&["access-0"]).await;
        let dispatcher = dispatcher(backend.clone()).await;

        let err = dispatcher
            .get_json(&format!("{base}/broken"))
            .await
            .expect_err("validation failure");
        match err {
            DispatchError::Backend { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Invalid filter");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(gate.hits.load(Ordering::SeqCst), 1);
        assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
    }
}
