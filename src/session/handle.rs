use std::fmt;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use super::AuthError;
use crate::infra::identity::{BackendFailure, IdentityApi, LoginGrant, TokenGrant};

/// Tokens and identity for one signed-in principal.
#[derive(Debug, Clone)]
pub struct Session {
    pub subject_id: i64,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch milliseconds after which `access_token` must not be used.
    /// Computed locally at issuance, never taken from client input.
    pub access_expires_at: i64,
    pub is_verified: bool,
}

impl Session {
    fn from_grant(grant: LoginGrant, issued_at_ms: i64) -> Self {
        Self {
            subject_id: grant.user.id,
            email: grant.user.email,
            access_token: grant.tokens.access_token,
            refresh_token: grant.tokens.refresh_token,
            access_expires_at: issued_at_ms + grant.tokens.expires_in * 1000,
            is_verified: grant.user.is_verified,
        }
    }
}

/// Read-only projection handed to the UI layer. Never carries tokens.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub subject_id: i64,
    pub email: String,
    pub is_verified: bool,
}

type RenewalFuture = Shared<BoxFuture<'static, Result<String, AuthError>>>;

struct Slot {
    session: Option<Session>,
    /// Terminal error recorded when renewal killed the session.
    last_error: Option<AuthError>,
    /// In-flight renewal, installed and cleared under the slot lock. Its
    /// presence is the guarded marker: a caller either installs the first
    /// attempt or joins the existing one, never starts a second exchange.
    renewal: Option<RenewalFuture>,
}

struct Inner {
    backend: Arc<dyn IdentityApi>,
    slot: Mutex<Slot>,
}

/// Cheap-to-clone handle to one principal's session. The inner state has a
/// single writer (this module); everything else reads through
/// `access_token()` / `view()`.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Exchanges credentials for a session. Unverified principals are
    /// rejected before any session exists.
    pub async fn authenticate(
        backend: Arc<dyn IdentityApi>,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".into(),
            ));
        }
        let grant = backend
            .login(email, password)
            .await
            .map_err(|failure| AuthError::AuthenticationFailed(failure.message))?;
        if !grant.user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }
        let session = Session::from_grant(grant, now_ms());
        Ok(Self {
            inner: Arc::new(Inner {
                backend,
                slot: Mutex::new(Slot {
                    session: Some(session),
                    last_error: None,
                    renewal: None,
                }),
            }),
        })
    }

    pub fn view(&self) -> Option<SessionView> {
        let slot = self.inner.slot.lock().unwrap();
        slot.session.as_ref().map(|s| SessionView {
            subject_id: s.subject_id,
            email: s.email.clone(),
            is_verified: s.is_verified,
        })
    }

    /// Returns a token fit for a bearer header. While the current token is
    /// time-valid this is a pure read; past expiry it joins (or starts) the
    /// single in-flight renewal and awaits its outcome.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let pending = {
            let mut slot = self.inner.slot.lock().unwrap();
            let Some(session) = slot.session.as_ref() else {
                return Err(slot.last_error.clone().unwrap_or(AuthError::NoSession));
            };
            if now_ms() < session.access_expires_at {
                return Ok(session.access_token.clone());
            }
            let refresh_token = session.refresh_token.clone();
            self.install_renewal(&mut slot, refresh_token)
        };
        pending.await
    }

    /// Forces a renewal even if the token still looks time-valid (the
    /// backend is the authority on validity). `seen_access_token` is the
    /// token the caller just had rejected: if it is already stale, a
    /// concurrent renewal won the race and the current token is returned
    /// without spending the refresh token again.
    pub async fn renew(&self, seen_access_token: &str) -> Result<String, AuthError> {
        let pending = {
            let mut slot = self.inner.slot.lock().unwrap();
            let Some(session) = slot.session.as_ref() else {
                return Err(slot.last_error.clone().unwrap_or(AuthError::NoSession));
            };
            if session.access_token != seen_access_token {
                return Ok(session.access_token.clone());
            }
            let refresh_token = session.refresh_token.clone();
            self.install_renewal(&mut slot, refresh_token)
        };
        pending.await
    }

    /// Clears the session locally, then asks the backend to invalidate the
    /// refresh token. The network call is best effort: an unreachable
    /// logout endpoint never resurrects the local session.
    pub async fn terminate(&self) {
        let refresh_token = {
            let mut slot = self.inner.slot.lock().unwrap();
            slot.renewal = None;
            slot.last_error = None;
            slot.session.take().map(|s| s.refresh_token)
        };
        if let Some(token) = refresh_token {
            if let Err(failure) = self.inner.backend.logout(&token).await {
                warn!(
                    "backend logout failed, session already cleared locally: {}",
                    failure.message
                );
            }
        }
    }

    /// Installs the renewal future if none is in flight, or hands back the
    /// existing one. The exchange runs in a spawned task that applies its
    /// own outcome, so a caller abandoning its request cannot strand the
    /// session mid-renewal.
    fn install_renewal(&self, slot: &mut Slot, refresh_token: String) -> RenewalFuture {
        if let Some(pending) = slot.renewal.clone() {
            return pending;
        }
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = inner.backend.refresh(&refresh_token).await;
            inner.apply_renewal(outcome)
        });
        let pending: RenewalFuture = async move {
            match task.await {
                Ok(result) => result,
                Err(_) => Err(AuthError::RefreshAccessToken),
            }
        }
        .boxed()
        .shared();
        slot.renewal = Some(pending.clone());
        pending
    }
}

impl Inner {
    /// Applies a renewal outcome under the slot lock: either the whole new
    /// pair replaces the old one, or the session terminates. Readers never
    /// observe a token from one pair with the expiry of another.
    fn apply_renewal(&self, outcome: Result<TokenGrant, BackendFailure>) -> Result<String, AuthError> {
        let mut slot = self.slot.lock().unwrap();
        slot.renewal = None;
        match outcome {
            Ok(grant) => match slot.session.as_mut() {
                Some(session) => {
                    session.access_token = grant.access_token;
                    session.refresh_token = grant.refresh_token;
                    session.access_expires_at = now_ms() + grant.expires_in * 1000;
                    Ok(session.access_token.clone())
                }
                // Terminated while the exchange was in flight.
                None => Err(slot.last_error.clone().unwrap_or(AuthError::NoSession)),
            },
            Err(failure) => {
                warn!(
                    "token renewal failed, terminating session: {}",
                    failure.message
                );
                slot.session = None;
                slot.last_error = Some(AuthError::RefreshAccessToken);
                Err(AuthError::RefreshAccessToken)
            }
        }
    }
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
