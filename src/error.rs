use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::infra::identity::BackendFailure;
use crate::session::AuthError;

/// Entry point the UI sends users to when a session is irrecoverable.
pub const LOGIN_PATH: &str = "/login";

/// Failure taxonomy for the whole route surface. Auth-specific kinds never
/// carry raw transport errors; the message is already human-readable by the
/// time it lands here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("email address is not verified yet")]
    EmailNotVerified,
    #[error("{0}")]
    AuthenticationFailed(String),
    #[error("session could not be renewed; sign in again")]
    RefreshAccessToken,
    #[error("not authenticated")]
    Unauthenticated,
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("rate_limited")]
    RateLimited,
    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailNotVerified => StatusCode::FORBIDDEN,
            ApiError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            ApiError::RefreshAccessToken => StatusCode::UNAUTHORIZED,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Terminal auth failures carry a redirect hint so the UI can route the
    /// user back to the login entry point instead of showing a dead error.
    fn forces_login(&self) -> bool {
        matches!(
            self,
            ApiError::RefreshAccessToken | ApiError::Unauthenticated
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        });
        if self.forces_login() {
            body["error"]["redirect"] = json!(LOGIN_PATH);
        }
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::Validation(msg),
            AuthError::EmailNotVerified => ApiError::EmailNotVerified,
            AuthError::AuthenticationFailed(detail) => ApiError::AuthenticationFailed(detail),
            AuthError::RefreshAccessToken => ApiError::RefreshAccessToken,
            AuthError::NoSession => ApiError::Unauthenticated,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Unauthenticated => ApiError::Unauthenticated,
            DispatchError::Backend { status, message } => ApiError::Backend { status, message },
            DispatchError::Transport(message) => ApiError::Backend {
                status: 500,
                message,
            },
        }
    }
}

impl From<BackendFailure> for ApiError {
    fn from(failure: BackendFailure) -> Self {
        ApiError::Backend {
            status: failure.status.unwrap_or(500),
            message: failure.message,
        }
    }
}
