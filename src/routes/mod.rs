use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};

use crate::error::ApiError;
use crate::middleware::auth::session_middleware;
use crate::state::AppState;

mod auth;
mod candidates;
mod company;
mod jobs;
mod skills;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let guarded = Router::new()
        .merge(auth::guarded_router())
        .merge(jobs::router())
        .merge(company::router())
        .merge(candidates::router())
        .merge(skills::router())
        .layer(from_fn_with_state(state, session_middleware));

    Router::new().merge(auth::router()).merge(guarded)
}

/// A 2xx answer whose body does not match the documented shape is a
/// backend contract violation, not a client mistake.
pub(crate) fn malformed_payload(what: &str, err: serde_json::Error) -> ApiError {
    ApiError::Backend {
        status: 502,
        message: format!("malformed {what} payload: {err}"),
    }
}
