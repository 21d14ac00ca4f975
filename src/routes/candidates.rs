use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::dispatch::Dispatcher;
use crate::domain::candidate::{CandidateFilter, CandidateQueryParams};
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/candidates", get(list_candidates))
}

/// Candidate-pool browse. The UI's filter parameters are parsed into a
/// typed filter, then re-encoded canonically for the user API group;
/// malformed filters fail here instead of producing a confusing backend
/// error.
async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Query(params): Query<CandidateQueryParams>,
) -> Result<Json<Value>, ApiError> {
    let filter = CandidateFilter::from_params(params).map_err(ApiError::Validation)?;
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let query = filter.to_query_string();
    let url = if query.is_empty() {
        format!("{}/user", state.xano.user_url)
    } else {
        format!("{}/user?{query}", state.xano.user_url)
    };
    Ok(Json(dispatcher.get_json(&url).await?))
}
