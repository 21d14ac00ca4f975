use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::dispatch::Dispatcher;
use crate::domain::job::Job;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::state::AppState;

use super::malformed_payload;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{job_id}", get(get_job).patch(update_job))
}

#[derive(Deserialize)]
struct JobsQuery {
    company_id: Option<i64>,
}

async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = match query.company_id {
        Some(company_id) => format!("{}/jobs?company_id={company_id}", state.xano.core_url),
        None => format!("{}/jobs", state.xano.core_url),
    };
    let jobs: Vec<Job> = serde_json::from_value(dispatcher.get_json(&url).await?)
        .map_err(|e| malformed_payload("jobs", e))?;
    Ok(Json(jobs))
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Path(job_id): Path<i64>,
) -> Result<Json<Job>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/jobs/{job_id}", state.xano.core_url);
    let job: Job = serde_json::from_value(dispatcher.get_json(&url).await?)
        .map_err(|e| malformed_payload("job", e))?;
    Ok(Json(job))
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/jobs", state.xano.core_url);
    Ok(Json(dispatcher.post_json(&url, &body).await?))
}

async fn update_job(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Path(job_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/jobs/{job_id}", state.xano.core_url);
    Ok(Json(dispatcher.patch_json(&url, &body).await?))
}
