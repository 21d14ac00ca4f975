use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::dispatch::Dispatcher;
use crate::domain::skill::Skill;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::state::AppState;

use super::malformed_payload;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/skills", get(query_skills))
}

#[derive(Deserialize)]
struct SkillsQuery {
    query: String,
    #[serde(default, rename = "filterSkills")]
    filter_skills: Option<String>,
}

/// Skill autocomplete against the standardized taxonomy. Queries are
/// lowercased; already-selected skills are passed along so the backend can
/// exclude them.
async fn query_skills(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Query(params): Query<SkillsQuery>,
) -> Result<Json<Vec<Skill>>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let mut url = format!(
        "{}/querySkills?query={}",
        state.xano.skills_url,
        urlencoding::encode(&params.query.to_lowercase())
    );
    if let Some(filter) = params.filter_skills.as_deref().filter(|f| !f.is_empty()) {
        url.push_str(&format!("&filterSkills={}", urlencoding::encode(filter)));
    }
    let skills: Vec<Skill> = serde_json::from_value(dispatcher.get_json(&url).await?)
        .map_err(|e| malformed_payload("skills", e))?;
    Ok(Json(skills))
}
