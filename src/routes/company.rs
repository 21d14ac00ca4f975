use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatch::Dispatcher;
use crate::domain::company::{Company, PaymentMethod, SocialMedia};
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::state::AppState;

use super::malformed_payload;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/company/{company_id}", get(get_company))
        .route("/company/details", patch(update_details))
        .route("/company/socials", patch(update_socials))
        .route(
            "/company/billing",
            post(initialize_billing).patch(update_billing),
        )
        .route("/profile", patch(update_profile))
}

async fn get_company(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Path(company_id): Path<i64>,
) -> Result<Json<Company>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/companies/{company_id}", state.xano.core_url);
    let company: Company = serde_json::from_value(dispatcher.get_json(&url).await?)
        .map_err(|e| malformed_payload("company", e))?;
    Ok(Json(company))
}

#[derive(Deserialize)]
struct UpdateCompanyDetails {
    company_id: i64,
    name: String,
    description: String,
    #[serde(default)]
    benefits: Vec<String>,
}

async fn update_details(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<UpdateCompanyDetails>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/companies/update/details", state.xano.core_url);
    let body = json!({
        "company_id": payload.company_id,
        "name": payload.name,
        "description": payload.description,
        "benefits": payload.benefits,
    });
    Ok(Json(dispatcher.patch_json(&url, &body).await?))
}

#[derive(Deserialize)]
struct UpdateCompanySocials {
    company_id: i64,
    #[serde(default)]
    socials: Vec<SocialMedia>,
}

async fn update_socials(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<UpdateCompanySocials>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/companies/update/socialMedia", state.xano.core_url);
    let body = json!({
        "company_id": payload.company_id,
        "socials": payload.socials,
    });
    Ok(Json(dispatcher.patch_json(&url, &body).await?))
}

#[derive(Deserialize)]
struct InitializeBilling {
    company_id: i64,
}

async fn initialize_billing(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<InitializeBilling>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/companies/initializeBillingDetails", state.xano.core_url);
    let body = json!({ "company_id": payload.company_id });
    Ok(Json(dispatcher.post_json(&url, &body).await?))
}

#[derive(Deserialize)]
struct UpdateBillingDetails {
    company_id: i64,
    billing_email: String,
    billing_address: String,
    contact_person: String,
    tax_id: String,
    payment_method: PaymentMethod,
}

async fn update_billing(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<UpdateBillingDetails>,
) -> Result<Json<Value>, ApiError> {
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/companies/update/billingDetails", state.xano.core_url);
    let body = json!({
        "company_id": payload.company_id,
        "billing_email": payload.billing_email,
        "billing_address": payload.billing_address,
        "contact_person": payload.contact_person,
        "tax_id": payload.tax_id,
        "payment_method": payload.payment_method,
    });
    Ok(Json(dispatcher.patch_json(&url, &body).await?))
}

#[derive(Deserialize)]
struct UpdateProfile {
    first_name: String,
    last_name: String,
    email: String,
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<UpdateProfile>,
) -> Result<Json<Value>, ApiError> {
    if payload.first_name.trim().is_empty()
        || payload.last_name.trim().is_empty()
        || payload.email.trim().is_empty()
    {
        return Err(ApiError::Validation("Missing required fields".into()));
    }
    let dispatcher = Dispatcher::new(state.xano.http.clone(), session);
    let url = format!("{}/user/updateInfo", state.xano.core_url);
    let body = json!({
        "first_name": payload.first_name,
        "last_name": payload.last_name,
        "email": payload.email,
    });
    Ok(Json(dispatcher.patch_json(&url, &body).await?))
}
