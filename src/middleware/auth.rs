use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;

use crate::error::ApiError;
use crate::state::AppState;

/// Session id from the verified cookie, exposed to handlers that need to
/// drop the registry entry (logout).
#[derive(Clone)]
pub struct SessionId(pub String);

/// Resolves the signed session cookie to a live `SessionHandle` and makes
/// it available to handlers via request extensions, along with the
/// session id for registry removal. Anything short of a verified cookie
/// pointing at a registered session is a 401 with a login redirect hint.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookie_token(req.headers(), &state.security.session_cookie_name)
        .ok_or(ApiError::Unauthenticated)?;
    let claims = state
        .jwt
        .verify(&token)
        .map_err(|_| ApiError::Unauthenticated)?;
    let session = state
        .sessions
        .get(&claims.sid)
        .ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut().insert(SessionId(claims.sid));
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

fn cookie_token(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        if let Ok(parsed) = Cookie::parse(part.trim().to_string()) {
            if parsed.name() == name {
                return Some(parsed.value().to_string());
            }
        }
    }
    None
}
