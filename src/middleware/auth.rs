use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated account extracted from a bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: u64,
}

/// Validates the bearer token and injects [`AuthUser`] into the request.
/// Every failure produces the same 401 body.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_jwt_from_headers(&headers) else {
        debug!("Rejected request without a bearer token");
        return Err(ApiError::unauthorized("Unauthorized"));
    };

    let id = state.tokens.validate(token).map_err(|_| ApiError::unauthorized("Unauthorized"))?;

    request.extensions_mut().insert(AuthUser { id });
    Ok(next.run(request).await)
}

/// The scheme name is case-insensitive; the token itself is untouched.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth_str.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
