use axum::{extract::State, Extension, Form};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::User;
use crate::handlers::forms::UpdateForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /me - the account named by the bearer token
pub async fn me_get(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<User> {
    let user = state.users.find_one(auth.id).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /me
pub async fn me_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Form(form): Form<UpdateForm>,
) -> ApiResult<User> {
    let updates = form.into_updates()?;
    let user = state.users.find_one(auth.id).await?;
    let updated = state.users.update_one(&user, &updates).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /me - close the caller's own account. Outstanding tokens stop
/// resolving to an account immediately.
pub async fn me_delete(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> ApiResult<Value> {
    let user = state.users.find_one(auth.id).await?;
    state.users.delete_one(&user).await?;
    Ok(ApiResponse::success(json!({ "id": user.id })))
}
