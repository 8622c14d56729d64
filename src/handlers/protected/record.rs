use axum::{
    extract::{Path, State},
    Form,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::User;
use crate::handlers::forms::{parse_id, UpdateForm};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /:id
pub async fn record_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let user = state.users.find_one(parse_id(&id)?).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /:id - partial update; unsent fields keep their values
pub async fn record_put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<UpdateForm>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let updates = form.into_updates()?;
    let user = state.users.find_one(id).await?;
    let updated = state.users.update_one(&user, &updates).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /:id
pub async fn record_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let user = state.users.find_one(parse_id(&id)?).await?;
    state.users.delete_one(&user).await?;
    Ok(ApiResponse::success(json!({ "id": user.id })))
}
