use axum::{
    extract::{Query, State},
    Form,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::User;
use crate::filter::{FilterData, FilterSet, FindQuery};
use crate::handlers::forms::{AccountForm, UpdateForm};
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - list accounts matching the filter, order and page parameters
pub async fn collection_get(State(state): State<AppState>, Query(data): Query<FilterData>) -> ApiResult<Vec<User>> {
    let query = FindQuery::from_data(&data)?;
    let users = state.users.find(&query.filter, &query.order, &query.page).await?;
    Ok(ApiResponse::success(users))
}

/// POST / - create an account on behalf of an authenticated caller
pub async fn collection_post(State(state): State<AppState>, Form(form): Form<AccountForm>) -> ApiResult<User> {
    let user = state.users.create(form.into_account()?).await?;
    Ok(ApiResponse::created(user))
}

/// PUT / - apply the form's fields to every account matching the filter
pub async fn collection_put(
    State(state): State<AppState>,
    Query(data): Query<FilterData>,
    Form(form): Form<UpdateForm>,
) -> ApiResult<Value> {
    let filter = FilterSet::from_data(&data)?;
    let updates = form.into_updates()?;
    let updated = state.users.update_many(&updates, &filter).await?;
    Ok(ApiResponse::success(json!({ "updated": updated })))
}

/// DELETE / - soft-delete every account matching the filter
pub async fn collection_delete(State(state): State<AppState>, Query(data): Query<FilterData>) -> ApiResult<Value> {
    let filter = FilterSet::from_data(&data)?;
    let deleted = state.users.delete_many(&filter).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}
