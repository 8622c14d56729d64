use axum::{extract::State, Form};

use super::login::Session;
use crate::app::AppState;
use crate::handlers::forms::AccountForm;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /signup - create an account and sign it in
pub async fn signup_post(State(state): State<AppState>, Form(form): Form<AccountForm>) -> ApiResult<Session> {
    let account = form.into_account()?;
    let (token, user) = state.users.signup(account).await?;
    Ok(ApiResponse::created(Session { token, user }))
}
