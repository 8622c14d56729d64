use axum::{extract::State, Form};
use serde::Serialize;

use crate::app::AppState;
use crate::database::User;
use crate::handlers::forms::LoginForm;
use crate::middleware::{ApiResponse, ApiResult};

/// A freshly issued bearer token and the account it belongs to.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// POST /login - exchange email and password for a bearer token
pub async fn login_post(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Session> {
    let (email, password) = form.into_credentials()?;
    let (token, user) = state.users.login(&email, &password).await?;
    Ok(ApiResponse::success(Session { token, user }))
}
