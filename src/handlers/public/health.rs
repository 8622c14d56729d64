use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /health - liveness plus a storage round trip
pub async fn health_get(State(state): State<AppState>) -> ApiResult<Value> {
    state.users.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database temporarily unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "name": state.config.security.app_name,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
