use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{CredentialError, CredentialProtector, TokenService};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::Persistence;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::UserService;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Persistence>) -> Result<Self, CredentialError> {
        let tokens = TokenService::new(config.security.app_name.clone(), config.security.jwt_secret.as_bytes());
        let users = UserService::new(store, CredentialProtector::new()?, tokens.clone(), &config.security);
        Ok(Self { config: Arc::new(config), users: Arc::new(users), tokens: Arc::new(tokens) })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.security)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health_get))
        .route("/signup", post(public::signup_post))
        .route("/login", post(public::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(protected::collection_get)
                .post(protected::collection_post)
                .put(protected::collection_put)
                .delete(protected::collection_delete),
        )
        .route("/me", get(protected::me_get).put(protected::me_put).delete(protected::me_delete))
        .route(
            "/:id",
            get(protected::record_get).put(protected::record_put).delete(protected::record_delete),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Permissive unless origins are configured.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
