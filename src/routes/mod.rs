// Route modules
pub mod account;
pub mod billing;

use crate::{
    app_state::AppState,
    config::ServerConfig,
    middleware::{jwt_auth_middleware, logging_middleware, optional_jwt_auth_middleware},
    models::common::HealthResponse,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_v1_routes(state.clone()))
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// API v1 routes
fn api_v1_routes(state: AppState) -> Router<AppState> {
    // Routes that require a signed-in user
    let auth_routes = Router::new()
        .route("/account/history", get(account::get_search_history))
        .route("/billing/checkout", post(billing::create_checkout))
        .route("/billing/portal", post(billing::create_portal))
        .route("/billing/cancel", post(billing::cancel_subscription))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    // Anonymous visitors get the free-tier summary
    let open_routes = Router::new()
        .route("/account/summary", get(account::get_account_summary))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_jwt_auth_middleware,
        ));

    Router::new()
        .merge(auth_routes)
        .merge(open_routes)
        .layer(middleware::from_fn(logging_middleware))
}

/// The web app sends the session token cross-origin, so only listed origins are allowed
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
