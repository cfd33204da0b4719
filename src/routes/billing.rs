use axum::{extract::State, Json};
use tracing::instrument;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::{ApiError, Result},
    models::billing::{
        CancelSubscriptionResponse, CheckoutRequest, PortalRequest, SessionUrlResponse,
    },
    services::UserIdentity,
};

/// POST /api/v1/billing/checkout
#[instrument(skip(state, identity, request))]
pub async fn create_checkout(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<SessionUrlResponse>> {
    // Validate request
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let session = state
        .api_client
        .create_checkout_session(&identity, &request)
        .await?;

    Ok(Json(session))
}

/// POST /api/v1/billing/portal
#[instrument(skip(state, identity, request))]
pub async fn create_portal(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<PortalRequest>,
) -> Result<Json<SessionUrlResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(format!("Validation error: {}", e)))?;

    let session = state
        .api_client
        .create_portal_session(&identity, request.return_url.as_deref())
        .await?;

    Ok(Json(session))
}

/// POST /api/v1/billing/cancel
#[instrument(skip(state, identity))]
pub async fn cancel_subscription(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> Result<Json<CancelSubscriptionResponse>> {
    let cancelled = state.api_client.cancel_subscription(&identity).await?;

    Ok(Json(cancelled))
}
