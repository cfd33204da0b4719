use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    error::Result,
    middleware::MaybeIdentity,
    models::{
        account::NormalizedAccountSummary,
        billing::{HistoryQuery, SearchHistoryResponse},
    },
    services::UserIdentity,
};

/// GET /api/v1/account/summary
///
/// Anonymous callers get the free-tier default instead of a 401.
#[instrument(skip(state, identity))]
pub async fn get_account_summary(
    State(state): State<AppState>,
    identity: MaybeIdentity,
) -> Json<NormalizedAccountSummary> {
    let summary = state
        .summary_service
        .fetch_account_summary(&identity.0)
        .await;

    Json(summary)
}

/// GET /api/v1/account/history
#[instrument(skip(state, identity, query))]
pub async fn get_search_history(
    State(state): State<AppState>,
    identity: UserIdentity,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<SearchHistoryResponse>> {
    let limit = query.resolve_limit(&state.config.history);

    let history = state.api_client.search_history(&identity, limit).await?;

    Ok(Json(history))
}
