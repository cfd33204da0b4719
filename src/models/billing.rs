use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::HistoryConfig;

/// POST /api/v1/billing/checkout
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 255))]
    pub price_id: String,

    #[validate(url)]
    pub success_url: Option<String>,

    #[validate(url)]
    pub cancel_url: Option<String>,
}

/// POST /api/v1/billing/portal
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PortalRequest {
    #[validate(url)]
    pub return_url: Option<String>,
}

/// Hosted Stripe page the browser should be redirected to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUrlResponse {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelSubscriptionResponse {
    pub cancel_at_period_end: bool,
    pub renewal_date: Option<String>,
}

/// One past company lookup. The upstream shape has drifted over time,
/// so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: Option<String>,
    pub job_url: Option<String>,
    pub company: Option<String>,
    pub searched_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHistoryResponse {
    pub items: Vec<SearchHistoryEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

impl HistoryQuery {
    /// Requested page size clamped to `[1, max_limit]`
    pub fn resolve_limit(&self, config: &HistoryConfig) -> u32 {
        self.limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1))
    }
}

// Bodies sent to the billing backend

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpstreamCheckoutRequest<'a> {
    pub user_id: &'a str,
    pub price_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpstreamPortalRequest<'a> {
    pub user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpstreamCancelRequest<'a> {
    pub user_id: &'a str,
}
