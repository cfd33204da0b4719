use crate::{
    config::ApiConfig,
    error::{ApiError, Result},
    models::{
        account::RawAccountSnapshot,
        billing::{
            CancelSubscriptionResponse, CheckoutRequest, SearchHistoryResponse,
            SessionUrlResponse, UpstreamCancelRequest, UpstreamCheckoutRequest,
            UpstreamPortalRequest,
        },
    },
    services::identity::UserIdentity,
};
use reqwest::{header, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

/// Thin client for the remote account/billing API.
///
/// Every call forwards the caller's access token so the upstream session
/// check sees the same user as we do.
pub struct AccountApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl AccountApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(std::time::Duration::from_secs(10)) // 10s connection timeout
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, identity: &UserIdentity) -> RequestBuilder {
        request.bearer_auth(&identity.access_token)
    }

    /// GET /account/summary/{userId}?t={unix_ms}
    ///
    /// The timestamp busts intermediary caches and `no-store` keeps the
    /// response out of any local one. A 2xx body that is not a JSON object
    /// reads as an empty snapshot.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn fetch_raw_summary(&self, identity: &UserIdentity) -> Result<RawAccountSnapshot> {
        let cache_buster = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

        let request = self
            .http_client
            .get(self.url(&format!("/account/summary/{}", identity.user_id)))
            .query(&[("t", cache_buster.to_string())])
            .header(header::CACHE_CONTROL, "no-store")
            .header(header::PRAGMA, "no-cache");

        let response = self.authorized(request, identity).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "account summary request failed with {}",
                status
            )));
        }

        let body = response.bytes().await?;

        Ok(RawAccountSnapshot::from_slice(&body))
    }

    /// POST /billing/checkout
    #[instrument(skip(self, identity, request), fields(user_id = %identity.user_id))]
    pub async fn create_checkout_session(
        &self,
        identity: &UserIdentity,
        request: &CheckoutRequest,
    ) -> Result<SessionUrlResponse> {
        let body = UpstreamCheckoutRequest {
            user_id: &identity.user_id,
            price_id: &request.price_id,
            success_url: request.success_url.as_deref(),
            cancel_url: request.cancel_url.as_deref(),
        };

        let response = self
            .authorized(self.http_client.post(self.url("/billing/checkout")), identity)
            .json(&body)
            .send()
            .await?;

        let session: SessionUrlResponse = Self::parse(response, "checkout").await?;

        info!("Created checkout session for price {}", request.price_id);

        Ok(session)
    }

    /// POST /billing/portal
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn create_portal_session(
        &self,
        identity: &UserIdentity,
        return_url: Option<&str>,
    ) -> Result<SessionUrlResponse> {
        let body = UpstreamPortalRequest {
            user_id: &identity.user_id,
            return_url,
        };

        let response = self
            .authorized(self.http_client.post(self.url("/billing/portal")), identity)
            .json(&body)
            .send()
            .await?;

        Self::parse(response, "portal").await
    }

    /// POST /billing/cancel
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn cancel_subscription(
        &self,
        identity: &UserIdentity,
    ) -> Result<CancelSubscriptionResponse> {
        let body = UpstreamCancelRequest {
            user_id: &identity.user_id,
        };

        let response = self
            .authorized(self.http_client.post(self.url("/billing/cancel")), identity)
            .json(&body)
            .send()
            .await?;

        let cancelled: CancelSubscriptionResponse = Self::parse(response, "cancel").await?;

        info!(
            "Subscription cancellation requested (at period end: {})",
            cancelled.cancel_at_period_end
        );

        Ok(cancelled)
    }

    /// GET /account/history/{userId}?limit={n}
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn search_history(
        &self,
        identity: &UserIdentity,
        limit: u32,
    ) -> Result<SearchHistoryResponse> {
        let request = self
            .http_client
            .get(self.url(&format!("/account/history/{}", identity.user_id)))
            .query(&[("limit", limit.to_string())])
            .header(header::CACHE_CONTROL, "no-store");

        let response = self.authorized(request, identity).send().await?;

        Self::parse(response, "search history").await
    }

    async fn parse<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("No {} found for this account", operation)));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "{} request failed with {}: {}",
                operation, status, error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            ApiError::Upstream(format!("Failed to parse {} response: {}", operation, e))
        })
    }
}
