use crate::{
    models::account::NormalizedAccountSummary,
    services::{
        account_api::AccountApiClient, identity::IdentityProvider,
        summary_normalizer::SummaryNormalizer,
    },
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Fetches the caller's billing snapshot and normalizes it.
///
/// Billing outages must not break the front-end, so every failure path ends
/// in the anonymous free-tier summary instead of an error.
pub struct AccountSummaryService {
    api: Arc<AccountApiClient>,
    normalizer: SummaryNormalizer,
}

impl AccountSummaryService {
    pub fn new(api: Arc<AccountApiClient>, normalizer: SummaryNormalizer) -> Self {
        Self { api, normalizer }
    }

    pub fn normalizer(&self) -> &SummaryNormalizer {
        &self.normalizer
    }

    #[instrument(skip_all)]
    pub async fn fetch_account_summary<I>(&self, identity: &I) -> NormalizedAccountSummary
    where
        I: IdentityProvider + Sync,
    {
        let Some(identity) = identity.current_identity().await else {
            debug!("No identity, returning anonymous summary");
            return self.normalizer.anonymous();
        };

        match self.api.fetch_raw_summary(&identity).await {
            Ok(raw) => self.normalizer.normalize(&raw),
            Err(e) => {
                warn!(
                    user_id = %identity.user_id,
                    "Account summary unavailable, falling back to free tier: {}",
                    e
                );
                self.normalizer.anonymous()
            }
        }
    }
}
