use crate::{
    config::Config,
    services::{AccountApiClient, AccountSummaryService, JWTService, PlanCatalog, SummaryNormalizer},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api_client: Arc<AccountApiClient>,
    pub summary_service: Arc<AccountSummaryService>,
    pub jwt_service: Arc<JWTService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        // Initialize services
        let api_client = Arc::new(AccountApiClient::new(&config.api)?);
        let normalizer =
            SummaryNormalizer::new(&config.quota, PlanCatalog::new(config.plans.clone()));
        let summary_service = Arc::new(AccountSummaryService::new(api_client.clone(), normalizer));
        let jwt_service = Arc::new(JWTService::new(&config.auth));

        Ok(Self {
            api_client,
            summary_service,
            jwt_service,
            config: Arc::new(config),
        })
    }
}
