// Service modules
pub mod account_api;
pub mod identity;
pub mod jwt_service;
pub mod plan_catalog;
pub mod summary_normalizer;
pub mod summary_service;

pub use account_api::AccountApiClient;
pub use identity::{IdentityProvider, UserIdentity};
pub use jwt_service::JWTService;
pub use plan_catalog::{PlanCatalog, PlanTier};
pub use summary_normalizer::SummaryNormalizer;
pub use summary_service::AccountSummaryService;
