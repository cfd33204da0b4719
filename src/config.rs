use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default = "default_plans")]
    pub plans: Vec<PlanConfig>,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// Remote account/billing API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String, // Shared with the identity provider (HS256)
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    // Searches per billing cycle when nothing more specific is known
    pub free_cap: u32,
    pub pro_cap: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_cap: 3,
            pro_cap: 25,
        }
    }
}

/// One row of the price -> plan tier table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanConfig {
    pub currency: String,
    pub amount: i64, // Minor units
    pub code: String,
    pub label: String,
    pub cap: u32,
}

impl PlanConfig {
    fn gbp(amount: i64, code: &str, label: &str, cap: u32) -> Self {
        Self {
            currency: "gbp".to_string(),
            amount,
            code: code.to_string(),
            label: label.to_string(),
            cap,
        }
    }
}

/// Current GBP price list
pub fn default_plans() -> Vec<PlanConfig> {
    vec![
        PlanConfig::gbp(999, "platinum", "Platinum", 20),
        PlanConfig::gbp(2999, "silver", "Silver", 60),
        PlanConfig::gbp(9900, "gold", "Gold", 200),
        PlanConfig::gbp(29900, "business", "Business", 1000),
        PlanConfig::gbp(500, "retention", "Retention", 10),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for environment variable overrides)
        dotenvy::dotenv().ok();

        // config.yml is required; CREWDOG__SECTION__KEY variables override it
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(
                config::Environment::with_prefix("CREWDOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
