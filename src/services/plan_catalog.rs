use crate::{
    config::{default_plans, PlanConfig},
    models::account::Price,
};

/// Plan tier inferred from the subscribed price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTier {
    pub code: String,
    pub label: String,
    pub cap: u32,
}

/// Lookup table from (currency, minor-unit amount) to plan tier.
///
/// Matching is an exact integer comparison on the amount and a
/// case-insensitive comparison on the currency. Nothing else is inferred:
/// legacy or unknown prices simply do not match.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<PlanConfig>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<PlanConfig>) -> Self {
        Self { plans }
    }

    pub fn infer(&self, price: Option<&Price>) -> Option<PlanTier> {
        let price = price?;
        let amount = price.amount?;
        let currency = price.currency.as_deref()?;

        self.plans
            .iter()
            .find(|plan| plan.amount == amount && plan.currency.eq_ignore_ascii_case(currency))
            .map(|plan| PlanTier {
                code: plan.code.clone(),
                label: plan.label.clone(),
                cap: plan.cap,
            })
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new(default_plans())
    }
}
