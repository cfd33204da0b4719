//! Reconciles a raw billing snapshot into a [`NormalizedAccountSummary`].
//!
//! The billing backend has renamed its counter fields more than once, so
//! each concept (cap, remaining, used) is read through an ordered list of
//! accessors. The first accessor yielding a finite number wins.

use serde_json::Value;
use tracing::debug;

use crate::{
    config::QuotaConfig,
    models::account::{NormalizedAccountSummary, Price, RawAccountSnapshot},
    services::plan_catalog::PlanCatalog,
    utils::num,
};

/// Subscription states that count as a paid plan. `unpaid` stays in: the
/// subscription still exists while Stripe retries the payment.
pub const PAID_STATUSES: [&str; 4] = ["active", "trialing", "past_due", "unpaid"];

type Accessor = for<'a> fn(&'a RawAccountSnapshot) -> Option<&'a Value>;

fn search_cap(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.search_cap.get()
}

fn cap(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.cap.get()
}

fn searches_cap(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.searches.nested("cap")
}

fn quota_cap(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.quota.nested("cap")
}

fn credits_remaining(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.credits_remaining.get()
}

fn remaining_credits(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.remaining_credits.get()
}

fn remaining(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.remaining.get()
}

fn searches_remaining(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.searches.nested("remaining")
}

fn quota_remaining(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.quota.nested("remaining")
}

fn used(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.used.get()
}

fn searches_used(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.searches.nested("used")
}

fn quota_used(raw: &RawAccountSnapshot) -> Option<&Value> {
    raw.quota.nested("used")
}

/// Quota ceiling, newest field name first
const CAP_CHAIN: &[Accessor] = &[search_cap, cap, searches_cap, quota_cap];

const REMAINING_CHAIN: &[Accessor] = &[
    credits_remaining,
    remaining_credits,
    remaining,
    searches_remaining,
    quota_remaining,
];

const USED_CHAIN: &[Accessor] = &[used, searches_used, quota_used];

fn first_finite(raw: &RawAccountSnapshot, chain: &[Accessor]) -> Option<f64> {
    chain.iter().find_map(|accessor| num(accessor(raw)))
}

fn any_present(raw: &RawAccountSnapshot, chain: &[Accessor]) -> bool {
    chain.iter().any(|accessor| accessor(raw).is_some())
}

/// Clamp to a non-negative whole count, saturating at `u32::MAX`
fn to_count(value: f64) -> u32 {
    value.max(0.0).trunc() as u32
}

/// Brand-new free accounts sometimes come back with no counters at all
/// instead of zeros. Only an explicit "free try not used" flag together
/// with a complete absence of counters qualifies.
fn is_fresh_free_user(raw: &RawAccountSnapshot, unlimited: bool, pro: bool) -> bool {
    if unlimited || pro {
        return false;
    }

    let free_try_unused = raw.free_try_used.is_false() || raw.has_claimed_free_try.is_false();

    free_try_unused && !any_present(raw, REMAINING_CHAIN) && !any_present(raw, USED_CHAIN)
}

pub struct SummaryNormalizer {
    quota: QuotaConfig,
    catalog: PlanCatalog,
}

impl SummaryNormalizer {
    pub fn new(quota: &QuotaConfig, catalog: PlanCatalog) -> Self {
        Self {
            quota: quota.clone(),
            catalog,
        }
    }

    /// Resolve every field of the summary. Never fails: anything malformed
    /// degrades to the free-tier defaults.
    pub fn normalize(&self, raw: &RawAccountSnapshot) -> NormalizedAccountSummary {
        // 1. Admin / unlimited. Only a literal null on creditsRemaining means unlimited.
        let is_admin = raw.is_admin.is_true();
        let unlimited = is_admin || raw.unlimited.is_true() || raw.credits_remaining.is_null();

        // 2. Paid lifecycle
        let status = raw
            .status
            .as_str()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "none".to_string());
        let pro = PAID_STATUSES.contains(&status.as_str());

        // 3. Plan tier from the active price
        let price = Price::from_field(&raw.price);
        let plan = self.catalog.infer(price.as_ref());

        // 4. Cap: explicit fields, then the plan, then the generic tier default.
        // Bounded before derivation so used + remaining still adds up to cap.
        let cap = first_finite(raw, CAP_CHAIN).unwrap_or_else(|| {
            let fallback = match &plan {
                Some(plan) => plan.cap,
                None if pro => self.quota.pro_cap,
                None => self.quota.free_cap,
            };
            f64::from(fallback)
        });
        let cap = f64::from(to_count(cap));

        // 5-6. Counters as sent
        let mut remaining = first_finite(raw, REMAINING_CHAIN);
        let mut used = first_finite(raw, USED_CHAIN);

        // 7. Derive whichever counter is missing from the other one
        match (used, remaining) {
            (None, Some(left)) => used = Some((cap - left).max(0.0)),
            (Some(spent), None) => remaining = Some((cap - spent).max(0.0)),
            _ => {}
        }

        // 8.
        if is_fresh_free_user(raw, unlimited, pro) {
            debug!("No counters for fresh free account, using full free allowance");
            used = Some(0.0);
            remaining = Some(f64::from(self.quota.free_cap));
        }

        // 9. Clamp
        let used = to_count(used.unwrap_or(0.0));
        let remaining = if unlimited {
            None
        } else {
            Some(to_count(remaining.unwrap_or(cap)))
        };

        // 10. Labels
        let plan_label = match &plan {
            Some(plan) => plan.label.clone(),
            None if pro => "Pro".to_string(),
            None => "Free".to_string(),
        };

        NormalizedAccountSummary {
            pro,
            unlimited,
            is_admin,
            cap: to_count(cap),
            used,
            remaining,
            renewal_date: raw.renewal_date.as_str().map(str::to_owned),
            cancel_at_period_end: raw.cancel_at_period_end.is_true(),
            price,
            status: raw.status.as_str().map(str::to_owned),
            plan_code: plan.map(|plan| plan.code),
            plan_label,
        }
    }

    /// Summary for visitors without a resolvable account
    pub fn anonymous(&self) -> NormalizedAccountSummary {
        self.normalize(&RawAccountSnapshot::anonymous(self.quota.free_cap))
    }
}

impl Default for SummaryNormalizer {
    fn default() -> Self {
        Self::new(&QuotaConfig::default(), PlanCatalog::default())
    }
}
