use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

static JSON_NULL: Value = Value::Null;

/// A single untrusted field from the billing backend.
///
/// Keeps "key missing" apart from "explicit null": `creditsRemaining: null`
/// means unlimited, while a missing key means nothing at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawField {
    #[default]
    Absent,
    Null,
    Present(Value),
}

impl RawField {
    /// The JSON value if the key was sent at all (an explicit null included)
    pub fn get(&self) -> Option<&Value> {
        match self {
            RawField::Absent => None,
            RawField::Null => Some(&JSON_NULL),
            RawField::Present(v) => Some(v),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawField::Null)
    }

    /// Strictly `true`; truthy strings or numbers do not count
    pub fn is_true(&self) -> bool {
        matches!(self, RawField::Present(Value::Bool(true)))
    }

    /// Strictly `false`; absence does not count
    pub fn is_false(&self) -> bool {
        matches!(self, RawField::Present(Value::Bool(false)))
    }

    /// Look up `key` inside an object-valued field (e.g. `searches.cap`)
    pub fn nested(&self, key: &str) -> Option<&Value> {
        match self {
            RawField::Present(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawField::Present(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<Value> for RawField {
    fn from(value: Value) -> Self {
        if value.is_null() {
            RawField::Null
        } else {
            RawField::Present(value)
        }
    }
}

impl<'de> Deserialize<'de> for RawField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the key exists; missing keys go through `Default`
        Value::deserialize(deserializer).map(RawField::from)
    }
}

/// Billing snapshot as returned by `GET /account/summary/{userId}`.
///
/// Several fields have historical aliases; the normalizer decides which one wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAccountSnapshot {
    pub status: RawField,
    pub unlimited: RawField,
    pub is_admin: RawField,

    // Remaining quota
    pub credits_remaining: RawField,
    pub remaining_credits: RawField,
    pub remaining: RawField,

    // Quota ceiling
    pub search_cap: RawField,
    pub cap: RawField,

    // Nested counter blocks: { cap, remaining, used }
    pub searches: RawField,
    pub quota: RawField,

    pub used: RawField,

    pub renewal_date: RawField,
    pub cancel_at_period_end: RawField,
    pub price: RawField,

    pub free_try_used: RawField,
    #[serde(rename = "has_claimed_free_try")]
    pub has_claimed_free_try: RawField,
}

impl RawAccountSnapshot {
    /// Build a snapshot from arbitrary JSON. Anything that is not an object
    /// becomes the all-absent snapshot.
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Parse a response body, treating invalid JSON as an empty object
    pub fn from_slice(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(Self::from_value)
            .unwrap_or_default()
    }

    /// Snapshot used when no account can be looked up: a free user with a full allowance
    pub fn anonymous(free_cap: u32) -> Self {
        Self {
            status: RawField::Present(Value::from("none")),
            credits_remaining: RawField::Present(Value::from(free_cap)),
            ..Default::default()
        }
    }
}

/// Active Stripe price attached to the subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Minor units (pence for GBP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// "month" or "year"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

impl Price {
    /// Lenient extraction. The amount must be a whole JSON number
    /// (`999` or `999.0`); strings and fractions are dropped.
    pub fn from_field(field: &RawField) -> Option<Self> {
        let RawField::Present(Value::Object(map)) = field else {
            return None;
        };

        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_owned);

        Some(Self {
            amount: map.get("amount").and_then(whole_amount),
            currency: text("currency"),
            interval: text("interval"),
        })
    }
}

fn whole_amount(value: &Value) -> Option<i64> {
    if let Some(amount) = value.as_i64() {
        return Some(amount);
    }

    let amount = value.as_f64()?;
    let in_range = amount >= i64::MIN as f64 && amount < i64::MAX as f64;
    (amount.fract() == 0.0 && in_range).then_some(amount as i64)
}

/// Fully resolved account view handed to the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccountSummary {
    pub pro: bool,
    pub unlimited: bool,
    pub is_admin: bool,
    pub cap: u32,
    pub used: u32,
    /// `None` exactly when `unlimited`
    pub remaining: Option<u32>,
    pub renewal_date: Option<String>,
    pub cancel_at_period_end: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_code: Option<String>,
    pub plan_label: String,
}
