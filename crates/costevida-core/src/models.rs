//! Domain models for Coste de Vida Digital

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Label used when a subscription has no category
pub const UNCATEGORIZED_LABEL: &str = "Sin Categoría";

/// Billing cycle of a subscription's charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
    Weekly,
    /// One-off purchase; excluded from recurring cost totals
    OneTime,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Weekly => "weekly",
            Self::OneTime => "one_time",
        }
    }

    /// Lenient decode used at the storage boundary.
    ///
    /// Unrecognized values fall back to `Monthly`, which leaves the amount
    /// untouched during normalization. Strict validation of user input
    /// happens at the API boundary (serde), not here.
    pub fn from_db(s: &str) -> Self {
        match s {
            "yearly" => Self::Yearly,
            "weekly" => Self::Weekly,
            "one_time" => Self::OneTime,
            _ => Self::Monthly,
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "weekly" => Ok(Self::Weekly),
            "one_time" | "onetime" => Ok(Self::OneTime),
            _ => Err(format!("Unknown billing cycle: {}", s)),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Canceled,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Paused => "paused",
        }
    }

    /// Lenient decode used at the storage boundary.
    ///
    /// A CHECK constraint on the column keeps unknown values out of rows
    /// written by this code; anything else decodes as `Active`.
    pub fn from_db(s: &str) -> Self {
        match s {
            "canceled" => Self::Canceled,
            "paused" => Self::Paused,
            _ => Self::Active,
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "paused" => Ok(Self::Paused),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    /// Name of the tool or service (e.g. "Notion", "ChatGPT Plus")
    pub tool_name: String,
    /// Vendor/provider (e.g. "OpenAI"); falls back to tool_name for grouping
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub plan_name: Option<String>,
    pub status: SubscriptionStatus,
    pub billing: BillingCycle,
    /// Charge amount per billing cycle, in `currency`
    pub amount: f64,
    /// Currency code as entered. Amounts are never converted between
    /// currencies; aggregates sum raw numeric values.
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub next_billing_date: Option<NaiveDate>,
    pub canceled_at: Option<NaiveDate>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Create/update payload for a subscription
///
/// Field set and defaults mirror the web form: name and amount are required,
/// everything else is optional with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub tool_name: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub billing: BillingCycle,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_billing_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SubscriptionInput {
    /// Validate the payload before it reaches the database
    pub fn validate(&self) -> Result<()> {
        if self.tool_name.trim().is_empty() {
            return Err(Error::InvalidData("tool_name must not be empty".into()));
        }
        if !self.amount.is_finite() {
            return Err(Error::InvalidData("amount must be a finite number".into()));
        }
        if self.amount < 0.0 {
            return Err(Error::InvalidData("amount must be >= 0".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::InvalidData("currency must not be empty".into()));
        }
        Ok(())
    }
}

/// A recorded payment against a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPayment {
    pub id: i64,
    pub subscription_id: i64,
    pub amount: f64,
    pub currency: String,
    pub paid_at: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub paid_at: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentInput {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidData("amount must be >= 0".into()));
        }
        Ok(())
    }
}

/// User profile settings (single row in the local database)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: Option<String>,
    pub preferred_currency: String,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile update payload
///
/// `preferred_currency` is required: a body that omits it is rejected at
/// deserialization rather than silently resetting the stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    pub preferred_currency: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Portfolio-level summary numbers shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of monthly-equivalent cost over active subscriptions
    pub monthly_total: f64,
    /// Always `monthly_total * 12`
    pub yearly_total: f64,
    /// Number of active subscriptions
    pub active_count: usize,
}

/// One slice of a grouped spend breakdown (chart datum)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    /// Summed monthly-equivalent cost, unrounded
    pub value: f64,
}
