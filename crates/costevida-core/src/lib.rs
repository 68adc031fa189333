//! Coste de Vida Digital core library
//!
//! Shared functionality for the subscription spend tracker:
//! - Domain models (subscriptions, payments, profile)
//! - Cost normalization and dashboard aggregation
//! - SQLite persistence with connection pooling and encryption at rest

pub mod db;
pub mod error;
pub mod models;
pub mod normalize;

pub use db::{AuditEntry, Database, SubscriptionFilter};
pub use error::{Error, Result};
pub use models::{
    BillingCycle, BreakdownEntry, Kpis, PaymentInput, Profile, ProfileUpdate, Subscription,
    SubscriptionInput, SubscriptionPayment, SubscriptionStatus,
};
pub use normalize::{calculate_kpis, category_breakdown, monthly_equivalent, vendor_breakdown};
