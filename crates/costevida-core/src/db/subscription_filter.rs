//! Subscription filter builder for constructing dynamic SQL queries
//!
//! Builder for the WHERE clause shared by the list endpoint and the
//! dashboard query, so the two can't drift apart.

use crate::models::{BillingCycle, SubscriptionStatus};

/// Builder for subscription query filters
///
/// The lifetime `'query` represents how long the borrowed filter values
/// (category, vendor, search term) must remain valid.
#[derive(Default)]
pub struct SubscriptionFilter<'query> {
    pub status: Option<SubscriptionStatus>,
    pub billing: Option<BillingCycle>,
    pub category: Option<&'query str>,
    pub vendor: Option<&'query str>,
    pub search: Option<&'query str>,
}

/// Result of building a filter - SQL components and bound parameters
pub struct FilterResult {
    /// WHERE clause including the "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> SubscriptionFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status; `None` means all statuses
    pub fn status(mut self, status: Option<SubscriptionStatus>) -> Self {
        self.status = status;
        self
    }

    /// Filter by billing cycle
    pub fn billing(mut self, billing: Option<BillingCycle>) -> Self {
        self.billing = billing;
        self
    }

    /// Filter by category (substring match)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Filter by vendor (exact match)
    pub fn vendor(mut self, vendor: Option<&'query str>) -> Self {
        self.vendor = vendor;
        self
    }

    /// Search by tool name (substring match)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = self.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(billing) = self.billing {
            conditions.push("billing = ?");
            params.push(Box::new(billing.as_str()));
        }

        if let Some(category) = self.category {
            conditions.push("category LIKE ?");
            params.push(Box::new(format!("%{}%", category)));
        }

        if let Some(vendor) = self.vendor {
            conditions.push("vendor = ?");
            params.push(Box::new(vendor.to_string()));
        }

        if let Some(search) = self.search {
            conditions.push("tool_name LIKE ?");
            params.push(Box::new(format!("%{}%", search)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            params,
        }
    }
}
