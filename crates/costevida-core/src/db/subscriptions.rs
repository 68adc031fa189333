//! Subscription operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_datetime, Database, SubscriptionFilter};
use crate::error::Result;
use crate::models::{BillingCycle, Subscription, SubscriptionInput, SubscriptionStatus};

/// Columns selected for every subscription query, in row-mapping order
const SUBSCRIPTION_COLUMNS: &str = "id, tool_name, vendor, category, plan_name, status, billing, \
     amount, currency, start_date, next_billing_date, canceled_at, notes, tags, \
     created_at, updated_at";

/// Map a row selected with [`SUBSCRIPTION_COLUMNS`] into a Subscription
fn map_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let status_str: String = row.get(5)?;
    let billing_str: String = row.get(6)?;
    let start_date_str: Option<String> = row.get(9)?;
    let next_billing_str: Option<String> = row.get(10)?;
    let canceled_at_str: Option<String> = row.get(11)?;
    let tags_json: String = row.get(13)?;
    let created_at_str: String = row.get(14)?;
    let updated_at_str: String = row.get(15)?;

    Ok(Subscription {
        id: row.get(0)?,
        tool_name: row.get(1)?,
        vendor: row.get(2)?,
        category: row.get(3)?,
        plan_name: row.get(4)?,
        status: SubscriptionStatus::from_db(&status_str),
        billing: BillingCycle::from_db(&billing_str),
        amount: row.get(7)?,
        currency: row.get(8)?,
        start_date: start_date_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        next_billing_date: next_billing_str
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        canceled_at: canceled_at_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        notes: row.get(12)?,
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

impl Database {
    /// Insert a subscription and return the stored row
    pub fn create_subscription(&self, input: &SubscriptionInput) -> Result<Subscription> {
        input.validate()?;

        let conn = self.conn()?;
        let tags_json = serde_json::to_string(&input.tags)?;

        conn.execute(
            r#"
            INSERT INTO subscriptions
                (tool_name, vendor, category, plan_name, status, billing,
                 amount, currency, start_date, next_billing_date, canceled_at, notes, tags)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                    CASE WHEN ? = 'canceled' THEN date('now') ELSE NULL END, ?, ?)
            "#,
            params![
                input.tool_name.trim(),
                input.vendor,
                input.category,
                input.plan_name,
                input.status.as_str(),
                input.billing.as_str(),
                input.amount,
                input.currency,
                input.start_date.map(|d| d.to_string()),
                input.next_billing_date.map(|d| d.to_string()),
                input.status.as_str(),
                input.notes,
                tags_json,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        // The stored row carries database-assigned timestamps
        self.get_subscription(id)?
            .ok_or_else(|| crate::error::Error::NotFound(format!("Subscription {}", id)))
    }

    /// List subscriptions matching the filter, newest first
    pub fn list_subscriptions(&self, filter: SubscriptionFilter<'_>) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let result = filter.build();

        let query = format!(
            "SELECT {} FROM subscriptions {} ORDER BY created_at DESC, id DESC",
            SUBSCRIPTION_COLUMNS, result.where_clause
        );

        let mut stmt = conn.prepare(&query)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            result.params.iter().map(|p| p.as_ref()).collect();

        let subscriptions = stmt
            .query_map(params_refs.as_slice(), map_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    /// Get a subscription by ID
    pub fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        let conn = self.conn()?;

        let query = format!(
            "SELECT {} FROM subscriptions WHERE id = ?",
            SUBSCRIPTION_COLUMNS
        );
        let result = conn.query_row(&query, params![id], map_subscription);

        match result {
            Ok(sub) => Ok(Some(sub)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a subscription's fields from an input payload
    ///
    /// Returns the updated row, or `None` if the id does not exist.
    /// `canceled_at` is stamped when the update moves the row into
    /// `canceled` and cleared when it moves out of it.
    pub fn update_subscription(
        &self,
        id: i64,
        input: &SubscriptionInput,
    ) -> Result<Option<Subscription>> {
        input.validate()?;

        let conn = self.conn()?;
        let tags_json = serde_json::to_string(&input.tags)?;

        let changed = conn.execute(
            r#"
            UPDATE subscriptions SET
                tool_name = ?,
                vendor = ?,
                category = ?,
                plan_name = ?,
                status = ?,
                billing = ?,
                amount = ?,
                currency = ?,
                start_date = ?,
                next_billing_date = ?,
                canceled_at = CASE
                    WHEN ? = 'canceled' THEN COALESCE(canceled_at, date('now'))
                    ELSE NULL
                END,
                notes = ?,
                tags = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                input.tool_name.trim(),
                input.vendor,
                input.category,
                input.plan_name,
                input.status.as_str(),
                input.billing.as_str(),
                input.amount,
                input.currency,
                input.start_date.map(|d| d.to_string()),
                input.next_billing_date.map(|d| d.to_string()),
                input.status.as_str(),
                input.notes,
                tags_json,
                id,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        drop(conn);

        self.get_subscription(id)
    }

    /// Change a subscription's status (cancel/pause/resume)
    ///
    /// Moving into `canceled` stamps `canceled_at` with today's date;
    /// moving out of it clears the stamp.
    pub fn set_subscription_status(&self, id: i64, status: SubscriptionStatus) -> Result<bool> {
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE subscriptions SET
                status = ?,
                canceled_at = CASE
                    WHEN ? = 'canceled' THEN COALESCE(canceled_at, date('now'))
                    ELSE NULL
                END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![status.as_str(), status.as_str(), id],
        )?;

        Ok(changed > 0)
    }

    /// Delete a subscription by ID, along with its payment history
    ///
    /// Payments are removed explicitly rather than relying on the cascade,
    /// since `foreign_keys` is a per-connection pragma. Returns `false` if
    /// the id does not exist.
    pub fn delete_subscription(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;

        conn.execute(
            "DELETE FROM subscription_payments WHERE subscription_id = ?",
            params![id],
        )?;
        let changed = conn.execute("DELETE FROM subscriptions WHERE id = ?", params![id])?;

        Ok(changed > 0)
    }

    /// Total and active subscription counts (for the status command)
    pub fn count_subscriptions(&self) -> Result<(i64, i64)> {
        let conn = self.conn()?;

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| {
            row.get(0)
        })?;
        let active: i64 = conn.query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE status = 'active'",
            [],
            |row| row.get(0),
        )?;

        Ok((total, active))
    }
}
