//! Payment history operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{PaymentInput, SubscriptionPayment};

impl Database {
    /// Record a payment against a subscription
    ///
    /// Fails with `NotFound` if the subscription does not exist.
    pub fn record_payment(
        &self,
        subscription_id: i64,
        input: &PaymentInput,
    ) -> Result<SubscriptionPayment> {
        input.validate()?;

        self.get_subscription(subscription_id)?
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", subscription_id)))?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO subscription_payments (subscription_id, amount, currency, paid_at, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                subscription_id,
                input.amount,
                input.currency,
                input.paid_at.to_string(),
                input.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        let payment = conn.query_row(
            r#"
            SELECT id, subscription_id, amount, currency, paid_at, notes, created_at
            FROM subscription_payments
            WHERE id = ?
            "#,
            params![id],
            map_payment,
        )?;

        Ok(payment)
    }

    /// List payments for a subscription, most recent first
    pub fn list_payments(&self, subscription_id: i64) -> Result<Vec<SubscriptionPayment>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, subscription_id, amount, currency, paid_at, notes, created_at
            FROM subscription_payments
            WHERE subscription_id = ?
            ORDER BY paid_at DESC, id DESC
            "#,
        )?;

        let payments = stmt
            .query_map(params![subscription_id], map_payment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(payments)
    }
}

fn map_payment(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubscriptionPayment> {
    let paid_at_str: String = row.get(4)?;
    let created_at_str: String = row.get(6)?;

    Ok(SubscriptionPayment {
        id: row.get(0)?,
        subscription_id: row.get(1)?,
        amount: row.get(2)?,
        currency: row.get(3)?,
        paid_at: NaiveDate::parse_from_str(&paid_at_str, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Utc::now().date_naive()),
        notes: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}
