//! User profile operations
//!
//! The profile is a single row (id = 1), seeded by the migrations.

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Profile, ProfileUpdate};

impl Database {
    /// Get the profile settings
    pub fn get_profile(&self) -> Result<Profile> {
        let conn = self.conn()?;

        let profile = conn.query_row(
            r#"
            SELECT full_name, preferred_currency, timezone, created_at, updated_at
            FROM profile
            WHERE id = 1
            "#,
            [],
            |row| {
                let created_at_str: String = row.get(3)?;
                let updated_at_str: String = row.get(4)?;
                Ok(Profile {
                    full_name: row.get(0)?,
                    preferred_currency: row.get(1)?,
                    timezone: row.get(2)?,
                    created_at: parse_datetime(&created_at_str),
                    updated_at: parse_datetime(&updated_at_str),
                })
            },
        )?;

        Ok(profile)
    }

    /// Update the profile settings and return the stored row
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            UPDATE profile SET
                full_name = ?,
                preferred_currency = ?,
                timezone = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = 1
            "#,
            params![
                update.full_name,
                update.preferred_currency,
                update.timezone
            ],
        )?;
        drop(conn);

        self.get_profile()
    }
}
