//! Daily habit tracking database operations

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::models::{DoneDelta, TrackingItem};
use super::super::Database;

fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<TrackingItem> {
    Ok(TrackingItem {
        name: row.get(0)?,
        time: row.get(1)?,
        amount: row.get(2)?,
        done: row.get(3)?,
        content: row.get(4)?,
    })
}

fn item_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<TrackingItem>> {
    conn.query_row(
        "SELECT name, time, amount, done, content FROM tracking WHERE name = ?1",
        [name],
        row_to_item,
    )
    .optional()
}

/// Zero `done` and stamp `today` on every item whose day is not `today`
fn reset_stale(conn: &Connection, today: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE tracking SET done = 0, time = ?1 WHERE time IS NOT ?1",
        [today],
    )
}

impl Database {
    /// Returns how many items were reset; a second run on the same day resets nothing
    pub fn reset_stale_tracking(&self, today: &str) -> ApiResult<usize> {
        let conn = self.conn()?;
        Ok(reset_stale(&conn, today)?)
    }

    /// Reset stale counters, then list every item by name
    pub fn list_tracking(&self, today: &str) -> ApiResult<Vec<TrackingItem>> {
        self.write(|tx| {
            let reset = reset_stale(tx, today)?;
            if reset > 0 {
                log::debug!("[TRACKING] Reset {} stale items for {}", reset, today);
            }
            let mut stmt = tx.prepare(
                "SELECT name, time, amount, done, content FROM tracking ORDER BY name",
            )?;
            let items = stmt
                .query_map([], row_to_item)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    pub fn add_tracking_item(
        &self,
        name: &str,
        amount: i64,
        content: &str,
        today: &str,
    ) -> ApiResult<TrackingItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Field `name` must not be empty".to_string()));
        }
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO tracking (name, time, amount, done, content) VALUES (?1, ?2, ?3, 0, ?4)",
            rusqlite::params![name, today, amount, content],
        )?;
        if inserted == 0 {
            return Err(ApiError::invalid(format!("Tracking item '{}' already exists", name)));
        }
        Ok(TrackingItem {
            name: name.to_string(),
            time: today.to_string(),
            amount,
            done: 0,
            content: content.to_string(),
        })
    }

    /// Apply one check/uncheck; the counter never drops below zero
    pub fn update_tracking_done(&self, name: &str, delta: DoneDelta) -> ApiResult<TrackingItem> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE tracking SET done = MAX(done + ?1, 0) WHERE name = ?2",
            rusqlite::params![delta.as_i64(), name],
        )?;
        if updated == 0 {
            return Err(ApiError::not_found("Tracking item"));
        }
        item_by_name(&conn, name)?.ok_or_else(|| ApiError::not_found("Tracking item"))
    }

    /// Absent items are a no-op (returns false)
    pub fn delete_tracking_item(&self, name: &str) -> ApiResult<bool> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM tracking WHERE name = ?1", [name])? > 0)
    }
}
