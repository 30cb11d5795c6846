//! File entry database operations (append-only)

use crate::error::{ApiError, ApiResult};
use crate::models::Entry;
use super::super::Database;
use super::files::file_by_id;

impl Database {
    /// Entries of a file ordered by (order, id)
    pub fn list_entries(&self, file_id: i64) -> ApiResult<Vec<Entry>> {
        let conn = self.conn()?;
        if file_by_id(&conn, file_id)?.is_none() {
            return Err(ApiError::not_found("File"));
        }
        let mut stmt = conn.prepare(
            "SELECT id, file_id, text, date, done, \"order\"
             FROM file_entries WHERE file_id = ?1
             ORDER BY \"order\", id",
        )?;
        let entries = stmt
            .query_map([file_id], |row| {
                Ok(Entry {
                    id: row.get(0)?,
                    file_id: row.get(1)?,
                    text: row.get(2)?,
                    date: row.get(3)?,
                    done: row.get::<_, i32>(4)? != 0,
                    order: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Append an entry to a file
    pub fn add_entry(
        &self,
        file_id: i64,
        text: &str,
        date: Option<&str>,
        done: bool,
        order: i64,
    ) -> ApiResult<Entry> {
        let conn = self.conn()?;
        if file_by_id(&conn, file_id)?.is_none() {
            return Err(ApiError::not_found("File"));
        }
        conn.execute(
            "INSERT INTO file_entries (file_id, text, date, done, \"order\") VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![file_id, text, date, done, order],
        )?;

        Ok(Entry {
            id: conn.last_insert_rowid(),
            file_id,
            text: text.to_string(),
            date: date.map(|d| d.to_string()),
            done,
            order,
        })
    }
}
