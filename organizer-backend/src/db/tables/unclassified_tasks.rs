//! Unclassified task backlog. Rows have no stable id and are addressed by
//! their (content, order) pair.

use rusqlite::types::Null;

use crate::error::{ApiError, ApiResult};
use crate::models::UnclassifiedTask;
use crate::ordering::{self, Backlog, BacklogOrder};
use super::super::Database;

impl Database {
    pub fn list_unclassified_tasks(&self) -> ApiResult<Vec<UnclassifiedTask>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT \"order\", content FROM unclassified_tasks ORDER BY \"order\", rowid",
        )?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(UnclassifiedTask {
                    order: row.get(0)?,
                    content: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Append to the end of the backlog
    pub fn add_unclassified_task(&self, content: &str) -> ApiResult<UnclassifiedTask> {
        if content.trim().is_empty() {
            return Err(ApiError::Validation("Field `content` must not be empty".to_string()));
        }
        let order = self.write(|tx| {
            let order = ordering::next_position::<Backlog>(tx, &Null)?;
            tx.execute(
                "INSERT INTO unclassified_tasks (\"order\", content) VALUES (?1, ?2)",
                rusqlite::params![order, content],
            )?;
            Ok(order)
        })?;
        Ok(UnclassifiedTask {
            order,
            content: content.to_string(),
        })
    }

    /// Replace the backlog with `contents`, top to bottom
    pub fn reorder_unclassified_tasks(&self, contents: &[String]) -> ApiResult<Vec<UnclassifiedTask>> {
        self.write(|tx| {
            tx.execute("DELETE FROM unclassified_tasks", [])?;
            let mut stmt =
                tx.prepare("INSERT INTO unclassified_tasks (\"order\", content) VALUES (?1, ?2)")?;
            for (position, content) in contents.iter().enumerate() {
                stmt.execute(rusqlite::params![position as i64, content])?;
            }
            Ok(())
        })?;
        self.list_unclassified_tasks()
    }

    /// Delete one row matching (content, order) and close the gap.
    /// Returns false when nothing matched.
    pub fn delete_unclassified_task(&self, content: &str, order: BacklogOrder) -> ApiResult<bool> {
        self.write(|tx| {
            let removed = tx.execute(
                "DELETE FROM unclassified_tasks WHERE rowid = (
                     SELECT rowid FROM unclassified_tasks
                     WHERE content = ?1 AND \"order\" = ?2
                     ORDER BY rowid LIMIT 1
                 )",
                rusqlite::params![content, order],
            )?;
            if removed > 0 {
                ordering::renumber::<Backlog>(tx, &Null)?;
            }
            Ok(removed > 0)
        })
    }
}
