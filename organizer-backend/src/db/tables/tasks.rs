//! Task board database operations

use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::models::{ReorderTasksRequest, Section, Task};
use crate::ordering::{self, TasksInSection};
use super::super::Database;
use super::files::{file_by_id, insert_file, purge_file};

const TASK_COLUMNS: &str = "id, file_id, topic_id, file_name, section, \"order\"";

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        file_id: row.get(1)?,
        topic_id: row.get(2)?,
        file_name: row.get(3)?,
        section: row.get(4)?,
        order: row.get(5)?,
    })
}

fn task_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
        [id],
        row_to_task,
    )
    .optional()
}

fn section_labels(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT section FROM tasks")?;
    let labels = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(labels)
}

impl Database {
    /// Every task ordered by (section label, order)
    pub fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks ORDER BY section, \"order\", id",
            TASK_COLUMNS
        ))?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Create a `tasks` file for the topic; its task is appended to the default bucket
    pub fn create_task(&self, topic_id: i64, name: &str) -> ApiResult<Task> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Task name must not be empty".to_string()));
        }
        self.write(|tx| {
            let created = insert_file(tx, topic_id, name, Section::Tasks)?;
            let task_id = created.task_id.ok_or_else(|| ApiError::not_found("Task"))?;
            task_by_id(tx, task_id)?.ok_or_else(|| ApiError::not_found("Task"))
        })
    }

    /// Apply a full board layout.
    ///
    /// Every listed task is moved to its label first; only then is each
    /// label sequenced. Listed ids take positions `0..k` of their label in
    /// the given order and the label's other tasks follow in their previous
    /// order. Unknown ids are ignored; an id listed under several labels ends
    /// up in the last one. Labels absent from the layout are renumbered.
    pub fn reorder_tasks(&self, layout: &ReorderTasksRequest) -> ApiResult<Vec<Task>> {
        self.write(|tx| {
            let mut placements: Vec<(&String, Vec<i64>)> = Vec::with_capacity(layout.sections.len());
            for (label, ids) in &layout.sections {
                let mut listed = Vec::with_capacity(ids.len());
                let mut seen = BTreeSet::new();
                for id in ids {
                    if !seen.insert(*id) {
                        continue;
                    }
                    let moved = tx.execute(
                        "UPDATE tasks SET section = ?1 WHERE id = ?2",
                        rusqlite::params![label, id],
                    )?;
                    if moved > 0 {
                        listed.push(*id);
                    }
                }
                placements.push((label, listed));
            }

            for (label, listed) in &placements {
                let current = ordering::sibling_ids::<TasksInSection>(tx, *label, None)?;
                let present: BTreeSet<i64> = current.iter().copied().collect();
                let mut sequence: Vec<i64> =
                    listed.iter().copied().filter(|id| present.contains(id)).collect();
                let placed: BTreeSet<i64> = sequence.iter().copied().collect();
                sequence.extend(current.into_iter().filter(|id| !placed.contains(id)));
                ordering::assign::<TasksInSection>(tx, &sequence)?;
            }

            for label in section_labels(tx)? {
                if !layout.sections.contains_key(&label) {
                    ordering::renumber::<TasksInSection>(tx, &label)?;
                }
            }
            Ok(())
        })?;

        self.list_tasks()
    }

    /// Move one task into `section` at `index`
    pub fn move_task(&self, id: i64, section: &str, index: usize) -> ApiResult<Task> {
        let section = section.trim();
        if section.is_empty() {
            return Err(ApiError::Validation("Field `section` must not be empty".to_string()));
        }
        self.write(|tx| {
            let task = task_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Task"))?;
            ordering::move_to::<TasksInSection>(tx, id, &section, index)?;
            if task.section != section {
                ordering::renumber::<TasksInSection>(tx, &task.section)?;
            }
            task_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Task"))
        })
    }

    /// Delete a task together with the file that owns it. Absent tasks are a no-op.
    pub fn delete_task(&self, id: i64) -> ApiResult<bool> {
        self.write(|tx| {
            let Some(task) = task_by_id(tx, id)? else {
                return Ok(false);
            };

            match file_by_id(tx, task.file_id)? {
                Some(file) => purge_file(tx, &file)?,
                None => {
                    tx.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
                    ordering::renumber::<TasksInSection>(tx, &task.section)?;
                }
            }
            Ok(true)
        })
    }
}
