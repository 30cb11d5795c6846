//! File database operations: listing, creation with board rows, content blobs
//! and the linked-file registry.

use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::config::defaults;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreatedFile, FileRecord, LinkedFile, Section, SectionedFiles};
use crate::ordering::{self, ControlFilesInBucket, TasksInSection};
use super::super::Database;
use super::topics::topic_by_id;

const FILE_COLUMNS: &str = "id, topic_id, name, section, linked";

fn section_from_sql(value: String) -> rusqlite::Result<Section> {
    value.parse::<Section>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })
}

fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        name: row.get(2)?,
        section: section_from_sql(row.get(3)?)?,
        linked: row.get::<_, i32>(4)? != 0,
    })
}

pub(crate) fn file_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<FileRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM files WHERE id = ?1", FILE_COLUMNS),
        [id],
        row_to_file,
    )
    .optional()
}

pub(crate) fn files_of_topic(conn: &Connection, topic_id: i64) -> rusqlite::Result<Vec<FileRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM files WHERE topic_id = ?1 ORDER BY id",
        FILE_COLUMNS
    ))?;
    let files = stmt
        .query_map([topic_id], row_to_file)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(files)
}

/// Insert a file plus the board row its section calls for.
pub(crate) fn insert_file(
    conn: &Connection,
    topic_id: i64,
    name: &str,
    section: Section,
) -> ApiResult<CreatedFile> {
    if topic_by_id(conn, topic_id)?.is_none() {
        return Err(ApiError::not_found("Topic"));
    }
    let duplicate = conn
        .query_row(
            "SELECT 1 FROM files WHERE topic_id = ?1 AND name = ?2 AND section = ?3",
            rusqlite::params![topic_id, name, section.as_str()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if duplicate {
        return Err(ApiError::invalid(format!(
            "File '{}' already exists in {}",
            name,
            section.as_str()
        )));
    }

    conn.execute(
        "INSERT INTO files (topic_id, name, section, linked, content) VALUES (?1, ?2, ?3, 0, NULL)",
        rusqlite::params![topic_id, name, section.as_str()],
    )?;
    let file_id = conn.last_insert_rowid();

    let mut created = CreatedFile {
        file_id,
        task_id: None,
        control_file_id: None,
    };

    match section {
        Section::Tasks => {
            let label = defaults::TASK_SECTION;
            let order = ordering::next_position::<TasksInSection>(conn, &label)?;
            conn.execute(
                "INSERT INTO tasks (file_id, topic_id, file_name, section, \"order\")
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![file_id, topic_id, name, label, order],
            )?;
            created.task_id = Some(conn.last_insert_rowid());
        }
        Section::Plans | Section::Docs => {
            let is_plan = section == Section::Plans;
            let order = ordering::next_position::<ControlFilesInBucket>(conn, &is_plan)?;
            conn.execute(
                "INSERT INTO control_files (file_id, name_file, topic_id, is_plan, order_index, modification_alert)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                rusqlite::params![file_id, name, topic_id, is_plan, order],
            )?;
            created.control_file_id = Some(conn.last_insert_rowid());
        }
    }

    Ok(created)
}

/// Remove a file with its entries and the task or control rows it owns,
/// renumbering whichever label or bucket those rows sat in.
pub(crate) fn purge_file(conn: &Connection, file: &FileRecord) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM file_entries WHERE file_id = ?1", [file.id])?;

    let labels: Vec<String> = {
        let mut stmt = conn.prepare("SELECT DISTINCT section FROM tasks WHERE file_id = ?1")?;
        stmt.query_map([file.id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };
    conn.execute("DELETE FROM tasks WHERE file_id = ?1", [file.id])?;
    for label in labels {
        ordering::renumber::<TasksInSection>(conn, &label)?;
    }

    let buckets: Vec<bool> = {
        let mut stmt =
            conn.prepare("SELECT DISTINCT is_plan FROM control_files WHERE file_id = ?1")?;
        stmt.query_map([file.id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
    };
    conn.execute("DELETE FROM control_files WHERE file_id = ?1", [file.id])?;
    for is_plan in buckets {
        ordering::renumber::<ControlFilesInBucket>(conn, &is_plan)?;
    }

    conn.execute("DELETE FROM files WHERE id = ?1", [file.id])?;
    Ok(())
}

impl Database {
    /// Files of a topic grouped by section
    pub fn list_files(&self, topic_id: i64) -> ApiResult<SectionedFiles> {
        let conn = self.conn()?;
        if topic_by_id(&conn, topic_id)?.is_none() {
            return Err(ApiError::not_found("Topic"));
        }
        let mut grouped = SectionedFiles::default();
        for file in files_of_topic(&conn, topic_id)? {
            grouped.push(file);
        }
        Ok(grouped)
    }

    pub fn get_file(&self, id: i64) -> ApiResult<Option<FileRecord>> {
        let conn = self.conn()?;
        Ok(file_by_id(&conn, id)?)
    }

    /// Create an empty file; `tasks` files get a board task, plans/docs a control file
    pub fn create_file(&self, topic_id: i64, name: &str, section: Section) -> ApiResult<CreatedFile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("File name must not be empty".to_string()));
        }
        self.write(|tx| insert_file(tx, topic_id, name, section))
    }

    /// Delete a file and everything hanging off it. Returns false when absent.
    pub fn delete_file(&self, id: i64) -> ApiResult<bool> {
        self.write(|tx| match file_by_id(tx, id)? {
            Some(file) => {
                purge_file(tx, &file)?;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    /// Stored content blob, `Value::Null` when the file was never saved
    pub fn get_file_content(&self, id: i64) -> ApiResult<Value> {
        let conn = self.conn()?;
        let content: Option<Option<String>> = conn
            .query_row("SELECT content FROM files WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        match content {
            None => Err(ApiError::not_found("File")),
            Some(None) => Ok(Value::Null),
            Some(Some(raw)) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Replace the content blob wholesale
    pub fn set_file_content(&self, id: i64, content: &Value) -> ApiResult<()> {
        let raw = serde_json::to_string(content)
            .map_err(|e| ApiError::Validation(format!("Content cannot be serialized: {}", e)))?;
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE files SET content = ?1 WHERE id = ?2",
            rusqlite::params![raw, id],
        )?;
        if updated == 0 {
            return Err(ApiError::not_found("File"));
        }
        Ok(())
    }

    pub fn set_file_linked(&self, id: i64, linked: bool) -> ApiResult<FileRecord> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE files SET linked = ?1 WHERE id = ?2",
            rusqlite::params![linked, id],
        )?;
        if updated == 0 {
            return Err(ApiError::not_found("File"));
        }
        file_by_id(&conn, id)?.ok_or_else(|| ApiError::not_found("File"))
    }

    /// Flip the linked flag; returns the new value
    pub fn toggle_file_linked(&self, id: i64) -> ApiResult<bool> {
        let conn = self.conn()?;
        let linked: Option<i32> = conn
            .query_row(
                "UPDATE files SET linked = 1 - linked WHERE id = ?1 RETURNING linked",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        linked.map(|l| l != 0).ok_or_else(|| ApiError::not_found("File"))
    }

    /// All linked files with their topic's display metadata
    pub fn list_linked_files(&self) -> ApiResult<Vec<LinkedFile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT f.id, f.topic_id, f.name, f.section, t.name, t.color
             FROM files f
             JOIN topics t ON t.id = f.topic_id
             WHERE f.linked = 1
             ORDER BY t.name, f.name, f.id",
        )?;
        let files = stmt
            .query_map([], |row| {
                Ok(LinkedFile {
                    id: row.get(0)?,
                    topic_id: row.get(1)?,
                    name: row.get(2)?,
                    section: section_from_sql(row.get(3)?)?,
                    topic_name: row.get(4)?,
                    topic_color: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files)
    }
}
