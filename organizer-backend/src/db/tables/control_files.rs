//! Control file (plan/doc board metadata) database operations

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::models::{ControlFile, UpdateControlFileRequest};
use crate::ordering::{self, ControlFilesInBucket};
use super::super::Database;

const CONTROL_COLUMNS: &str = "id, file_id, name_file, topic_id, is_plan, order_index, modification_alert";

fn row_to_control_file(row: &rusqlite::Row) -> rusqlite::Result<ControlFile> {
    Ok(ControlFile {
        id: row.get(0)?,
        file_id: row.get(1)?,
        name_file: row.get(2)?,
        topic_id: row.get(3)?,
        is_plan: row.get::<_, i32>(4)? != 0,
        order_index: row.get(5)?,
        modification_alert: row.get::<_, i32>(6)? != 0,
    })
}

fn control_file_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<ControlFile>> {
    conn.query_row(
        &format!("SELECT {} FROM control_files WHERE id = ?1", CONTROL_COLUMNS),
        [id],
        row_to_control_file,
    )
    .optional()
}

impl Database {
    /// Plans bucket first, each bucket by order_index
    pub fn list_control_files(&self) -> ApiResult<Vec<ControlFile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM control_files ORDER BY is_plan DESC, order_index, id",
            CONTROL_COLUMNS
        ))?;
        let files = stmt
            .query_map([], row_to_control_file)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(files)
    }

    /// Update the alert flag and/or the board placement of a control file.
    ///
    /// Switching buckets without an index appends to the new bucket.
    pub fn update_control_file(
        &self,
        id: i64,
        update: &UpdateControlFileRequest,
    ) -> ApiResult<ControlFile> {
        self.write(|tx| {
            let current =
                control_file_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Control file"))?;

            if let Some(alert) = update.modification_alert {
                tx.execute(
                    "UPDATE control_files SET modification_alert = ?1 WHERE id = ?2",
                    rusqlite::params![alert, id],
                )?;
            }

            if update.is_plan.is_some() || update.order_index.is_some() {
                let bucket = update.is_plan.unwrap_or(current.is_plan);
                let index = match update.order_index {
                    Some(index) => index,
                    None if bucket != current.is_plan => usize::MAX,
                    None => current.order_index.get().max(0) as usize,
                };
                ordering::move_to::<ControlFilesInBucket>(tx, id, &bucket, index)?;
                if bucket != current.is_plan {
                    ordering::renumber::<ControlFilesInBucket>(tx, &current.is_plan)?;
                }
            }

            control_file_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Control file"))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::error::ApiError;
    use crate::models::{Section, UpdateControlFileRequest};

    fn buckets(db: &crate::db::Database) -> Vec<(bool, String, i64)> {
        db.list_control_files()
            .unwrap()
            .into_iter()
            .map(|c| (c.is_plan, c.name_file, c.order_index.get()))
            .collect()
    }

    #[test]
    fn test_reorder_within_bucket() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        db.create_file(topic.id, "p1", Section::Plans).unwrap();
        db.create_file(topic.id, "p2", Section::Plans).unwrap();
        let p3 = db.create_file(topic.id, "p3", Section::Plans).unwrap();

        let updated = db
            .update_control_file(
                p3.control_file_id.unwrap(),
                &UpdateControlFileRequest {
                    order_index: Some(0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.order_index.get(), 0);
        assert_eq!(
            buckets(&db),
            vec![
                (true, "p3".to_string(), 0),
                (true, "p1".to_string(), 1),
                (true, "p2".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_switch_bucket_appends_and_closes_gap() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        let p1 = db.create_file(topic.id, "p1", Section::Plans).unwrap();
        db.create_file(topic.id, "p2", Section::Plans).unwrap();
        db.create_file(topic.id, "d1", Section::Docs).unwrap();

        let updated = db
            .update_control_file(
                p1.control_file_id.unwrap(),
                &UpdateControlFileRequest {
                    is_plan: Some(false),
                    modification_alert: Some(true),
                    order_index: None,
                },
            )
            .unwrap();
        assert!(!updated.is_plan);
        assert!(updated.modification_alert);
        assert_eq!(updated.order_index.get(), 1);

        assert_eq!(
            buckets(&db),
            vec![
                (true, "p2".to_string(), 0),
                (false, "d1".to_string(), 0),
                (false, "p1".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_alert_only_keeps_position() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        db.create_file(topic.id, "d1", Section::Docs).unwrap();
        let d2 = db.create_file(topic.id, "d2", Section::Docs).unwrap();

        let updated = db
            .update_control_file(
                d2.control_file_id.unwrap(),
                &UpdateControlFileRequest {
                    modification_alert: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.order_index.get(), 1);
        assert!(updated.modification_alert);
    }

    #[test]
    fn test_deleting_file_removes_its_row_after_bucket_switch() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        let roadmap = db.create_file(topic.id, "roadmap", Section::Plans).unwrap();
        db.create_file(topic.id, "d1", Section::Docs).unwrap();

        db.update_control_file(
            roadmap.control_file_id.unwrap(),
            &UpdateControlFileRequest {
                is_plan: Some(false),
                order_index: Some(0),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(db.delete_file(roadmap.file_id).unwrap());
        assert_eq!(buckets(&db), vec![(false, "d1".to_string(), 0)]);
    }

    #[test]
    fn test_deleting_file_spares_same_named_row_in_its_bucket() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        let plan = db.create_file(topic.id, "a", Section::Plans).unwrap();
        let doc = db.create_file(topic.id, "a", Section::Docs).unwrap();

        // Both rows now sit in the docs bucket under the same name
        db.update_control_file(
            plan.control_file_id.unwrap(),
            &UpdateControlFileRequest {
                is_plan: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(db.delete_file(doc.file_id).unwrap());
        let rows = db.list_control_files().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_id, plan.file_id);
        assert_eq!((rows[0].is_plan, rows[0].order_index.get()), (false, 0));
    }

    #[test]
    fn test_deleting_topic_clears_switched_rows() {
        let (_dir, db) = temp_db();
        let topic = db.create_topic("t", "", None).unwrap();
        let other = db.create_topic("o", "", None).unwrap();
        let plan = db.create_file(topic.id, "p", Section::Plans).unwrap();
        db.create_file(other.id, "keep", Section::Plans).unwrap();

        db.update_control_file(
            plan.control_file_id.unwrap(),
            &UpdateControlFileRequest {
                is_plan: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(db.delete_topic(topic.id).unwrap());
        assert_eq!(buckets(&db), vec![(true, "keep".to_string(), 0)]);
    }

    #[test]
    fn test_missing_control_file() {
        let (_dir, db) = temp_db();
        assert!(matches!(
            db.update_control_file(7, &UpdateControlFileRequest::default()),
            Err(ApiError::NotFound(_))
        ));
    }
}
