//! Topic database operations

use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::models::Topic;
use crate::ordering::{self, TopicsInHouse};
use super::super::Database;
use super::files::{files_of_topic, purge_file};
use super::houses::house_exists;

const TOPIC_COLUMNS: &str = "id, house, name, color, \"order\", flat";

fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        house: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        order: row.get(4)?,
        flat: row.get::<_, i32>(5)? != 0,
    })
}

pub(crate) fn topic_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Topic>> {
    conn.query_row(
        &format!("SELECT {} FROM topics WHERE id = ?1", TOPIC_COLUMNS),
        [id],
        row_to_topic,
    )
    .optional()
}

impl Database {
    /// Every house with its topics in display order (houses without topics map to an empty list)
    pub fn list_topics_by_house(&self) -> ApiResult<BTreeMap<String, Vec<Topic>>> {
        let conn = self.conn()?;

        let mut grouped: BTreeMap<String, Vec<Topic>> = BTreeMap::new();
        let mut stmt = conn.prepare("SELECT name FROM houses")?;
        for name in stmt.query_map([], |row| row.get::<_, String>(0))? {
            grouped.entry(name?).or_default();
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM topics ORDER BY house, \"order\", id",
            TOPIC_COLUMNS
        ))?;
        for topic in stmt.query_map([], row_to_topic)? {
            let topic = topic?;
            grouped.entry(topic.house.clone()).or_default().push(topic);
        }

        Ok(grouped)
    }

    pub fn get_topic(&self, id: i64) -> ApiResult<Option<Topic>> {
        let conn = self.conn()?;
        Ok(topic_by_id(&conn, id)?)
    }

    /// Create a topic at the top of its house (the house is created on demand)
    pub fn create_topic(&self, name: &str, color: &str, house: Option<&str>) -> ApiResult<Topic> {
        let house = house
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(self.default_house())
            .to_string();

        self.write(|tx| {
            tx.execute("INSERT OR IGNORE INTO houses (name) VALUES (?1)", [&house])?;
            tx.execute(
                "INSERT INTO topics (house, name, color, \"order\", flat) VALUES (?1, ?2, ?3, 0, 0)",
                rusqlite::params![house, name, color],
            )?;
            let id = tx.last_insert_rowid();
            ordering::move_to::<TopicsInHouse>(tx, id, &house, 0)?;
            topic_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Topic"))
        })
    }

    /// Rename and recolor a topic
    pub fn update_topic(&self, id: i64, name: &str, color: &str) -> ApiResult<Topic> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE topics SET name = ?1, color = ?2 WHERE id = ?3",
            rusqlite::params![name, color, id],
        )?;
        if updated == 0 {
            return Err(ApiError::not_found("Topic"));
        }
        topic_by_id(&conn, id)?.ok_or_else(|| ApiError::not_found("Topic"))
    }

    /// Delete a topic with its files, entries, tasks and control files.
    /// Returns false when the topic did not exist.
    pub fn delete_topic(&self, id: i64) -> ApiResult<bool> {
        self.write(|tx| {
            let Some(topic) = topic_by_id(tx, id)? else {
                return Ok(false);
            };
            for file in files_of_topic(tx, id)? {
                purge_file(tx, &file)?;
            }
            tx.execute("DELETE FROM topics WHERE id = ?1", [id])?;
            ordering::renumber::<TopicsInHouse>(tx, &topic.house)?;
            Ok(true)
        })
    }

    /// Move a topic into `house` at `index` (clamped to the end of the house)
    pub fn move_topic(&self, id: i64, house: &str, index: usize) -> ApiResult<Topic> {
        self.write(|tx| {
            if !house_exists(tx, house)? {
                return Err(ApiError::not_found("House"));
            }
            let topic = topic_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Topic"))?;

            ordering::move_to::<TopicsInHouse>(tx, id, &house, index)?;
            if topic.house != house {
                ordering::renumber::<TopicsInHouse>(tx, &topic.house)?;
            }

            topic_by_id(tx, id)?.ok_or_else(|| ApiError::not_found("Topic"))
        })
    }

    /// Flip the flat display flag; returns the new value
    pub fn toggle_topic_flat(&self, id: i64) -> ApiResult<bool> {
        let conn = self.conn()?;
        let flat: Option<i32> = conn
            .query_row(
                "UPDATE topics SET flat = 1 - flat WHERE id = ?1 RETURNING flat",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        flat.map(|f| f != 0).ok_or_else(|| ApiError::not_found("Topic"))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::error::ApiError;
    use crate::models::Section;

    fn house_ids(db: &crate::db::Database, house: &str) -> Vec<i64> {
        db.list_topics_by_house().unwrap()[house].iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_create_lands_on_top() {
        let (_dir, db) = temp_db();
        let a = db.create_topic("a", "#111", None).unwrap();
        let b = db.create_topic("b", "#222", None).unwrap();
        assert_eq!(b.order.get(), 0);
        assert_eq!(house_ids(&db, "general"), vec![b.id, a.id]);

        let orders: Vec<i64> = db.list_topics_by_house().unwrap()["general"]
            .iter()
            .map(|t| t.order.get())
            .collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_move_between_houses_keeps_both_dense() {
        let (_dir, db) = temp_db();
        db.create_house("work").unwrap();
        let w3 = db.create_topic("w3", "", Some("work")).unwrap();
        let w2 = db.create_topic("w2", "", Some("work")).unwrap();
        let w1 = db.create_topic("w1", "", Some("work")).unwrap();
        let g2 = db.create_topic("g2", "", None).unwrap();
        let g1 = db.create_topic("g1", "", None).unwrap();

        let moved = db.move_topic(g1.id, "work", 1).unwrap();
        assert_eq!(moved.house, "work");
        assert_eq!(moved.order.get(), 1);

        assert_eq!(house_ids(&db, "work"), vec![w1.id, g1.id, w2.id, w3.id]);
        let grouped = db.list_topics_by_house().unwrap();
        let work_orders: Vec<i64> = grouped["work"].iter().map(|t| t.order.get()).collect();
        assert_eq!(work_orders, vec![0, 1, 2, 3]);
        assert_eq!(grouped["general"].len(), 1);
        assert_eq!(grouped["general"][0].id, g2.id);
        assert_eq!(grouped["general"][0].order.get(), 0);
    }

    #[test]
    fn test_move_index_clamps_to_append() {
        let (_dir, db) = temp_db();
        db.create_house("work").unwrap();
        let w = db.create_topic("w", "", Some("work")).unwrap();
        let g = db.create_topic("g", "", None).unwrap();

        let moved = db.move_topic(g.id, "work", 50).unwrap();
        assert_eq!(moved.order.get(), 1);
        assert_eq!(house_ids(&db, "work"), vec![w.id, g.id]);
    }

    #[test]
    fn test_move_errors() {
        let (_dir, db) = temp_db();
        let t = db.create_topic("t", "", None).unwrap();
        assert!(matches!(db.move_topic(t.id, "missing", 0), Err(ApiError::NotFound(_))));
        assert!(matches!(db.move_topic(999, "general", 0), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_update_and_flat_toggle() {
        let (_dir, db) = temp_db();
        let t = db.create_topic("old", "#000", None).unwrap();
        let updated = db.update_topic(t.id, "new", "#fff").unwrap();
        assert_eq!((updated.name.as_str(), updated.color.as_str()), ("new", "#fff"));

        assert!(db.toggle_topic_flat(t.id).unwrap());
        assert!(!db.toggle_topic_flat(t.id).unwrap());
        assert!(matches!(db.toggle_topic_flat(404), Err(ApiError::NotFound(_))));
        assert!(matches!(db.update_topic(404, "x", "y"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_delete_cascades_and_renumbers() {
        let (_dir, db) = temp_db();
        let a = db.create_topic("a", "", None).unwrap();
        let b = db.create_topic("b", "", None).unwrap();
        let c = db.create_topic("c", "", None).unwrap();
        let file = db.create_file(b.id, "todo", Section::Tasks).unwrap();
        db.create_file(b.id, "roadmap", Section::Plans).unwrap();
        db.add_entry(file.file_id, "first", None, false, 0).unwrap();

        assert!(db.delete_topic(b.id).unwrap());
        assert!(!db.delete_topic(b.id).unwrap());

        assert_eq!(house_ids(&db, "general"), vec![c.id, a.id]);
        let orders: Vec<i64> = db.list_topics_by_house().unwrap()["general"]
            .iter()
            .map(|t| t.order.get())
            .collect();
        assert_eq!(orders, vec![0, 1]);
        assert!(db.list_tasks().unwrap().is_empty());
        assert!(db.list_control_files().unwrap().is_empty());
        assert!(db.get_file(file.file_id).unwrap().is_none());
    }
}
