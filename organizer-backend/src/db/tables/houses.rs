//! House database operations

use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::ordering::{self, TopicsInHouse};
use super::super::Database;

pub(crate) fn house_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM houses WHERE name = ?1", [name], |_| Ok(()))
        .optional()?
        .is_some())
}

impl Database {
    /// List house names, default house first
    pub fn list_houses(&self) -> ApiResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM houses ORDER BY CASE WHEN name = ?1 THEN 0 ELSE 1 END, name",
        )?;
        let houses = stmt
            .query_map([self.default_house()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(houses)
    }

    /// Create a house; returns false when it already existed
    pub fn create_house(&self, name: &str) -> ApiResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("House name must not be empty".to_string()));
        }
        let conn = self.conn()?;
        let inserted = conn.execute("INSERT OR IGNORE INTO houses (name) VALUES (?1)", [name])?;
        Ok(inserted > 0)
    }

    /// Rename a house and carry its topics along
    pub fn rename_house(&self, old_name: &str, new_name: &str) -> ApiResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ApiError::Validation("House name must not be empty".to_string()));
        }
        if old_name == self.default_house() {
            return Err(ApiError::invalid(format!(
                "The default house '{}' cannot be renamed",
                old_name
            )));
        }
        if old_name == new_name {
            return Ok(());
        }

        self.write(|tx| {
            if !house_exists(tx, old_name)? {
                return Err(ApiError::not_found("House"));
            }
            if house_exists(tx, new_name)? {
                return Err(ApiError::invalid(format!("House '{}' already exists", new_name)));
            }
            tx.execute(
                "UPDATE houses SET name = ?1 WHERE name = ?2",
                [new_name, old_name],
            )?;
            tx.execute(
                "UPDATE topics SET house = ?1 WHERE house = ?2",
                [new_name, old_name],
            )?;
            Ok(())
        })
    }

    /// Delete a house after moving its topics to the end of the default house.
    ///
    /// Returns the number of topics that were reassigned. Deleting a house
    /// that does not exist is a no-op.
    pub fn delete_house(&self, name: &str) -> ApiResult<usize> {
        let default_house = self.default_house().to_string();
        if name == default_house {
            return Err(ApiError::invalid(format!(
                "The default house '{}' cannot be deleted",
                name
            )));
        }

        self.write(|tx| {
            let orphans = ordering::sibling_ids::<TopicsInHouse>(tx, &name, None)?;
            let start = ordering::next_position::<TopicsInHouse>(tx, &default_house)?.get();
            for (offset, id) in orphans.iter().enumerate() {
                tx.execute(
                    "UPDATE topics SET house = ?1, \"order\" = ?2 WHERE id = ?3",
                    rusqlite::params![default_house, start + offset as i64, id],
                )?;
            }
            ordering::renumber::<TopicsInHouse>(tx, &default_house)?;
            tx.execute("DELETE FROM houses WHERE name = ?1", [name])?;

            if !orphans.is_empty() {
                log::info!(
                    "[HOUSES] Moved {} topics from '{}' to '{}'",
                    orphans.len(),
                    name,
                    default_house
                );
            }
            Ok(orphans.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::error::ApiError;

    #[test]
    fn test_create_is_idempotent() {
        let (_dir, db) = temp_db();
        assert!(db.create_house("work").unwrap());
        assert!(!db.create_house("work").unwrap());
        assert_eq!(db.list_houses().unwrap(), vec!["general", "work"]);
    }

    #[test]
    fn test_default_house_is_protected() {
        let (_dir, db) = temp_db();
        assert!(matches!(db.delete_house("general"), Err(ApiError::InvalidOperation(_))));
        assert!(matches!(
            db.rename_house("general", "misc"),
            Err(ApiError::InvalidOperation(_))
        ));
        assert_eq!(db.list_houses().unwrap(), vec!["general"]);
    }

    #[test]
    fn test_rename_cascades_to_topics() {
        let (_dir, db) = temp_db();
        db.create_house("work").unwrap();
        let topic = db.create_topic("Reports", "#f00", Some("work")).unwrap();

        db.rename_house("work", "office").unwrap();

        assert_eq!(db.get_topic(topic.id).unwrap().unwrap().house, "office");
        assert_eq!(db.list_houses().unwrap(), vec!["general", "office"]);
        assert!(matches!(db.rename_house("work", "x"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_rename_onto_existing_house_rejected() {
        let (_dir, db) = temp_db();
        db.create_house("a").unwrap();
        db.create_house("b").unwrap();
        assert!(matches!(db.rename_house("a", "b"), Err(ApiError::InvalidOperation(_))));
    }

    #[test]
    fn test_delete_reassigns_topics_to_default() {
        let (_dir, db) = temp_db();
        let g1 = db.create_topic("g1", "", None).unwrap();
        db.create_house("work").unwrap();
        let w2 = db.create_topic("w2", "", Some("work")).unwrap();
        let w1 = db.create_topic("w1", "", Some("work")).unwrap();

        assert_eq!(db.delete_house("work").unwrap(), 2);

        let grouped = db.list_topics_by_house().unwrap();
        assert!(!grouped.contains_key("work"));
        let general: Vec<(i64, i64)> = grouped["general"].iter().map(|t| (t.id, t.order.get())).collect();
        assert_eq!(general, vec![(g1.id, 0), (w1.id, 1), (w2.id, 2)]);
        assert_eq!(db.list_houses().unwrap(), vec!["general"]);
    }

    #[test]
    fn test_delete_missing_house_is_noop() {
        let (_dir, db) = temp_db();
        assert_eq!(db.delete_house("nowhere").unwrap(), 0);
    }
}
