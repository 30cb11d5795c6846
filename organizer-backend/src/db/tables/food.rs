//! Food log database operations

use crate::error::{ApiError, ApiResult};
use crate::models::FoodEntry;
use super::super::Database;

impl Database {
    pub fn list_food(&self, date: &str) -> ApiResult<Vec<FoodEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, name, calories, protein FROM food WHERE date = ?1 ORDER BY id",
        )?;
        let entries = stmt
            .query_map([date], |row| {
                Ok(FoodEntry {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    name: row.get(2)?,
                    calories: row.get(3)?,
                    protein: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn add_food(&self, date: &str, name: &str, calories: f64, protein: f64) -> ApiResult<FoodEntry> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Field `name` must not be empty".to_string()));
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO food (date, name, calories, protein) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![date, name, calories, protein],
        )?;
        Ok(FoodEntry {
            id: conn.last_insert_rowid(),
            date: date.to_string(),
            name: name.to_string(),
            calories,
            protein,
        })
    }

    /// Delete every entry named `name` on `date`; returns how many went away
    pub fn delete_food(&self, name: &str, date: &str) -> ApiResult<usize> {
        let conn = self.conn()?;
        Ok(conn.execute(
            "DELETE FROM food WHERE name = ?1 AND date = ?2",
            [name, date],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;

    #[test]
    fn test_food_log_by_date() {
        let (_dir, db) = temp_db();
        db.add_food("2024-02-01", "oats", 380.0, 13.5).unwrap();
        db.add_food("2024-02-01", "eggs", 155.0, 13.0).unwrap();
        db.add_food("2024-02-02", "oats", 380.0, 13.5).unwrap();

        let day = db.list_food("2024-02-01").unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].name, "oats");

        assert_eq!(db.delete_food("oats", "2024-02-01").unwrap(), 1);
        assert_eq!(db.delete_food("oats", "2024-02-01").unwrap(), 0);
        assert_eq!(db.list_food("2024-02-01").unwrap().len(), 1);
        assert_eq!(db.list_food("2024-02-02").unwrap().len(), 1);
    }
}
