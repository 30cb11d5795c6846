//! Green note (journal) database operations.
//!
//! A note is identified by its client-chosen signature. Saving replaces the
//! whole note and its score set in one transaction, so a signature never maps
//! to more than one row.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::error::{ApiError, ApiResult};
use crate::models::{GreenNote, NoteScore, NoteSignature, SaveGreenNoteRequest};
use super::super::Database;

const NOTE_COLUMNS: &str = "id, signature, date, good_1, good_2, good_3, improve, created_at";

fn scores_of(conn: &Connection, note_id: i64) -> rusqlite::Result<Vec<NoteScore>> {
    let mut stmt = conn.prepare(
        "SELECT category, score FROM green_note_scores WHERE note_id = ?1 ORDER BY rowid",
    )?;
    let scores = stmt
        .query_map([note_id], |row| {
            Ok(NoteScore {
                category: row.get(0)?,
                score: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(scores)
}

/// Load the first note matching `where_clause` together with its scores
fn load_note(
    conn: &Connection,
    where_clause: &str,
    param: &str,
) -> rusqlite::Result<Option<GreenNote>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM green_notes {}", NOTE_COLUMNS, where_clause),
            [param],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    GreenNote {
                        signature: row.get(1)?,
                        date: row.get(2)?,
                        good_1: row.get(3)?,
                        good_2: row.get(4)?,
                        good_3: row.get(5)?,
                        improve: row.get(6)?,
                        scores: Vec::new(),
                        created_at: row.get(7)?,
                    },
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, mut note)) => {
            note.scores = scores_of(conn, id)?;
            Ok(Some(note))
        }
        None => Ok(None),
    }
}

/// Scores first, then the note. Returns the number of notes removed.
fn remove_note(conn: &Connection, signature: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM green_note_scores
         WHERE note_id IN (SELECT id FROM green_notes WHERE signature = ?1)",
        [signature],
    )?;
    conn.execute("DELETE FROM green_notes WHERE signature = ?1", [signature])
}

impl Database {
    /// Replace whatever is stored under the request's signature
    pub fn save_green_note(&self, note: &SaveGreenNoteRequest) -> ApiResult<GreenNote> {
        if note.signature.trim().is_empty() {
            return Err(ApiError::Validation("Field `signature` must not be empty".to_string()));
        }
        if note.date.trim().is_empty() {
            return Err(ApiError::Validation("Field `date` must not be empty".to_string()));
        }

        let created_at = Utc::now().to_rfc3339();
        let saved = self.write(|tx| {
            let replaced = remove_note(tx, &note.signature)?;

            tx.execute(
                "INSERT INTO green_notes (signature, date, good_1, good_2, good_3, improve, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    note.signature,
                    note.date,
                    note.good_1,
                    note.good_2,
                    note.good_3,
                    note.improve,
                    created_at,
                ],
            )?;
            let note_id = tx.last_insert_rowid();

            let mut stmt = tx.prepare(
                "INSERT INTO green_note_scores (note_id, category, score) VALUES (?1, ?2, ?3)",
            )?;
            for score in &note.scores {
                stmt.execute(rusqlite::params![note_id, score.category, score.score])?;
            }

            Ok(replaced > 0)
        })?;

        log::debug!(
            "[GREEN_NOTES] {} note '{}' ({} scores)",
            if saved { "Replaced" } else { "Saved" },
            note.signature,
            note.scores.len()
        );

        Ok(GreenNote {
            signature: note.signature.clone(),
            date: note.date.clone(),
            good_1: note.good_1.clone(),
            good_2: note.good_2.clone(),
            good_3: note.good_3.clone(),
            improve: note.improve.clone(),
            scores: note.scores.clone(),
            created_at,
        })
    }

    /// The note stored under `signature`, `None` when there is none
    pub fn get_green_note(&self, signature: &str) -> ApiResult<Option<GreenNote>> {
        let conn = self.conn()?;
        Ok(load_note(&conn, "WHERE signature = ?1", signature)?)
    }

    /// Most recently written note for a calendar date
    pub fn latest_green_note_for_date(&self, date: &str) -> ApiResult<Option<GreenNote>> {
        let conn = self.conn()?;
        Ok(load_note(
            &conn,
            "WHERE date = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
            date,
        )?)
    }

    /// Delete a note and its scores; absent signatures are a no-op (returns false)
    pub fn delete_green_note(&self, signature: &str) -> ApiResult<bool> {
        let removed = self.write(|tx| Ok(remove_note(tx, signature)?))?;
        Ok(removed > 0)
    }

    /// Every stored signature ordered by (date, signature)
    pub fn list_green_note_signatures(&self) -> ApiResult<Vec<NoteSignature>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT signature, date FROM green_notes ORDER BY date, signature")?;
        let signatures = stmt
            .query_map([], |row| {
                Ok(NoteSignature {
                    signature: row.get(0)?,
                    date: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(signatures)
    }

    /// Replace the whole set of green note categories
    pub fn replace_green_note_topics(&self, topics: &[String]) -> ApiResult<Vec<String>> {
        self.write(|tx| {
            tx.execute("DELETE FROM green_note_topics", [])?;
            let mut stmt = tx.prepare("INSERT INTO green_note_topics (name) VALUES (?1)")?;
            for topic in topics {
                stmt.execute([topic])?;
            }
            Ok(())
        })?;
        Ok(topics.to_vec())
    }

    pub fn list_green_note_topics(&self) -> ApiResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name FROM green_note_topics ORDER BY rowid")?;
        let topics = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::temp_db;
    use crate::models::{NoteScore, SaveGreenNoteRequest};

    fn note(signature: &str, date: &str, good: &str, scores: &[(&str, i64)]) -> SaveGreenNoteRequest {
        SaveGreenNoteRequest {
            signature: signature.to_string(),
            date: date.to_string(),
            good_1: good.to_string(),
            good_2: String::new(),
            good_3: String::new(),
            improve: "sleep earlier".to_string(),
            scores: scores
                .iter()
                .map(|(c, s)| NoteScore {
                    category: c.to_string(),
                    score: *s,
                })
                .collect(),
        }
    }

    fn count(db: &crate::db::Database, sql: &str) -> i64 {
        db.conn().unwrap().query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_save_twice_keeps_one_row_with_latest_values() {
        let (_dir, db) = temp_db();
        db.save_green_note(&note("2024-05-01 a", "2024-05-01", "first", &[("health", 3), ("work", 4)]))
            .unwrap();
        db.save_green_note(&note("2024-05-01 a", "2024-05-01", "second", &[("mind", 5)]))
            .unwrap();

        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_notes WHERE signature = '2024-05-01 a'"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_note_scores"), 1);

        let stored = db.get_green_note("2024-05-01 a").unwrap().unwrap();
        assert_eq!(stored.good_1, "second");
        assert_eq!(
            stored.scores,
            vec![NoteScore {
                category: "mind".to_string(),
                score: 5
            }]
        );
    }

    #[test]
    fn test_missing_note_is_none_not_default() {
        let (_dir, db) = temp_db();
        assert!(db.get_green_note("nope").unwrap().is_none());
        assert!(db.latest_green_note_for_date("2024-01-01").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_signature_is_noop() {
        let (_dir, db) = temp_db();
        db.save_green_note(&note("keep", "2024-05-01", "x", &[("a", 1)])).unwrap();

        assert!(!db.delete_green_note("ghost").unwrap());
        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_notes"), 1);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_note_scores"), 1);

        assert!(db.delete_green_note("keep").unwrap());
        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_notes"), 0);
        assert_eq!(count(&db, "SELECT COUNT(*) FROM green_note_scores"), 0);
    }

    #[test]
    fn test_signatures_ordered_by_date_then_signature() {
        let (_dir, db) = temp_db();
        db.save_green_note(&note("b", "2024-05-02", "", &[])).unwrap();
        db.save_green_note(&note("z", "2024-05-01", "", &[])).unwrap();
        db.save_green_note(&note("a", "2024-05-02", "", &[])).unwrap();

        let listed: Vec<(String, String)> = db
            .list_green_note_signatures()
            .unwrap()
            .into_iter()
            .map(|s| (s.signature, s.date))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("z".to_string(), "2024-05-01".to_string()),
                ("a".to_string(), "2024-05-02".to_string()),
                ("b".to_string(), "2024-05-02".to_string()),
            ]
        );
    }

    #[test]
    fn test_latest_for_date_prefers_last_written() {
        let (_dir, db) = temp_db();
        db.save_green_note(&note("morning", "2024-05-01", "early", &[])).unwrap();
        db.save_green_note(&note("evening", "2024-05-01", "late", &[("rest", 2)])).unwrap();
        db.save_green_note(&note("other", "2024-05-02", "tomorrow", &[])).unwrap();

        let latest = db.latest_green_note_for_date("2024-05-01").unwrap().unwrap();
        assert_eq!(latest.signature, "evening");
        assert_eq!(latest.scores.len(), 1);
    }

    #[test]
    fn test_blank_signature_rejected() {
        let (_dir, db) = temp_db();
        assert!(db.save_green_note(&note("  ", "2024-05-01", "", &[])).is_err());
    }

    #[test]
    fn test_note_topics_replaced_wholesale() {
        let (_dir, db) = temp_db();
        db.replace_green_note_topics(&["health".to_string(), "work".to_string()]).unwrap();
        db.replace_green_note_topics(&["mind".to_string(), "body".to_string()]).unwrap();
        assert_eq!(db.list_green_note_topics().unwrap(), vec!["mind", "body"]);
    }
}
