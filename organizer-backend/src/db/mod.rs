//! SQLite persistence.
//!
//! `Database` owns an r2d2 pool; each table gets its own `impl Database`
//! block under `tables/`.

mod tables;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Transaction, TransactionBehavior};
use std::path::Path;

use crate::error::ApiResult;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS houses (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    house TEXT NOT NULL,
    name TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT '',
    "order" INTEGER NOT NULL DEFAULT 0,
    flat INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_topics_house ON topics(house, "order");

CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    section TEXT NOT NULL,
    linked INTEGER NOT NULL DEFAULT 0,
    content TEXT,
    UNIQUE (topic_id, name, section)
);

CREATE TABLE IF NOT EXISTS file_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL,
    text TEXT NOT NULL,
    date TEXT,
    done INTEGER NOT NULL DEFAULT 0,
    "order" INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_file_entries_file ON file_entries(file_id);

CREATE TABLE IF NOT EXISTS green_note_topics (
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS green_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    signature TEXT NOT NULL UNIQUE,
    date TEXT NOT NULL,
    good_1 TEXT NOT NULL DEFAULT '',
    good_2 TEXT NOT NULL DEFAULT '',
    good_3 TEXT NOT NULL DEFAULT '',
    improve TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS green_note_scores (
    note_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    score INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_green_note_scores_note ON green_note_scores(note_id);

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL,
    topic_id INTEGER NOT NULL,
    file_name TEXT NOT NULL,
    section TEXT NOT NULL,
    "order" INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_tasks_file ON tasks(file_id);

CREATE TABLE IF NOT EXISTS unclassified_tasks (
    "order" INTEGER NOT NULL,
    content TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS control_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL,
    name_file TEXT NOT NULL,
    topic_id INTEGER NOT NULL,
    is_plan INTEGER NOT NULL,
    order_index INTEGER NOT NULL DEFAULT 0,
    modification_alert INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_control_files_file ON control_files(file_id);

CREATE TABLE IF NOT EXISTS tracking (
    name TEXT PRIMARY KEY,
    time TEXT NOT NULL,
    amount INTEGER NOT NULL DEFAULT 0,
    done INTEGER NOT NULL DEFAULT 0,
    content TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS food (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    name TEXT NOT NULL,
    calories REAL NOT NULL DEFAULT 0,
    protein REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_food_date ON food(date);
"#;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    default_house: String,
}

impl Database {
    /// Open (or create) the database file, apply the schema and make sure the
    /// default house exists.
    pub fn new(database_url: &str, pool_size: u32, default_house: &str) -> ApiResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    crate::error::ApiError::Storage(format!(
                        "Failed to create database directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(database_url).with_init(|c| {
            c.execute_batch("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
        });
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self {
            pool,
            default_house: default_house.to_string(),
        };

        let conn = db.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute(
            "INSERT OR IGNORE INTO houses (name) VALUES (?1)",
            [&db.default_house],
        )?;
        log::info!("[DB] Schema ready at {} (default house '{}')", database_url, db.default_house);

        Ok(db)
    }

    pub fn conn(&self) -> ApiResult<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Name of the protected fallback house
    pub fn default_house(&self) -> &str {
        &self.default_house
    }

    /// Run `f` inside one IMMEDIATE transaction; commit on `Ok`, roll back on `Err`.
    pub fn write<T>(&self, f: impl FnOnce(&Transaction) -> ApiResult<T>) -> ApiResult<T> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
