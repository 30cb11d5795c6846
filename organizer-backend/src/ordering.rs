//! Dense ordering engine.
//!
//! Every ordered collection (topics in a house, tasks in a section label,
//! control files in a plan/doc bucket, the unclassified backlog) keeps its
//! positions as a contiguous `0..n` sequence. Moves never shift locally: the
//! moved row is parked on a sentinel, the siblings are re-read, the moved id
//! is spliced in, and every row gets `position = index` written back.
//!
//! All functions take a `&Connection` so callers run them inside their own
//! transaction (a `Transaction` derefs to `Connection`).

use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql};
use serde::{Deserialize, Serialize};

/// Order value a row holds while it is being moved
const SENTINEL: i64 = -1;

macro_rules! position_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map($name)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }
    };
}

position_type!(
    /// Display position of a topic inside its house
    TopicOrder
);
position_type!(
    /// Position of a task inside its section label ("later", "today", ...)
    TaskOrder
);
position_type!(
    /// Position of a control file inside the plans or docs bucket
    ControlOrder
);
position_type!(
    /// Position of an unclassified task in the global backlog
    BacklogOrder
);

/// Describes where an ordered collection lives.
pub trait Sequence {
    type Position: From<i64>;

    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Column that partitions the table into independent sequences, if any
    const GROUP_COLUMN: Option<&'static str>;
    const ORDER_COLUMN: &'static str;
}

pub struct TopicsInHouse;

impl Sequence for TopicsInHouse {
    type Position = TopicOrder;
    const TABLE: &'static str = "topics";
    const ID_COLUMN: &'static str = "id";
    const GROUP_COLUMN: Option<&'static str> = Some("house");
    const ORDER_COLUMN: &'static str = "\"order\"";
}

pub struct TasksInSection;

impl Sequence for TasksInSection {
    type Position = TaskOrder;
    const TABLE: &'static str = "tasks";
    const ID_COLUMN: &'static str = "id";
    const GROUP_COLUMN: Option<&'static str> = Some("section");
    const ORDER_COLUMN: &'static str = "\"order\"";
}

pub struct ControlFilesInBucket;

impl Sequence for ControlFilesInBucket {
    type Position = ControlOrder;
    const TABLE: &'static str = "control_files";
    const ID_COLUMN: &'static str = "id";
    const GROUP_COLUMN: Option<&'static str> = Some("is_plan");
    const ORDER_COLUMN: &'static str = "order_index";
}

pub struct Backlog;

impl Sequence for Backlog {
    type Position = BacklogOrder;
    const TABLE: &'static str = "unclassified_tasks";
    const ID_COLUMN: &'static str = "rowid";
    const GROUP_COLUMN: Option<&'static str> = None;
    const ORDER_COLUMN: &'static str = "\"order\"";
}

/// Insert `moved` into `siblings` at `target`, clamped to the end.
pub fn splice(mut siblings: Vec<i64>, moved: i64, target: usize) -> Vec<i64> {
    let at = target.min(siblings.len());
    siblings.insert(at, moved);
    siblings
}

/// Ids of a group in (position, id) order, optionally leaving one row out.
pub fn sibling_ids<S: Sequence>(
    conn: &Connection,
    group: &dyn ToSql,
    exclude: Option<i64>,
) -> rusqlite::Result<Vec<i64>> {
    let mut args: Vec<&dyn ToSql> = Vec::new();
    let mut clauses: Vec<String> = Vec::new();

    if let Some(col) = S::GROUP_COLUMN {
        args.push(group);
        clauses.push(format!("{} = ?{}", col, args.len()));
    }
    if let Some(ref id) = exclude {
        args.push(id);
        clauses.push(format!("{} != ?{}", S::ID_COLUMN, args.len()));
    }

    let mut sql = format!("SELECT {} FROM {}", S::ID_COLUMN, S::TABLE);
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(&format!(" ORDER BY {}, {}", S::ORDER_COLUMN, S::ID_COLUMN));

    let mut stmt = conn.prepare(&sql)?;
    let ids = stmt
        .query_map(args.as_slice(), |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

/// Write `position = index` for every id, in the given order.
pub fn assign<S: Sequence>(conn: &Connection, ids: &[i64]) -> rusqlite::Result<()> {
    let sql = format!(
        "UPDATE {} SET {} = ?1 WHERE {} = ?2",
        S::TABLE,
        S::ORDER_COLUMN,
        S::ID_COLUMN
    );
    let mut stmt = conn.prepare(&sql)?;
    for (position, id) in ids.iter().enumerate() {
        stmt.execute(rusqlite::params![position as i64, id])?;
    }
    Ok(())
}

/// Move a row into `group` at `target` and renumber the whole group.
///
/// Returns `None` when the row does not exist, otherwise the position it
/// landed on (the target clamped to the group size).
pub fn move_to<S: Sequence>(
    conn: &Connection,
    id: i64,
    group: &dyn ToSql,
    target: usize,
) -> rusqlite::Result<Option<S::Position>> {
    let parked = match S::GROUP_COLUMN {
        Some(col) => conn.execute(
            &format!(
                "UPDATE {} SET {} = ?1, {} = ?2 WHERE {} = ?3",
                S::TABLE,
                S::ORDER_COLUMN,
                col,
                S::ID_COLUMN
            ),
            rusqlite::params![SENTINEL, group, id],
        )?,
        None => conn.execute(
            &format!(
                "UPDATE {} SET {} = ?1 WHERE {} = ?2",
                S::TABLE,
                S::ORDER_COLUMN,
                S::ID_COLUMN
            ),
            rusqlite::params![SENTINEL, id],
        )?,
    };
    if parked == 0 {
        return Ok(None);
    }

    let siblings = sibling_ids::<S>(conn, group, Some(id))?;
    let landed = target.min(siblings.len());
    let sequence = splice(siblings, id, target);
    assign::<S>(conn, &sequence)?;

    Ok(Some(S::Position::from(landed as i64)))
}

/// Rewrite a group to `0..n` keeping its current relative order.
pub fn renumber<S: Sequence>(conn: &Connection, group: &dyn ToSql) -> rusqlite::Result<usize> {
    let ids = sibling_ids::<S>(conn, group, None)?;
    assign::<S>(conn, &ids)?;
    Ok(ids.len())
}

/// Append slot of a dense group.
pub fn next_position<S: Sequence>(
    conn: &Connection,
    group: &dyn ToSql,
) -> rusqlite::Result<S::Position> {
    let count: i64 = match S::GROUP_COLUMN {
        Some(col) => conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", S::TABLE, col),
            [group],
            |row| row.get(0),
        )?,
        None => conn.query_row(&format!("SELECT COUNT(*) FROM {}", S::TABLE), [], |row| {
            row.get(0)
        })?,
    };
    Ok(S::Position::from(count))
}
