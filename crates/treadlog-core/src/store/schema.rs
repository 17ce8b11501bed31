//! SQLite layout for the local sheet store.

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{TrackerError, TrackerResult};

/// Layout version stamped into `store_meta`. A store carrying any other
/// value is refused rather than guessed at.
pub const LAYOUT_VERSION: i32 = 1;

/// DDL statements, safe to replay on an initialised database.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS store_meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );",
    "CREATE TABLE IF NOT EXISTS cells (
        sheet TEXT NOT NULL,
        col INTEGER NOT NULL,
        row INTEGER NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(sheet, col, row)
    );",
    // One row per written-back column: where the last write started and how
    // many cells it covered.
    "CREATE TABLE IF NOT EXISTS column_writes (
        sheet TEXT NOT NULL,
        col INTEGER NOT NULL,
        start_row INTEGER NOT NULL,
        cell_count INTEGER NOT NULL,
        written_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY(sheet, col)
    );",
];

/// Create the tables on a new store, or check the stamp on an existing one.
pub fn init_schema(conn: &Connection) -> TrackerResult<()> {
    for stmt in SCHEMA_STATEMENTS {
        conn.execute_batch(stmt)?;
    }
    match layout_version(conn)? {
        None => {
            conn.execute(
                "INSERT INTO store_meta(key, value) VALUES('layout_version', ?1);",
                params![LAYOUT_VERSION.to_string()],
            )?;
        }
        Some(LAYOUT_VERSION) => {}
        Some(other) => {
            return Err(TrackerError::Store(format!(
                "store layout version {other} is not supported (expected {LAYOUT_VERSION})"
            )))
        }
    }
    Ok(())
}

/// The stamped layout version, `None` on a store that was never stamped.
pub fn layout_version(conn: &Connection) -> TrackerResult<Option<i32>> {
    let text: Option<String> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = 'layout_version';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    text.map(|t| {
        t.parse::<i32>()
            .map_err(|_| TrackerError::Store(format!("unreadable store layout version {t:?}")))
    })
    .transpose()
}
