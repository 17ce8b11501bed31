//! Local SQLite-backed sheet store.
//!
//! Keeps written-back columns as individual cells keyed by
//! `(sheet, col, row)`. Every public method opens its own connection so the
//! caller never has to manage connection lifetime.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::errors::{TrackerError, TrackerResult};
use crate::store::schema;
use crate::store::SheetStore;

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if text == "~" || text.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut expanded = PathBuf::from(home);
            if text.len() > 2 {
                expanded.push(&text[2..]);
            }
            return expanded;
        }
    }
    path.to_path_buf()
}

/// Resolve `path` against the working directory and create its parent.
fn prepare_path(path: &Path) -> TrackerResult<PathBuf> {
    let expanded = expand_tilde(path);
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(&expanded)
    };
    if let Some(parent) = resolved.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(resolved)
}

/// Bookkeeping for one written-back column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnWrite {
    pub start_row: usize,
    pub cell_count: usize,
    /// SQLite `CURRENT_TIMESTAMP` text, UTC.
    pub written_at: String,
}

#[derive(Debug)]
pub struct SqliteSheetStore {
    db_path: PathBuf,
}

impl SqliteSheetStore {
    /// Open (creating if needed) the store at `db_path` and bring its schema
    /// up to date.
    pub fn open(db_path: impl AsRef<Path>) -> TrackerResult<Self> {
        let store = Self {
            db_path: prepare_path(db_path.as_ref())?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> TrackerResult<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    fn init_schema(&self) -> TrackerResult<()> {
        let conn = self.connect()?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        schema::init_schema(&conn)
    }

    /// Copy the whole store to `destination` using the SQLite backup API.
    /// Returns the resolved destination path.
    pub fn backup_to(&self, destination: impl AsRef<Path>) -> TrackerResult<PathBuf> {
        let resolved = prepare_path(destination.as_ref())?;
        let src_conn = self.connect()?;
        let mut dst_conn = Connection::open(&resolved)?;
        let backup = rusqlite::backup::Backup::new(&src_conn, &mut dst_conn)?;
        backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;
        Ok(resolved)
    }

    /// Where the last write-back of `column` landed, if there was one.
    pub fn last_write(&self, sheet: &str, column: usize) -> TrackerResult<Option<ColumnWrite>> {
        let conn = self.connect()?;
        let write = conn
            .query_row(
                "SELECT start_row, cell_count, written_at FROM column_writes \
                 WHERE sheet = ?1 AND col = ?2;",
                params![sheet, column as i64],
                |row| {
                    Ok(ColumnWrite {
                        start_row: row.get::<_, i64>(0)? as usize,
                        cell_count: row.get::<_, i64>(1)? as usize,
                        written_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(write)
    }

    /// Exactly the cells of the last write-back of `column`, or an empty
    /// vector when the column was never written.
    pub fn read_last_write(&self, sheet: &str, column: usize) -> TrackerResult<Vec<String>> {
        let Some(write) = self.last_write(sheet, column)? else {
            return Ok(Vec::new());
        };
        let mut values = self.read_column(sheet, column, write.start_row)?;
        values.resize(write.cell_count, String::new());
        Ok(values)
    }
}

impl SheetStore for SqliteSheetStore {
    fn write_column(
        &mut self,
        sheet: &str,
        column: usize,
        start_row: usize,
        values: &[String],
    ) -> TrackerResult<()> {
        if column == 0 || start_row == 0 {
            return Err(TrackerError::Store(format!(
                "cell addresses are 1-based (column {column}, row {start_row})"
            )));
        }
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cells (sheet, col, row, value) VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT(sheet, col, row) DO UPDATE SET value = excluded.value;",
            )?;
            for (offset, value) in values.iter().enumerate() {
                stmt.execute(params![
                    sheet,
                    column as i64,
                    (start_row + offset) as i64,
                    value
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO column_writes (sheet, col, start_row, cell_count) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(sheet, col) DO UPDATE SET \
                 start_row = excluded.start_row, \
                 cell_count = excluded.cell_count, \
                 written_at = CURRENT_TIMESTAMP;",
            params![sheet, column as i64, start_row as i64, values.len() as i64],
        )?;
        tx.commit()?;
        debug!(sheet, column, start_row, cells = values.len(), "column written");
        Ok(())
    }

    fn read_column(
        &self,
        sheet: &str,
        column: usize,
        start_row: usize,
    ) -> TrackerResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT row, value FROM cells \
             WHERE sheet = ?1 AND col = ?2 AND row >= ?3 \
             ORDER BY row;",
        )?;
        let rows = stmt.query_map(params![sheet, column as i64, start_row as i64], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values: Vec<String> = Vec::new();
        for row_result in rows {
            let (row, value) = row_result?;
            let slot = (row as usize).saturating_sub(start_row);
            if values.len() <= slot {
                values.resize(slot + 1, String::new());
            }
            values[slot] = value;
        }
        Ok(values)
    }
}
