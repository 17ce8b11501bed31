//! Boundary to the external spreadsheet store.
//!
//! The engine never fetches sheets itself; it is handed an already
//! materialised [`Table`](crate::models::Table). Writes go back through a
//! [`SheetStore`] handle, one whole column at a time.

pub mod schema;
pub mod sqlite;

use crate::errors::TrackerResult;

pub use sqlite::{ColumnWrite, SqliteSheetStore};

/// A writable spreadsheet backend.
///
/// Columns are 1-based and `start_row` is the 1-based sheet row the first
/// value lands in. Failures are returned unchanged; callers get no retries.
pub trait SheetStore {
    fn write_column(
        &mut self,
        sheet: &str,
        column: usize,
        start_row: usize,
        values: &[String],
    ) -> TrackerResult<()>;

    /// Read back a column from `start_row` down to the last stored cell.
    fn read_column(&self, sheet: &str, column: usize, start_row: usize)
        -> TrackerResult<Vec<String>>;
}
