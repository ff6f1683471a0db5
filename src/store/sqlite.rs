//! SQLite-backed worksheets.
//!
//! Cells are stored one per row so arbitrary headers survive a round trip.
//! The worksheet keeps its row count, so rows without any cells still exist.
//! A connection is opened per call; a locked or missing database surfaces
//! as a store error at the operation, not at startup.

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{Row, Sheet, TabularStore};
use crate::error::StoreError;
use crate::utils::debug_log;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS worksheets (
    name TEXT PRIMARY KEY,
    row_count INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS sheet_columns (
    worksheet TEXT NOT NULL,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (worksheet, position)
);
CREATE TABLE IF NOT EXISTS sheet_cells (
    worksheet TEXT NOT NULL,
    row_index INTEGER NOT NULL,
    column_name TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (worksheet, row_index, column_name)
);
";

#[derive(Debug, Clone)]
pub(crate) struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

impl TabularStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn read(&self, worksheet: &str) -> Result<Sheet, StoreError> {
        let conn = self.connect()?;
        let Some(row_count) = conn
            .query_row(
                "SELECT row_count FROM worksheets WHERE name = ?1",
                params![worksheet],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
        else {
            return Err(StoreError::missing_worksheet(worksheet));
        };

        let mut stmt = conn.prepare(
            "SELECT name FROM sheet_columns WHERE worksheet = ?1 ORDER BY position",
        )?;
        let columns = stmt
            .query_map(params![worksheet], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT row_index, column_name, value FROM sheet_cells
             WHERE worksheet = ?1 ORDER BY row_index",
        )?;
        let mut rows: BTreeMap<i64, Row> = (0..row_count).map(|i| (i, Row::new())).collect();
        let cells = stmt.query_map(params![worksheet], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for cell in cells {
            let (index, column, value) = cell?;
            rows.entry(index).or_default().insert(column, value);
        }

        debug_log(format!(
            "read {} rows from {}:{}",
            rows.len(),
            self.path.display(),
            worksheet
        ));
        Ok(Sheet {
            columns,
            rows: rows.into_values().collect(),
        })
    }

    fn update(&self, worksheet: &str, sheet: &Sheet) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO worksheets (name, row_count) VALUES (?1, ?2)",
            params![worksheet, sheet.rows.len() as i64],
        )?;
        tx.execute(
            "DELETE FROM sheet_columns WHERE worksheet = ?1",
            params![worksheet],
        )?;
        tx.execute(
            "DELETE FROM sheet_cells WHERE worksheet = ?1",
            params![worksheet],
        )?;
        {
            let mut insert_column = tx.prepare(
                "INSERT INTO sheet_columns (worksheet, position, name) VALUES (?1, ?2, ?3)",
            )?;
            for (position, name) in sheet.columns.iter().enumerate() {
                insert_column.execute(params![worksheet, position as i64, name])?;
            }
            let mut insert_cell = tx.prepare(
                "INSERT INTO sheet_cells (worksheet, row_index, column_name, value)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (index, row) in sheet.rows.iter().enumerate() {
                for (column, value) in row {
                    insert_cell.execute(params![worksheet, index as i64, column, value])?;
                }
            }
        }
        tx.commit()?;
        debug_log(format!(
            "wrote {} rows to {}:{}",
            sheet.rows.len(),
            self.path.display(),
            worksheet
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> Sheet {
        let mut sheet = Sheet::with_columns(["name", "completed_at", "registered_date"]);
        for (name, ts) in [("Alice", "2025-06-01 08:00:00"), ("Bob", "2025-06-02 09:30:00")] {
            let mut row = Row::new();
            row.insert("name".to_string(), name.to_string());
            row.insert("completed_at".to_string(), ts.to_string());
            row.insert("registered_date".to_string(), ts[..10].to_string());
            sheet.rows.push(row);
        }
        sheet
    }

    #[test]
    fn missing_worksheet_before_first_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("board.db"));
        assert!(matches!(
            store.read("Sheet1"),
            Err(StoreError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn update_then_read_preserves_order_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("nested").join("board.db"));
        let sheet = sample_sheet();
        store.update("Sheet1", &sheet).unwrap();
        assert_eq!(store.read("Sheet1").unwrap(), sheet);
    }

    #[test]
    fn update_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("board.db"));
        store.update("Sheet1", &sample_sheet()).unwrap();

        let empty = Sheet::with_columns(["name", "completed_at", "registered_date"]);
        store.update("Sheet1", &empty).unwrap();
        assert_eq!(store.read("Sheet1").unwrap(), empty);
    }

    #[test]
    fn rows_without_cells_keep_their_position() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("board.db"));
        let mut sheet = sample_sheet();
        sheet.rows.insert(1, Row::new());
        sheet.rows.push(Row::new());
        store.update("Sheet1", &sheet).unwrap();

        let read = store.read("Sheet1").unwrap();
        assert_eq!(read.rows.len(), 4);
        assert_eq!(read, sheet);
    }

    #[test]
    fn worksheets_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("board.db"));
        store.update("Sheet1", &sample_sheet()).unwrap();
        store.update("Sheet2", &Sheet::with_columns(["name"])).unwrap();
        assert_eq!(store.read("Sheet1").unwrap().rows.len(), 2);
        assert!(store.read("Sheet2").unwrap().rows.is_empty());
    }
}
