//! External tabular store abstraction
//!
//! The ledger's system of record is a spreadsheet-like store addressed by
//! worksheet name. Each backend implements the `TabularStore` trait; the only
//! mutation primitive is a full overwrite, so callers read-modify-write.

pub(crate) mod csv;
pub(crate) mod http;
pub(crate) mod memory;
pub(crate) mod registry;
pub(crate) mod sqlite;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::StoreError;

/// One loosely typed row: column name to cell text. Absent keys are empty cells.
pub(crate) type Row = BTreeMap<String, String>;

/// A worksheet snapshot: header order plus rows.
/// Serializes to the `{"columns": [...], "rows": [...]}` shape the http
/// store sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Sheet {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Row>,
}

impl Sheet {
    pub(crate) fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Append `name` to the header unless it is already there.
    pub(crate) fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    pub(crate) fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Add any row keys missing from the header, in sorted order.
    pub(crate) fn absorb_row_keys(&mut self) {
        let mut extra: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !self.has_column(key) && !extra.contains(key) {
                    extra.push(key.clone());
                }
            }
        }
        extra.sort();
        self.columns.extend(extra);
    }
}

/// Spreadsheet-like store. `update` replaces the worksheet's entire content.
pub(crate) trait TabularStore {
    /// Short backend name for messages
    fn name(&self) -> &'static str;

    fn read(&self, worksheet: &str) -> Result<Sheet, StoreError>;

    fn update(&self, worksheet: &str, sheet: &Sheet) -> Result<(), StoreError>;
}

pub(crate) type BoxedStore = Box<dyn TabularStore>;

pub(crate) use registry::{StoreKind, StoreSettings, open_store};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_column_is_idempotent() {
        let mut sheet = Sheet::with_columns(["name"]);
        sheet.ensure_column("name");
        sheet.ensure_column("completed_at");
        assert_eq!(sheet.columns, vec!["name", "completed_at"]);
    }

    #[test]
    fn absorb_row_keys_appends_unknown_keys_sorted() {
        let mut sheet = Sheet::with_columns(["name"]);
        let mut row = Row::new();
        row.insert("name".to_string(), "Alice".to_string());
        row.insert("zeta".to_string(), "1".to_string());
        row.insert("alpha".to_string(), "2".to_string());
        sheet.rows.push(row);
        sheet.absorb_row_keys();
        assert_eq!(sheet.columns, vec!["name", "alpha", "zeta"]);
    }

    #[test]
    fn empty_sheet_detection() {
        assert!(Sheet::default().is_empty());
        assert!(!Sheet::with_columns(["name"]).is_empty());
    }
}
