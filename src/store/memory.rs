//! In-process store. Sessions that borrow the same `MemoryStore` see each
//! other's writes, which makes it the stand-in for a shared spreadsheet.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{Sheet, TabularStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    sheets: RefCell<HashMap<String, Sheet>>,
    fail_next: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_sheet(worksheet: &str, sheet: Sheet) -> Self {
        let store = Self::new();
        store.sheets.borrow_mut().insert(worksheet.to_string(), sheet);
        store
    }

    #[cfg(test)]
    /// Make the next read or update fail as if the connection dropped.
    pub(crate) fn fail_next(&self) {
        self.fail_next.set(true);
    }

    #[cfg(test)]
    /// Number of successful updates so far.
    pub(crate) fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn check_connection(&self) -> Result<(), StoreError> {
        if self.fail_next.replace(false) {
            return Err(StoreError::Payload("connection reset".to_string()));
        }
        Ok(())
    }
}

impl TabularStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, worksheet: &str) -> Result<Sheet, StoreError> {
        self.check_connection()?;
        self.sheets
            .borrow()
            .get(worksheet)
            .cloned()
            .ok_or_else(|| StoreError::missing_worksheet(worksheet))
    }

    fn update(&self, worksheet: &str, sheet: &Sheet) -> Result<(), StoreError> {
        self.check_connection()?;
        self.sheets
            .borrow_mut()
            .insert(worksheet.to_string(), sheet.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_worksheet_is_reported() {
        let store = MemoryStore::new();
        let err = store.read("Sheet1").unwrap_err();
        assert!(matches!(err, StoreError::MissingWorksheet { .. }));
    }

    #[test]
    fn update_then_read_returns_same_sheet() {
        let store = MemoryStore::new();
        let sheet = Sheet::with_columns(["name", "completed_at"]);
        store.update("Sheet1", &sheet).unwrap();
        assert_eq!(store.read("Sheet1").unwrap(), sheet);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn fail_next_only_affects_one_call() {
        let store = MemoryStore::with_sheet("Sheet1", Sheet::default());
        store.fail_next();
        assert!(store.read("Sheet1").is_err());
        assert!(store.read("Sheet1").is_ok());
    }
}
