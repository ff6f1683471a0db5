//! Per-session completion ledger
//!
//! A `LedgerSession` caches the worksheet's entries for one interactive
//! session. The store stays authoritative: every mutation is a
//! read-modify-write of the whole worksheet, and the cache only changes after
//! the store accepted the write. Sessions never coordinate with each other, so
//! two stale sessions can both record the same name (see `Consistency`).

use chrono::NaiveDateTime;

use super::clock::Clock;
use super::row::{ColumnMap, LEDGER_COLUMNS, RowOutcome, parse_row, row_date};
use super::types::{
    ClearOutcome, CompletionEntry, Consistency, ConsistencyMode, LedgerView, RecordReceipt,
    ReloadReport, SkippedRow,
};
use crate::error::{LedgerError, StoreError};
use crate::store::{Sheet, TabularStore};
use crate::utils::{Timezone, debug_log};

pub(crate) const DEFAULT_WORKSHEET: &str = "Sheet1";

#[derive(Debug, Clone)]
pub(crate) struct SessionOptions {
    pub(crate) worksheet: String,
    pub(crate) timezone: Timezone,
    pub(crate) consistency: ConsistencyMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            worksheet: DEFAULT_WORKSHEET.to_string(),
            timezone: Timezone::Local,
            consistency: ConsistencyMode::default(),
        }
    }
}

pub(crate) struct LedgerSession<'s> {
    store: &'s dyn TabularStore,
    clock: &'s dyn Clock,
    options: SessionOptions,
    entries: Vec<CompletionEntry>,
    last_sync: Option<NaiveDateTime>,
    clear_armed: bool,
    warnings: Vec<String>,
}

impl<'s> LedgerSession<'s> {
    /// Session with an empty cache. Nothing is read until `reload`.
    pub(crate) fn new(
        store: &'s dyn TabularStore,
        clock: &'s dyn Clock,
        options: SessionOptions,
    ) -> Self {
        Self {
            store,
            clock,
            options,
            entries: Vec::new(),
            last_sync: None,
            clear_armed: false,
            warnings: Vec::new(),
        }
    }

    /// Session populated from the store. A failed load leaves the view empty
    /// and queues a warning instead of failing.
    pub(crate) fn open(
        store: &'s dyn TabularStore,
        clock: &'s dyn Clock,
        options: SessionOptions,
    ) -> Self {
        let mut session = Self::new(store, clock, options);
        if let Err(e) = session.reload() {
            session.warn(format!("Showing an empty board: {e}"));
        }
        session
    }

    pub(crate) fn worksheet(&self) -> &str {
        &self.options.worksheet
    }

    pub(crate) fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub(crate) fn is_clear_armed(&self) -> bool {
        self.clear_armed
    }

    /// Warnings queued since the last call, oldest first.
    pub(crate) fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn warn(&mut self, message: String) {
        debug_log(format!("warning: {message}"));
        self.warnings.push(message);
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    fn read_sheet(&self) -> Result<(Sheet, ColumnMap), StoreError> {
        let sheet = self.store.read(&self.options.worksheet)?;
        let columns = ColumnMap::resolve(&sheet, &self.options.worksheet)?;
        Ok((sheet, columns))
    }

    /// Replace the cache with the parsed rows of `sheet`.
    fn replace_from(&mut self, sheet: &Sheet, columns: &ColumnMap) -> ReloadReport {
        let mut report = ReloadReport::default();
        let mut entries = Vec::with_capacity(sheet.rows.len());
        for (index, row) in sheet.rows.iter().enumerate() {
            match parse_row(row, columns, self.options.timezone) {
                RowOutcome::Entry(entry) => entries.push(entry),
                RowOutcome::Skip(reason) => report.skipped.push(SkippedRow {
                    row_number: index + 1,
                    reason,
                }),
            }
        }
        report.loaded = entries.len();
        self.entries = entries;
        self.last_sync = Some(self.clock.now());

        for skipped in report.skipped.clone() {
            self.warn(format!(
                "Skipped row {} of {}: {}",
                skipped.row_number, self.options.worksheet, skipped.reason
            ));
        }
        report
    }

    /// Re-read the whole worksheet. On failure the previous view is kept.
    pub(crate) fn reload(&mut self) -> Result<ReloadReport, LedgerError> {
        let (sheet, columns) = self.read_sheet()?;
        let report = self.replace_from(&sheet, &columns);
        debug_log(format!(
            "reloaded {} entries from {} ({} skipped)",
            report.loaded,
            self.store.name(),
            report.skipped.len()
        ));
        Ok(report)
    }

    /// Mark `raw_name` as done. The cache only grows once the store write
    /// succeeded, so a failed call can simply be retried.
    pub(crate) fn record(&mut self, raw_name: &str) -> Result<RecordReceipt, LedgerError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation);
        }
        if self.contains(name) {
            return Err(LedgerError::Duplicate {
                name: name.to_string(),
            });
        }

        let (mut sheet, mut columns) = self.read_sheet()?;
        let consistency = match self.options.consistency {
            ConsistencyMode::Weak => Consistency::DuplicatePossible,
            ConsistencyMode::StoreChecked => {
                if sheet.rows.iter().any(|row| columns.name_of(row) == Some(name)) {
                    self.replace_from(&sheet, &columns);
                    return Err(LedgerError::Duplicate {
                        name: name.to_string(),
                    });
                }
                Consistency::StoreChecked
            }
        };

        let entry = CompletionEntry::new(name, self.clock.now());
        columns.apply_to(&mut sheet);
        sheet.rows.push(columns.to_row(&entry));
        self.store.update(&self.options.worksheet, &sheet)?;

        debug_log(format!(
            "recorded {:?} in {} ({} rows)",
            entry.name,
            self.options.worksheet,
            sheet.rows.len()
        ));
        self.last_sync = Some(entry.completed_at);
        self.entries.push(entry.clone());
        Ok(RecordReceipt { entry, consistency })
    }

    /// Two-step removal of everything registered today. The first call only
    /// arms the confirmation; the second deletes. A row's day is its
    /// registered date, or its completion day when that column is absent or
    /// unreadable. The cache is rebuilt from the sheet left in the store.
    pub(crate) fn clear_today(&mut self) -> Result<ClearOutcome, LedgerError> {
        if !self.clear_armed {
            self.clear_armed = true;
            return Ok(ClearOutcome::Armed);
        }

        let today = self.clock.today();
        let (mut sheet, columns) = self.read_sheet()?;
        let before = sheet.rows.len();
        let timezone = self.options.timezone;
        let mut retained_undated = 0;
        sheet
            .rows
            .retain(|row| match row_date(row, &columns, timezone) {
                Some(date) => date != today,
                None => {
                    retained_undated += 1;
                    true
                }
            });
        let removed = before - sheet.rows.len();
        if removed > 0 {
            self.store.update(&self.options.worksheet, &sheet)?;
        }

        self.replace_from(&sheet, &columns);
        self.clear_armed = false;
        if retained_undated > 0 {
            self.warn(format!(
                "Kept {retained_undated} row(s) in {} whose date could not be read",
                self.options.worksheet
            ));
        }
        Ok(ClearOutcome::Cleared {
            removed,
            retained_undated,
        })
    }

    /// Disarm a pending `clear_today` confirmation.
    pub(crate) fn cancel_clear(&mut self) -> bool {
        std::mem::replace(&mut self.clear_armed, false)
    }

    /// Create the worksheet with the ledger header if it does not exist yet.
    /// Returns `true` when a worksheet was created.
    pub(crate) fn initialize(&mut self) -> Result<bool, LedgerError> {
        match self.read_sheet() {
            Ok(_) => Ok(false),
            Err(StoreError::MissingWorksheet { .. }) => {
                let sheet = Sheet::with_columns(LEDGER_COLUMNS);
                self.store.update(&self.options.worksheet, &sheet)?;
                self.entries.clear();
                self.last_sync = Some(self.clock.now());
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sorted snapshot with today's and total counts. Does not touch the store.
    pub(crate) fn render_view(&self) -> LedgerView {
        let today_date = self.clock.today();
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        let today = entries.iter().filter(|e| e.date() == today_date).count();
        LedgerView {
            total: entries.len(),
            today,
            today_date,
            last_sync: self.last_sync,
            entries,
        }
    }
}
