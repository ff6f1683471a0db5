//! Typed view over loosely typed worksheet rows
//!
//! Worksheets may be edited by hand, so every read resolves which header
//! holds each ledger field and turns each row into an entry or a skip.

use chrono::{NaiveDate, NaiveDateTime};

use super::types::{CompletionEntry, SkipReason};
use crate::error::StoreError;
use crate::store::{Row, Sheet};
use crate::utils::{DATE_FORMAT, TIMESTAMP_FORMAT, Timezone, parse_date, parse_timestamp};

pub(crate) const NAME_COLUMN: &str = "name";
pub(crate) const COMPLETED_AT_COLUMN: &str = "completed_at";
pub(crate) const REGISTERED_DATE_COLUMN: &str = "registered_date";

pub(crate) const LEDGER_COLUMNS: [&str; 3] =
    [NAME_COLUMN, COMPLETED_AT_COLUMN, REGISTERED_DATE_COLUMN];

const NAME_ALIASES: &[&str] = &[NAME_COLUMN, "이름", "Name"];
const COMPLETED_AT_ALIASES: &[&str] = &[COMPLETED_AT_COLUMN, "완료시간", "완료 시간", "timestamp"];
const REGISTERED_DATE_ALIASES: &[&str] = &[REGISTERED_DATE_COLUMN, "등록일", "date"];

/// Header names a particular worksheet uses for the ledger fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    pub(crate) name: String,
    pub(crate) completed_at: String,
    /// `None` when the worksheet has no date column yet
    pub(crate) registered_date: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: NAME_COLUMN.to_string(),
            completed_at: COMPLETED_AT_COLUMN.to_string(),
            registered_date: Some(REGISTERED_DATE_COLUMN.to_string()),
        }
    }
}

fn find_column(sheet: &Sheet, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .find(|alias| sheet.has_column(alias))
        .map(|alias| alias.to_string())
}

impl ColumnMap {
    /// Validate column presence. An empty worksheet gets the default layout.
    pub(crate) fn resolve(sheet: &Sheet, worksheet: &str) -> Result<Self, StoreError> {
        if sheet.is_empty() {
            return Ok(Self::default());
        }
        let name = find_column(sheet, NAME_ALIASES).ok_or_else(|| StoreError::Schema {
            worksheet: worksheet.to_string(),
            missing: NAME_COLUMN,
        })?;
        let completed_at =
            find_column(sheet, COMPLETED_AT_ALIASES).ok_or_else(|| StoreError::Schema {
                worksheet: worksheet.to_string(),
                missing: COMPLETED_AT_COLUMN,
            })?;
        Ok(Self {
            name,
            completed_at,
            registered_date: find_column(sheet, REGISTERED_DATE_ALIASES),
        })
    }

    /// Make sure `sheet` has every column this map writes.
    pub(crate) fn apply_to(&mut self, sheet: &mut Sheet) {
        sheet.ensure_column(&self.name);
        sheet.ensure_column(&self.completed_at);
        let date_column = self
            .registered_date
            .get_or_insert_with(|| REGISTERED_DATE_COLUMN.to_string());
        sheet.ensure_column(date_column);
    }

    pub(crate) fn name_of<'r>(&self, row: &'r Row) -> Option<&'r str> {
        row.get(&self.name)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    pub(crate) fn to_row(&self, entry: &CompletionEntry) -> Row {
        let mut row = Row::new();
        row.insert(self.name.clone(), entry.name.clone());
        row.insert(
            self.completed_at.clone(),
            entry.completed_at.format(TIMESTAMP_FORMAT).to_string(),
        );
        if let Some(column) = &self.registered_date {
            row.insert(column.clone(), entry.date().format(DATE_FORMAT).to_string());
        }
        row
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    Entry(CompletionEntry),
    Skip(SkipReason),
}

pub(crate) fn parse_row(row: &Row, columns: &ColumnMap, timezone: Timezone) -> RowOutcome {
    let Some(name) = columns.name_of(row) else {
        return RowOutcome::Skip(SkipReason::MissingName);
    };
    let raw = match row.get(&columns.completed_at).map(|s| s.trim()) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return RowOutcome::Skip(SkipReason::MissingTimestamp),
    };
    match parse_timestamp(raw, timezone) {
        Some(completed_at) => RowOutcome::Entry(CompletionEntry::new(name, completed_at)),
        None => RowOutcome::Skip(SkipReason::BadTimestamp(raw.to_string())),
    }
}

/// The row's registered date, or `None` when missing or unreadable.
pub(crate) fn parse_registered_date(row: &Row, columns: &ColumnMap) -> Option<NaiveDate> {
    let column = columns.registered_date.as_ref()?;
    parse_date(row.get(column)?)
}

/// Calendar day a row belongs to: its registered date when readable,
/// otherwise the day of its completion time. `None` when neither parses.
pub(crate) fn row_date(row: &Row, columns: &ColumnMap, timezone: Timezone) -> Option<NaiveDate> {
    parse_registered_date(row, columns).or_else(|| {
        let raw = row.get(&columns.completed_at)?;
        parse_timestamp(raw.trim(), timezone).map(|ts| ts.date())
    })
}

/// Format a timestamp the way the store expects it.
pub(crate) fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
