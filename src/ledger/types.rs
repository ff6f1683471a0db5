//! Ledger data types

use chrono::{NaiveDate, NaiveDateTime};

/// One recorded "done" event. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompletionEntry {
    pub(crate) name: String,
    pub(crate) completed_at: NaiveDateTime,
}

impl CompletionEntry {
    pub(crate) fn new(name: impl Into<String>, completed_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            completed_at,
        }
    }

    pub(crate) fn date(&self) -> NaiveDate {
        self.completed_at.date()
    }
}

/// How strongly a successful `record` guarantees uniqueness in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Consistency {
    /// Checked only against this session's cached view; another session may
    /// have written the same name concurrently.
    DuplicatePossible,
    /// Also checked against the store right before writing. Still not atomic.
    StoreChecked,
}

/// Duplicate detection strategy for `record`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum ConsistencyMode {
    /// In-memory check only
    #[default]
    Weak,
    /// In-memory check plus a scan of the freshly read sheet
    StoreChecked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordReceipt {
    pub(crate) entry: CompletionEntry,
    pub(crate) consistency: Consistency,
}

/// Why a stored row could not become an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SkipReason {
    MissingName,
    MissingTimestamp,
    BadTimestamp(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingName => write!(f, "no name"),
            SkipReason::MissingTimestamp => write!(f, "no completion time"),
            SkipReason::BadTimestamp(raw) => write!(f, "unreadable completion time \"{raw}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkippedRow {
    /// 1-based position among the worksheet's data rows
    pub(crate) row_number: usize,
    pub(crate) reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ReloadReport {
    pub(crate) loaded: usize,
    pub(crate) skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClearOutcome {
    /// First call: confirmation armed, nothing deleted.
    Armed,
    Cleared {
        removed: usize,
        /// Rows kept because their date could not be read
        retained_undated: usize,
    },
}

/// Sorted snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LedgerView {
    /// Newest first
    pub(crate) entries: Vec<CompletionEntry>,
    pub(crate) total: usize,
    pub(crate) today: usize,
    pub(crate) today_date: NaiveDate,
    pub(crate) last_sync: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_date_is_calendar_day() {
        let at = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let entry = CompletionEntry::new("Alice", at);
        assert_eq!(entry.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::BadTimestamp("soon".to_string()).to_string(),
            r#"unreadable completion time "soon""#
        );
        assert_eq!(SkipReason::MissingName.to_string(), "no name");
    }
}
