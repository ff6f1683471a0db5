//! Completion ledger - who finished, when, mirrored to the tabular store

mod clock;
mod row;
mod session;
mod types;

#[cfg(test)]
pub(crate) use clock::FixedClock;
pub(crate) use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use row::LEDGER_COLUMNS;
pub(crate) use row::format_timestamp;
pub(crate) use session::{DEFAULT_WORKSHEET, LedgerSession, SessionOptions};
pub(crate) use types::{
    ClearOutcome, CompletionEntry, Consistency, ConsistencyMode, LedgerView, RecordReceipt,
    ReloadReport,
};
