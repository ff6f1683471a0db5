//! User-facing messages: successes, warnings and the cheer line

use crate::error::LedgerError;
use crate::ledger::{ClearOutcome, LedgerView, RecordReceipt};

const CHEER_EMOJIS: [&str; 13] = [
    "😊", "🥳", "🤩", "👍", "💯", "💖", "🌟", "🎈", "🚀", "🏆", "👏", "✨", "🌈",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) kind: NoticeKind,
    pub(crate) text: String,
}

impl Notice {
    pub(crate) fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub(crate) fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub(crate) fn recorded(receipt: &RecordReceipt) -> Self {
        Self::success(format!(
            "🎉 {}, great job! You're marked as done! 🎉",
            receipt.entry.name
        ))
    }

    pub(crate) fn cleared(outcome: ClearOutcome) -> Self {
        match outcome {
            ClearOutcome::Armed => Self::warning(
                "This removes every entry registered today. Run clear again to confirm.",
            ),
            ClearOutcome::Cleared { removed: 0, .. } => {
                Self::info("Nothing was registered today.")
            }
            ClearOutcome::Cleared {
                removed,
                retained_undated: 0,
            } => Self::success(format!("Cleared {removed} entr{} from today.", plural_y(removed))),
            ClearOutcome::Cleared {
                removed,
                retained_undated,
            } => Self::success(format!(
                "Cleared {removed} entr{} from today ({retained_undated} undated kept).",
                plural_y(removed)
            )),
        }
    }

    /// Turn a rejected ledger operation into the message the board shows.
    pub(crate) fn from_error(err: &LedgerError, store_name: &str) -> Self {
        match err {
            LedgerError::Validation => Self::warning("Please enter a name. 👇"),
            LedgerError::Duplicate { name } => {
                Self::warning(format!("Oops, {name} is already marked as done! 😊"))
            }
            LedgerError::StoreUnavailable(e) => Self::warning(format!(
                "Could not reach the {store_name} store ({e}). Nothing was changed; try again or reload."
            )),
        }
    }

    pub(crate) fn render(&self, use_color: bool) -> String {
        let (label, color) = match self.kind {
            NoticeKind::Success => ("", "\x1b[32m"),
            NoticeKind::Info => ("", "\x1b[34m"),
            NoticeKind::Warning => ("Warning: ", "\x1b[33m"),
        };
        if use_color {
            format!("{color}{label}{}\x1b[0m", self.text)
        } else {
            format!("{label}{}", self.text)
        }
    }
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

/// Emoji picked from the name, so the same person always gets the same one.
pub(crate) fn cheer_emoji(name: &str) -> &'static str {
    let hash = name
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    CHEER_EMOJIS[hash as usize % CHEER_EMOJIS.len()]
}

/// "Great work, everyone! Alice 🎉 Bob 🌟" or `None` for an empty board.
pub(crate) fn cheer_line(view: &LedgerView) -> Option<String> {
    if view.entries.is_empty() {
        return None;
    }
    let parts: Vec<String> = view
        .entries
        .iter()
        .rev()
        .map(|e| format!("{} {}", e.name, cheer_emoji(&e.name)))
        .collect();
    Some(format!("Great work, everyone! {}", parts.join(" ")))
}

pub(crate) const EMPTY_BOARD: &str = "Nobody has finished yet. Be the first! 🚀";
