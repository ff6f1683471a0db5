use std::path::PathBuf;

use thiserror::Error;

/// Command-line and configuration problems. These are the only errors that
/// end the process with a non-zero status.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Invalid timestamp format \"{input}\"")]
    InvalidTimestampFormat { input: String },

    #[error("The http store needs --url (or `url` in the config file)")]
    MissingStoreUrl,

    #[error("Worksheet name must not be empty")]
    EmptyWorksheet,
}

/// Failures talking to the external tabular store.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV at line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("Invalid JSON from store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected store payload: {0}")]
    Payload(String),

    #[error("Worksheet \"{worksheet}\" not found")]
    MissingWorksheet { worksheet: String },

    #[error("Worksheet \"{worksheet}\" has no \"{missing}\" column")]
    Schema {
        worksheet: String,
        missing: &'static str,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_worksheet(worksheet: &str) -> Self {
        StoreError::MissingWorksheet {
            worksheet: worksheet.to_string(),
        }
    }
}

/// Outcome of a rejected ledger operation. Every variant is recoverable: the
/// board turns it into a warning and keeps running.
#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    #[error("Please enter a name")]
    Validation,

    #[error("\"{name}\" is already marked as done")]
    Duplicate { name: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_timezone() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn store_error_display_schema() {
        let e = StoreError::Schema {
            worksheet: "Sheet1".to_string(),
            missing: "name",
        };
        assert_eq!(e.to_string(), r#"Worksheet "Sheet1" has no "name" column"#);
    }

    #[test]
    fn store_error_display_io_includes_path() {
        let e = StoreError::io(
            "/tmp/board/Sheet1.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = e.to_string();
        assert!(text.contains("/tmp/board/Sheet1.csv"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn ledger_error_duplicate_names_the_person() {
        let e = LedgerError::Duplicate {
            name: "Alice".to_string(),
        };
        assert_eq!(e.to_string(), r#""Alice" is already marked as done"#);
    }

    #[test]
    fn ledger_error_from_store_error() {
        let store = StoreError::missing_worksheet("Sheet1");
        let e: LedgerError = store.into();
        assert_eq!(
            e.to_string(),
            r#"Store unavailable: Worksheet "Sheet1" not found"#
        );
    }
}
