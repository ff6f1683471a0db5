//! Store backend registry
//!
//! Maps a backend name (or alias) from the command line or config file to a
//! constructed `TabularStore`.

use clap::ValueEnum;
use std::path::PathBuf;

use super::csv::CsvStore;
use super::http::HttpStore;
use super::memory::MemoryStore;
use super::sqlite::SqliteStore;
use super::{BoxedStore, Sheet};
use crate::error::AppError;

const DEFAULT_CSV_DIR: &str = "doneboard-data";
const DEFAULT_SQLITE_FILE: &str = "doneboard.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum StoreKind {
    /// Directory of CSV files, one per worksheet (default)
    #[default]
    Csv,
    /// SQLite database file
    #[value(alias = "sqlite3", alias = "db")]
    Sqlite,
    /// Remote spreadsheet endpoint
    #[value(alias = "remote", alias = "sheets")]
    Http,
    /// Throwaway in-process store
    Memory,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreSettings {
    pub(crate) kind: StoreKind,
    pub(crate) path: Option<PathBuf>,
    pub(crate) url: Option<String>,
    pub(crate) token: Option<String>,
}

impl StoreSettings {
    /// Backend location with the per-backend default filled in.
    pub(crate) fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match self.kind {
            StoreKind::Sqlite => PathBuf::from(DEFAULT_SQLITE_FILE),
            _ => PathBuf::from(DEFAULT_CSV_DIR),
        })
    }

    /// Human-readable location for messages
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            StoreKind::Http => self.url.clone().unwrap_or_default(),
            StoreKind::Memory => "memory".to_string(),
            _ => self.resolved_path().display().to_string(),
        }
    }
}

/// Build the configured backend. The memory backend starts with `worksheet`
/// already present and empty, so one-shot commands can write to it.
pub(crate) fn open_store(settings: &StoreSettings, worksheet: &str) -> Result<BoxedStore, AppError> {
    let store: BoxedStore = match settings.kind {
        StoreKind::Csv => Box::new(CsvStore::new(settings.resolved_path())),
        StoreKind::Sqlite => Box::new(SqliteStore::new(settings.resolved_path())),
        StoreKind::Http => {
            let url = settings
                .url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(AppError::MissingStoreUrl)?;
            Box::new(HttpStore::new(url, settings.token.clone()))
        }
        StoreKind::Memory => Box::new(MemoryStore::with_sheet(worksheet, Sheet::default())),
    };
    Ok(store)
}
