//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::ledger::ConsistencyMode;
use crate::store::{StoreKind, StoreSettings};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first (default)
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "doneboard")]
#[command(about = "Completion board: record who is done, mirrored to a shared spreadsheet", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Store backend
    #[arg(long, global = true, value_enum)]
    pub(crate) store: Option<StoreKind>,

    /// CSV directory or SQLite file (defaults: ./doneboard-data, ./doneboard.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) path: Option<PathBuf>,

    /// Base URL of the remote spreadsheet endpoint (http store)
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) url: Option<String>,

    /// Bearer token for the http store
    #[arg(long, global = true, value_name = "TOKEN")]
    pub(crate) token: Option<String>,

    /// Worksheet to use (default: Sheet1)
    #[arg(short, long, global = true, value_name = "NAME")]
    pub(crate) worksheet: Option<String>,

    /// Timezone for stamping entries and deciding "today" (e.g., "Asia/Seoul", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Sort order for the board
    #[arg(short, long, global = true, value_enum, default_value = "desc")]
    pub(crate) order: SortOrder,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Output as CSV
    #[arg(long, global = true, conflicts_with = "json")]
    pub(crate) csv: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// strftime pattern for displaying completion times
    #[arg(long, global = true, value_name = "FORMAT")]
    pub(crate) timestamp_format: Option<String>,

    /// Also check the store for the name right before writing
    #[arg(long, global = true)]
    pub(crate) store_checked: bool,

    /// Enable debug output (store timings, skipped rows)
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.store_checked && config.store_checked {
            self.store_checked = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // Enum values: config only applies if CLI is at its default
        if self.store.is_none()
            && let Some(ref store) = config.store
        {
            match StoreKind::from_str(store, true) {
                Ok(kind) => self.store = Some(kind),
                Err(_) => eprintln!("Warning: unknown store \"{store}\" in config, using csv"),
            }
        }
        if let Some(ref order) = config.order
            && self.order == SortOrder::Desc
            && order.eq_ignore_ascii_case("asc")
        {
            self.order = SortOrder::Asc;
        }
        if let Some(ref color) = config.color
            && self.color == ColorMode::Auto
        {
            match color.to_lowercase().as_str() {
                "always" => self.color = ColorMode::Always,
                "never" => self.color = ColorMode::Never,
                _ => {}
            }
        }

        // String options: only apply if CLI didn't set them
        if self.path.is_none() {
            self.path = config.path.clone();
        }
        if self.url.is_none() {
            self.url = config.url.clone();
        }
        if self.token.is_none() {
            self.token = config.token.clone();
        }
        if self.worksheet.is_none() {
            self.worksheet = config.worksheet.clone();
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.timestamp_format.is_none() {
            self.timestamp_format = config.timestamp_format.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            kind: self.store.unwrap_or_default(),
            path: self.path.clone(),
            url: self.url.clone(),
            token: self.token.clone(),
        }
    }

    pub(crate) fn consistency(&self) -> ConsistencyMode {
        if self.store_checked {
            ConsistencyMode::StoreChecked
        } else {
            ConsistencyMode::Weak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["doneboard"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_flags_win_over_config() {
        let config = Config::parse(
            r#"
store = "sqlite"
worksheet = "Config"
order = "asc"
color = "always"
"#,
        )
        .unwrap();
        let cli = parse(&["--store", "csv", "-w", "Cli", "--color", "never"]).with_config(&config);
        assert_eq!(cli.store, Some(StoreKind::Csv));
        assert_eq!(cli.worksheet.as_deref(), Some("Cli"));
        assert_eq!(cli.color, ColorMode::Never);
        assert_eq!(cli.order, SortOrder::Asc);
    }

    #[test]
    fn config_fills_unset_values() {
        let config = Config::parse(
            r#"
store = "http"
url = "https://sheets.example.com/api"
store_checked = true
timezone = "Asia/Seoul"
"#,
        )
        .unwrap();
        let cli = parse(&[]).with_config(&config);
        let settings = cli.store_settings();
        assert_eq!(settings.kind, StoreKind::Http);
        assert_eq!(settings.url.as_deref(), Some("https://sheets.example.com/api"));
        assert_eq!(cli.consistency(), ConsistencyMode::StoreChecked);
        assert_eq!(cli.timezone.as_deref(), Some("Asia/Seoul"));
    }

    #[test]
    fn unknown_store_in_config_falls_back_to_default() {
        let config = Config::parse("store = \"parquet\"").unwrap();
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.store_settings().kind, StoreKind::Csv);
    }

    #[test]
    fn no_color_overrides_always() {
        let cli = parse(&["--color", "always", "--no-color"]);
        assert!(!cli.use_color());
        assert!(parse(&["--color", "always"]).use_color());
    }

    #[test]
    fn json_and_csv_conflict() {
        assert!(Cli::try_parse_from(["doneboard", "--json", "--csv"]).is_err());
    }
}
