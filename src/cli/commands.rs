//! CLI subcommand definitions
//!
//! One-shot subcommands plus the line commands understood by the
//! interactive board.

use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the board (default)
    View,
    /// Mark someone as done
    Record {
        /// Name as it should appear on the board
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Re-read the worksheet and report skipped rows
    Reload,
    /// Remove everything registered today (asks for confirmation)
    ClearToday {
        /// Confirm immediately instead of only arming the confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Create the worksheet with the ledger header if it is missing
    Init,
    /// Line-based session: type `help` for the commands
    Interactive,
}

/// Normalized command shared by the one-shot CLI and the interactive board
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BoardCommand {
    View,
    Record(String),
    Reload,
    ClearToday,
    CancelClear,
    Init,
    Help,
    Quit,
}

impl From<&Commands> for BoardCommand {
    fn from(cmd: &Commands) -> Self {
        match cmd {
            Commands::View | Commands::Interactive => BoardCommand::View,
            Commands::Record { name } => BoardCommand::Record(name.join(" ")),
            Commands::Reload => BoardCommand::Reload,
            Commands::ClearToday { .. } => BoardCommand::ClearToday,
            Commands::Init => BoardCommand::Init,
        }
    }
}

pub(crate) const INTERACTIVE_HELP: &str = "\
Commands:
  done <name>   mark <name> as done (alias: record, d)
  view          show the board (alias: v, ls)
  reload        re-read the worksheet (alias: r)
  clear         clear today's entries; run twice to confirm
  cancel        cancel a pending clear
  init          create the worksheet if missing
  help          show this help
  quit          leave (alias: exit, q)";

impl BoardCommand {
    /// Parse one line typed into the interactive board.
    pub(crate) fn parse_line(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_lowercase().as_str() {
            "" | "view" | "v" | "ls" => BoardCommand::View,
            "done" | "record" | "d" => BoardCommand::Record(rest.to_string()),
            "reload" | "r" => BoardCommand::Reload,
            "clear" | "clear-today" => BoardCommand::ClearToday,
            "cancel" => BoardCommand::CancelClear,
            "init" => BoardCommand::Init,
            "help" | "h" | "?" => BoardCommand::Help,
            "quit" | "exit" | "q" => BoardCommand::Quit,
            other => return Err(format!("Unknown command \"{other}\" (type `help`)")),
        };
        Ok(command)
    }
}
