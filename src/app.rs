//! Presentation layer: turns CLI commands into ledger calls and prints the
//! results. Every ledger failure ends up as a warning line; only bad
//! arguments or config abort the process.

use std::io::{self, BufRead, Write};

use crate::cli::{BoardCommand, Cli, Commands, INTERACTIVE_HELP, SortOrder};
use crate::error::AppError;
use crate::ledger::{
    ClearOutcome, Clock, Consistency, DEFAULT_WORKSHEET, LedgerSession, SessionOptions,
    SystemClock,
};
use crate::output::{
    DisplayOptions, Notice, NoticeKind, output_view_csv, output_view_json, print_board,
    reload_json, view_json,
};
use crate::store::{TabularStore, open_store};
use crate::utils::{TIMESTAMP_FORMAT, Timezone, debug_log, is_valid_format};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub(crate) struct CommandContext {
    pub(crate) order: SortOrder,
    pub(crate) format: OutputFormat,
    pub(crate) display: DisplayOptions,
}

impl CommandContext {
    fn machine_output(&self) -> bool {
        self.format != OutputFormat::Table
    }
}

/// One user's session on the board.
pub(crate) struct Board<'s> {
    session: LedgerSession<'s>,
    ctx: &'s CommandContext,
}

impl<'s> Board<'s> {
    pub(crate) fn new(session: LedgerSession<'s>, ctx: &'s CommandContext) -> Self {
        let mut board = Self { session, ctx };
        board.flush_warnings();
        board
    }

    fn notify(&self, notice: &Notice) {
        if self.ctx.machine_output() || notice.kind == NoticeKind::Warning {
            eprintln!("{}", notice.render(self.ctx.display.use_color));
        } else {
            println!("{}", notice.render(self.ctx.display.use_color));
        }
    }

    fn flush_warnings(&mut self) {
        for warning in self.session.take_warnings() {
            self.notify(&Notice::warning(warning));
        }
    }

    fn show(&self) {
        let view = self.session.render_view();
        let worksheet = self.session.worksheet();
        match self.ctx.format {
            OutputFormat::Json => println!("{}", output_view_json(&view, worksheet, self.ctx.order)),
            OutputFormat::Csv => print!("{}", output_view_csv(&view, self.ctx.order, &self.ctx.display)),
            OutputFormat::Table => print_board(&view, worksheet, self.ctx.order, &self.ctx.display),
        }
    }

    /// Run one command. Returns `false` when the user asked to leave.
    pub(crate) fn execute(&mut self, command: BoardCommand) -> bool {
        let store_name = self.session.store_name();
        match command {
            BoardCommand::View => self.show(),
            BoardCommand::Record(name) => {
                match self.session.record(&name) {
                    Ok(receipt) => {
                        if receipt.consistency == Consistency::DuplicatePossible {
                            debug_log("recorded without a store-side duplicate check");
                        }
                        self.notify(&Notice::recorded(&receipt));
                    }
                    Err(e) => self.notify(&Notice::from_error(&e, store_name)),
                }
                self.flush_warnings();
                self.show();
            }
            BoardCommand::Reload => match self.session.reload() {
                Ok(report) => {
                    self.flush_warnings();
                    if self.ctx.format == OutputFormat::Json {
                        let mut value = view_json(
                            &self.session.render_view(),
                            self.session.worksheet(),
                            self.ctx.order,
                        );
                        value["reload"] = reload_json(&report);
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&value).unwrap_or_default()
                        );
                    } else {
                        self.notify(&Notice::info(format!(
                            "Reloaded {} entries ({} skipped).",
                            report.loaded,
                            report.skipped.len()
                        )));
                        self.show();
                    }
                }
                Err(e) => {
                    self.notify(&Notice::from_error(&e, store_name));
                    self.show();
                }
            },
            BoardCommand::ClearToday => {
                match self.session.clear_today() {
                    Ok(outcome) => {
                        self.notify(&Notice::cleared(outcome));
                        if outcome != ClearOutcome::Armed {
                            self.flush_warnings();
                            self.show();
                        }
                    }
                    Err(e) => self.notify(&Notice::from_error(&e, store_name)),
                }
                self.flush_warnings();
            }
            BoardCommand::CancelClear => {
                let notice = if self.session.cancel_clear() {
                    Notice::info("Clear cancelled.")
                } else {
                    Notice::info("Nothing to cancel.")
                };
                self.notify(&notice);
            }
            BoardCommand::Init => {
                match self.session.initialize() {
                    Ok(true) => self.notify(&Notice::success(format!(
                        "Created worksheet {} in the {store_name} store.",
                        self.session.worksheet()
                    ))),
                    Ok(false) => self.notify(&Notice::info(format!(
                        "Worksheet {} already exists.",
                        self.session.worksheet()
                    ))),
                    Err(e) => self.notify(&Notice::from_error(&e, store_name)),
                }
                self.flush_warnings();
            }
            BoardCommand::Help => println!("{INTERACTIVE_HELP}"),
            BoardCommand::Quit => return false,
        }
        true
    }

    /// Read commands from `input` until EOF or `quit`.
    pub(crate) fn run_interactive<R: BufRead>(&mut self, mut input: R) {
        self.notify(&Notice::info("Type `help` for commands, `quit` to leave."));
        self.show();
        loop {
            if self.session.is_clear_armed() {
                print!("doneboard (clear armed)> ");
            } else {
                print!("doneboard> ");
            }
            let _ = io::stdout().flush();

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    self.notify(&Notice::warning(format!("Could not read input: {e}")));
                    break;
                }
            }
            match BoardCommand::parse_line(&line) {
                Ok(command) => {
                    if !self.execute(command) {
                        break;
                    }
                }
                Err(message) => self.notify(&Notice::warning(message)),
            }
        }
        println!();
    }
}

fn build_context(cli: &Cli) -> Result<CommandContext, AppError> {
    let timestamp_format = cli
        .timestamp_format
        .clone()
        .unwrap_or_else(|| TIMESTAMP_FORMAT.to_string());
    if !is_valid_format(&timestamp_format) {
        return Err(AppError::InvalidTimestampFormat {
            input: timestamp_format,
        });
    }
    let format = if cli.json {
        OutputFormat::Json
    } else if cli.csv {
        OutputFormat::Csv
    } else {
        OutputFormat::Table
    };
    Ok(CommandContext {
        order: cli.order,
        format,
        display: DisplayOptions {
            use_color: cli.use_color(),
            timestamp_format,
        },
    })
}

fn session_options(cli: &Cli, timezone: Timezone) -> Result<SessionOptions, AppError> {
    let worksheet = cli
        .worksheet
        .as_deref()
        .map(str::trim)
        .unwrap_or(DEFAULT_WORKSHEET);
    if worksheet.is_empty() {
        return Err(AppError::EmptyWorksheet);
    }
    Ok(SessionOptions {
        worksheet: worksheet.to_string(),
        timezone,
        consistency: cli.consistency(),
    })
}

/// Open the store and run the requested command.
pub(crate) fn run(cli: Cli) -> Result<(), AppError> {
    let timezone = Timezone::parse(cli.timezone.as_deref())?;
    let command = cli.command.as_ref();
    let ctx = build_context(&cli)?;
    let options = session_options(&cli, timezone)?;
    let settings = cli.store_settings();
    let store = open_store(&settings, &options.worksheet)?;
    let clock = SystemClock::new(timezone);
    debug_log(format!(
        "store {} at {}, worksheet {}",
        store.name(),
        settings.describe(),
        options.worksheet
    ));

    run_command(command, store.as_ref(), &clock, options, &ctx);
    Ok(())
}

pub(crate) fn run_command(
    command: Option<&Commands>,
    store: &dyn TabularStore,
    clock: &dyn Clock,
    options: SessionOptions,
    ctx: &CommandContext,
) {
    match command {
        // Nothing to load before the worksheet exists
        Some(Commands::Init) => {
            let mut board = Board::new(LedgerSession::new(store, clock, options), ctx);
            board.execute(BoardCommand::Init);
            board.execute(BoardCommand::Reload);
        }
        Some(Commands::Reload) => {
            let mut board = Board::new(LedgerSession::new(store, clock, options), ctx);
            board.execute(BoardCommand::Reload);
        }
        Some(Commands::Interactive) => {
            let mut board = Board::new(LedgerSession::open(store, clock, options), ctx);
            board.run_interactive(io::stdin().lock());
        }
        Some(Commands::ClearToday { yes }) => {
            let mut board = Board::new(LedgerSession::open(store, clock, options), ctx);
            board.execute(BoardCommand::ClearToday);
            if *yes {
                board.execute(BoardCommand::ClearToday);
            } else {
                board.notify(&Notice::info("Re-run with --yes to confirm."));
            }
        }
        Some(cmd) => {
            let mut board = Board::new(LedgerSession::open(store, clock, options), ctx);
            board.execute(BoardCommand::from(cmd));
        }
        None => {
            let mut board = Board::new(LedgerSession::open(store, clock, options), ctx);
            board.execute(BoardCommand::View);
        }
    }
}
