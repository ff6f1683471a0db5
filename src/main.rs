mod app;
mod cli;
mod config;
mod error;
mod ledger;
mod output;
mod store;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;
use utils::set_debug;

fn main() {
    let cli = Cli::parse();

    // Config is announced on stderr only when debugging
    let config = if cli.debug {
        Config::load()
    } else {
        Config::load_quiet()
    };
    let cli = cli.with_config(&config);
    set_debug(cli.debug);

    if let Err(e) = app::run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
}
