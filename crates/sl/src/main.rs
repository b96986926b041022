//! sl - Personal/group expense ledger
//!
//! A thin CLI over the spend-ledger core: records and budgets live behind a
//! remote items/groups/users gateway, with a local offline cache serving
//! reads when the gateway is unreachable.

use clap::Parser;

mod commands;
mod util;

use commands::Cli;

fn main() {
    spend_ledger_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
