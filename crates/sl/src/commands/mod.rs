//! CLI command dispatch and execution

use anyhow::Result;
use clap::{Parser, Subcommand};

mod add;
mod budget;
mod group;
mod list;
mod remove;
mod report;
mod sync;
mod user;

/// sl - Personal/group expense ledger
#[derive(Parser, Debug)]
#[command(
    name = "sl",
    version,
    about = "Personal/group expense ledger",
    long_about = "Record, browse, and budget expenses against a remote gateway, \
                  with an offline cache for reads when the gateway is unreachable"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record an income or outcome (insert or edit)
    Add(add::AddArgs),

    /// List records for a scope and date filter
    List(list::ListArgs),

    /// Remove a record by id
    Remove(remove::RemoveArgs),

    /// Aggregate breakdowns for a month (categories, necessity, shares)
    Report(report::ReportArgs),

    /// Show or edit yearly budgets and allocations
    Budget(budget::BudgetArgs),

    /// Manage shared groups
    Group(group::GroupArgs),

    /// Show the signed-in profile (creating it on first contact)
    User(user::UserArgs),

    /// Force-refresh the offline cache from the gateway
    Sync(sync::SyncArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Add(args) => add::execute(args),
            Commands::List(args) => list::execute(args),
            Commands::Remove(args) => remove::execute(args),
            Commands::Report(args) => report::execute(args),
            Commands::Budget(args) => budget::execute(args),
            Commands::Group(args) => group::execute(args),
            Commands::User(args) => user::execute(args),
            Commands::Sync(args) => sync::execute(args),
        }
    }
}
