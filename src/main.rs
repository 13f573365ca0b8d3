use anyhow::Result;
use clap::{Parser, Subcommand};

mod beancount;
mod config;
mod fetch;
mod filespec;
mod importers;
mod tags;

#[derive(Debug, Parser)]
/// Fetches Monzo transactions and converts them to Beancount entries.
struct Command {
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Prints the date each transaction file is filed under.
    Date(importers::cmd::DateCommand),
    /// Downloads recent transactions of every account into JSON files.
    Fetch(fetch::cmd::Command),
    /// Prints the ledger account each transaction file belongs to.
    Identify(importers::cmd::IdentifyCommand),
    /// Converts transaction files to Beancount entries.
    Import(importers::cmd::ImportCommand),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cmd = Command::parse();
    use SubCommand::*;
    match cmd.subcmd {
        Date(cmd) => cmd.run(),
        Fetch(cmd) => cmd.run(),
        Identify(cmd) => cmd.run(),
        Import(cmd) => cmd.run(),
    }
}
