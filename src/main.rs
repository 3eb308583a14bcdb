mod chain_cmd;
mod cli;
mod config;
mod convert;
mod logging;
mod mdp_cmd;
mod output;
mod queue_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Ceiling(args) => chain_cmd::run_ceiling(args),
        Command::Assembly(args) => chain_cmd::run_assembly(args),
        Command::Queue(args) => queue_cmd::run(args),
        Command::Mdp(args) => mdp_cmd::run(args),
    }
}
