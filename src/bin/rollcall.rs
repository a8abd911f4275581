//! Rollcall CLI Binary
//!
//! Command-line interface for team roster reconciliation.

use anyhow::Context;
use clap::Parser;
use rollcall::config::ConfigLoader;
use rollcall::logging::init_logging;
use rollcall::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_logging_overrides(&mut config.logging);
    init_logging(Some(&config.logging)).context("Failed to initialize logging")?;

    let context = CliContext::with_config(config, cli.cache_dir.clone())
        .context("Failed to load source snapshots")?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
