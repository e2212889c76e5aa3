// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! podsvc - POD cryptographic service host

// Allow unwrap in test code
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod commands;
mod completions;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use podsvc_core::ControlVerb;
use podsvc_daemon::Config;

use crate::commands::{control, logs, run};
use crate::completions::{generate_completions, CompletionsArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "podsvc",
    version,
    about = "Print on Demand cryptographic service host",
    long_about = "Print on Demand cryptographic service host.\n\n\
                  With no command, runs as the service itself until stopped."
)]
struct Cli {
    /// Config file (default: <state_dir>/podsvc.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register this executable with the host service manager
    Install,
    /// Remove the service registration
    Uninstall,
    /// Ask the service manager to start the service
    Start,
    /// Ask the service manager to stop the service
    Stop,
    /// Stop, then start the service
    Restart,
    /// Show the service manager's view of the service
    Status(control::StatusArgs),
    /// Run as the service in the foreground (same as no command)
    Run,
    /// Print the tail of the service log
    Logs(logs::LogsArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(err) => eprint!("{}", err),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Run);

    // Completions need neither config nor a service manager
    if let Commands::Completions(args) = &command {
        generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).map_err(|e| CliError::from_config(&e))?;

    match command {
        Commands::Run => run::handle(&config),
        Commands::Logs(args) => logs::handle(&config, args),
        Commands::Install => control::handle(&config, ControlVerb::Install, Default::default()),
        Commands::Uninstall => {
            control::handle(&config, ControlVerb::Uninstall, Default::default())
        }
        Commands::Start => control::handle(&config, ControlVerb::Start, Default::default()),
        Commands::Stop => control::handle(&config, ControlVerb::Stop, Default::default()),
        Commands::Restart => control::handle(&config, ControlVerb::Restart, Default::default()),
        Commands::Status(args) => control::handle(&config, ControlVerb::Status, args.output),
        Commands::Completions(_) => Ok(()),
    }
}
