// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle verbs: install, uninstall, start, stop, restart, status

use anyhow::Result;
use podsvc_core::ControlVerb;
use podsvc_daemon::logging::{self, setup_console_logging};
use podsvc_daemon::{platform_manager, Config, ControlOutcome, ServiceControl};

use crate::error::CliError;
use crate::output::{self, OutputFormat, StatusReport};

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

pub fn handle(config: &Config, verb: ControlVerb, format: OutputFormat) -> Result<()> {
    // A second subscriber can only come from tests; nothing to report
    let _ = setup_console_logging();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let control = ServiceControl::new(platform_manager(config), config.service)
        .with_launch_env(config.launch_env());

    match runtime.block_on(control.dispatch(verb)) {
        Ok(ControlOutcome::Status { status, .. }) => {
            output::print(&StatusReport::new(&config.service, status), format);
            Ok(())
        }
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(())
        }
        Err(e) => {
            if verb.is_mutating() {
                logging::write_error_line(&config.log_path, verb.as_str(), &e);
            }
            Err(CliError::from_control(&e).into())
        }
    }
}
