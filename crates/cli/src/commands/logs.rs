// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service log viewer

use anyhow::{Context, Result};
use podsvc_daemon::logging;
use podsvc_daemon::Config;

#[derive(clap::Args)]
pub struct LogsArgs {
    /// Number of lines to show
    #[arg(long, short = 'n', default_value_t = 50)]
    pub lines: usize,

    /// Only show lines from the most recent run
    #[arg(long)]
    pub current: bool,
}

pub fn handle(config: &Config, args: LogsArgs) -> Result<()> {
    let path = &config.log_path;
    let content = logging::read_log(path)
        .with_context(|| format!("failed to read log file {}", path.display()))?;

    let Some(content) = content else {
        println!("No log file yet at {}", path.display());
        return Ok(());
    };

    let content = if args.current {
        logging::current_run(&content)
    } else {
        &content
    };
    for line in logging::tail(content, args.lines) {
        println!("{}", line);
    }
    Ok(())
}
