// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run as the service itself

use anyhow::Result;
use podsvc_daemon::{run_service, Config};

use crate::error::CliError;

/// Block until the service manager (or a signal) stops us
pub fn handle(config: &Config) -> Result<()> {
    run_service(config).map_err(|e| CliError::from_lifecycle(&e).into())
}
