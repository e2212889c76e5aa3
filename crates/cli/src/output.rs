// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use std::fmt;

use clap::ValueEnum;
use podsvc_core::{ServiceSpec, ServiceStatus};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Result of `podsvc status`
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub service: &'static str,
    pub display_name: &'static str,
    pub status: ServiceStatus,
}

impl StatusReport {
    pub fn new(spec: &ServiceSpec, status: ServiceStatus) -> Self {
        Self {
            service: spec.name,
            display_name: spec.display_name,
            status,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Service: {} ({})", self.service, self.display_name)?;
        write!(f, "  Status: {}", self.status)
    }
}
