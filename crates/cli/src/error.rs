// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong (message), why it might have happened
//! (context) and how to fix it (suggestions).

use std::fmt;

use podsvc_adapters::ManagerError;
use podsvc_daemon::{ConfigError, ControlError, LifecycleError, LockError, LoggingError};

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

const PRIVILEGE_HINT: &str =
    "Service registration usually needs root (systemd) or Administrator (Windows)";

/// Builders for the failures users actually hit.
impl CliError {
    pub fn from_config(err: &ConfigError) -> Self {
        let base = CliError::new(err.to_string());
        match err {
            ConfigError::NotFound(_) => base
                .with_suggestion("Check the --config path or PODSVC_CONFIG"),
            ConfigError::Parse(..) => base
                .with_context("Known keys: state_dir, log_path, heartbeat_interval, stop_timeout, unit_dir, systemctl")
                .with_suggestion("Durations are written like \"5s\" or \"500ms\""),
            ConfigError::ZeroInterval => {
                base.with_suggestion("Use a heartbeat interval of at least 1ms")
            }
            ConfigError::InvalidEnv { .. } | ConfigError::Read(..) => base,
        }
    }

    pub fn from_control(err: &ControlError) -> Self {
        let base = CliError::new(err.to_string());
        match err.manager_error() {
            Some(ManagerError::NotInstalled(_)) => {
                base.with_suggestion("Install the service first: podsvc install")
            }
            Some(ManagerError::AlreadyInstalled(_)) => base
                .with_suggestion("Remove the existing registration: podsvc uninstall")
                .with_suggestion("Or check its state: podsvc status"),
            Some(ManagerError::Unsupported(_)) => base
                .with_context("No supported service manager on this platform")
                .with_suggestion("Run in the foreground instead: podsvc run"),
            Some(ManagerError::CommandFailed(_)) | Some(ManagerError::Io(_)) => base
                .with_context("The service manager rejected the request")
                .with_suggestion(PRIVILEGE_HINT),
            None => base,
        }
    }

    pub fn from_lifecycle(err: &LifecycleError) -> Self {
        match err {
            LifecycleError::Config(e) => Self::from_config(e),
            LifecycleError::Lock(LockError::Held(path, _)) => CliError::new(err.to_string())
                .with_context(format!("PID file: {}", path.display()))
                .with_suggestion("Stop the running instance: podsvc stop"),
            LifecycleError::Logging(LoggingError::Prepare(path, _)) => {
                CliError::new(err.to_string())
                    .with_context(format!(
                        "The log directory {} could not be created or opened",
                        path.parent().unwrap_or(path.as_path()).display()
                    ))
                    .with_suggestion(
                        "Set PODSVC_LOG_PATH or log_path in podsvc.toml to a writable location",
                    )
            }
            _ => CliError::new(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
