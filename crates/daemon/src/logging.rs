// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log sink setup.
//!
//! In run mode every tracing event is appended to the service log through
//! `tracing-appender`'s non-blocking writer. Lines that must survive an
//! immediate exit (startup marker, fatal errors) are written synchronously.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Startup marker prefix written to the log before anything else.
/// Readers use it to find where the current run begins.
/// Full format: "<timestamp> --- podsvc: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- podsvc: starting (pid: ";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log file {0}: {1}")]
    Prepare(PathBuf, #[source] std::io::Error),

    #[error("log path has no file name: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}

/// Create the log directory if needed and open the log for appending
fn open_append(path: &Path) -> Result<std::fs::File, LoggingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| LoggingError::Prepare(path.to_path_buf(), e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggingError::Prepare(path.to_path_buf(), e))
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Append the startup marker, creating the log file and directory if needed.
///
/// This is the first write of a run, so it doubles as the check that the
/// log sink is usable at all.
pub fn write_startup_marker(path: &Path) -> Result<(), LoggingError> {
    let mut file = open_append(path)?;
    writeln!(
        file,
        "{} {}{}) ---",
        timestamp(),
        STARTUP_MARKER_PREFIX,
        std::process::id()
    )
    .map_err(|e| LoggingError::Prepare(path.to_path_buf(), e))
}

/// Append an error line synchronously. Best effort.
pub fn write_error_line(path: &Path, context: &str, error: &dyn Display) {
    let Ok(mut file) = open_append(path) else {
        return;
    };
    let _ = writeln!(file, "{}  ERROR {}: {}", timestamp(), context, error);
}

/// Route all tracing output to the service log.
///
/// The returned guard flushes pending lines when dropped and must be held
/// for the life of the process.
pub fn setup_file_logging(path: &Path) -> Result<WorkerGuard, LoggingError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.to_path_buf()))?;

    // Never rotate: the file is append-only and retention is left to the operator
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

    Ok(guard)
}

/// Route tracing output to stderr for one-shot control commands
pub fn setup_console_logging() -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .try_init()
        .map_err(|e| LoggingError::Subscriber(e.to_string()))
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Read the whole log, or `None` if there is no log yet
pub fn read_log(path: &Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// The last `lines` lines of `content`
pub fn tail(content: &str, lines: usize) -> Vec<&str> {
    let all: Vec<&str> = content.lines().collect();
    let skip = all.len().saturating_sub(lines);
    all[skip..].to_vec()
}

/// Lines logged since the most recent startup marker
pub fn current_run(content: &str) -> &str {
    match content.rfind(STARTUP_MARKER_PREFIX) {
        // Back up to the start of the marker's line to keep its timestamp
        Some(pos) => {
            let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
            &content[line_start..]
        }
        None => content,
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
