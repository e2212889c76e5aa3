// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service configuration.
//!
//! Resolved once at startup from built-in defaults, an optional TOML file
//! and `PODSVC_*` environment overrides, in increasing precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use podsvc_core::{ServiceSpec, POD_CRYPTO_SERVICE};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_CONFIG: &str = "PODSVC_CONFIG";
pub const ENV_STATE_DIR: &str = "PODSVC_STATE_DIR";
pub const ENV_LOG_PATH: &str = "PODSVC_LOG_PATH";
pub const ENV_HEARTBEAT_INTERVAL_MS: &str = "PODSVC_HEARTBEAT_INTERVAL_MS";
pub const ENV_STOP_TIMEOUT_MS: &str = "PODSVC_STOP_TIMEOUT_MS";
pub const ENV_UNIT_DIR: &str = "PODSVC_UNIT_DIR";
pub const ENV_SYSTEMCTL: &str = "PODSVC_SYSTEMCTL";

const CONFIG_FILE_NAME: &str = "podsvc.toml";
const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity registered with the host service manager
    pub service: ServiceSpec,
    /// Directory holding the log, lock and optional config file
    pub state_dir: PathBuf,
    /// Append-only service log
    pub log_path: PathBuf,
    /// Instance lock / PID file
    pub lock_path: PathBuf,
    pub heartbeat_interval: Duration,
    /// Upper bound on waiting for the worker to stop
    pub stop_timeout: Duration,
    /// systemd unit directory (Linux only)
    pub unit_dir: PathBuf,
    /// systemctl binary (Linux only)
    pub systemctl: PathBuf,
    /// Config file that was read, if any
    pub source: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid value for {var}: '{value}' (expected milliseconds)")]
    InvalidEnv { var: &'static str, value: String },

    #[error("heartbeat interval must be greater than zero")]
    ZeroInterval,
}

/// On-disk config file layout
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    state_dir: Option<PathBuf>,
    log_path: Option<PathBuf>,
    #[serde(with = "humantime_serde", default)]
    heartbeat_interval: Option<Duration>,
    #[serde(with = "humantime_serde", default)]
    stop_timeout: Option<Duration>,
    unit_dir: Option<PathBuf>,
    systemctl: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from the process environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve(explicit, |var| std::env::var(var).ok())
    }

    /// Resolve configuration with an injectable environment lookup
    pub fn resolve<E>(explicit: Option<&Path>, env: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env_state_dir = env(ENV_STATE_DIR).map(PathBuf::from);
        let default_state_dir = match &env_state_dir {
            Some(dir) => dir.clone(),
            None => default_state_dir(&env),
        };

        let source = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from))
        {
            Some(path) if path.is_file() => Some(path),
            Some(path) => return Err(ConfigError::NotFound(path)),
            None => Some(default_state_dir.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };

        let file = match &source {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };

        let state_dir = env_state_dir
            .or(file.state_dir)
            .unwrap_or(default_state_dir);

        let log_path = env(ENV_LOG_PATH)
            .map(PathBuf::from)
            .or(file.log_path)
            .unwrap_or_else(|| state_dir.join("logs").join("service.log"));

        let heartbeat_interval = env_millis(&env, ENV_HEARTBEAT_INTERVAL_MS)?
            .or(file.heartbeat_interval)
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL);
        if heartbeat_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        let stop_timeout = env_millis(&env, ENV_STOP_TIMEOUT_MS)?
            .or(file.stop_timeout)
            .unwrap_or(DEFAULT_STOP_TIMEOUT);

        let unit_dir = env(ENV_UNIT_DIR)
            .map(PathBuf::from)
            .or(file.unit_dir)
            .unwrap_or_else(|| PathBuf::from("/etc/systemd/system"));

        let systemctl = env(ENV_SYSTEMCTL)
            .map(PathBuf::from)
            .or(file.systemctl)
            .unwrap_or_else(|| PathBuf::from("systemctl"));

        Ok(Self {
            service: POD_CRYPTO_SERVICE,
            lock_path: state_dir.join("podsvc.pid"),
            state_dir,
            log_path,
            heartbeat_interval,
            stop_timeout,
            unit_dir,
            systemctl,
            source,
        })
    }

    /// Environment that reproduces this configuration in a process the
    /// service manager launches, which inherits none of ours
    pub fn launch_env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![
            (ENV_STATE_DIR, absolute(&self.state_dir)),
            (ENV_LOG_PATH, absolute(&self.log_path)),
        ];
        if let Some(source) = &self.source {
            env.push((ENV_CONFIG, absolute(source)));
        }
        env
    }
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

fn env_millis<E>(env: &E, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let Some(value) = env(var) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// Default state directory for this platform
#[cfg(windows)]
fn default_state_dir<E>(_env: &E) -> PathBuf
where
    E: Fn(&str) -> Option<String>,
{
    PathBuf::from(r"C:\print_on_demand")
}

/// Default state directory for this platform
///
/// systemd's STATE_DIRECTORY, then XDG_STATE_HOME, then ~/.local/state.
/// A system service may have none of these, so /var/lib/podsvc is last.
#[cfg(not(windows))]
fn default_state_dir<E>(env: &E) -> PathBuf
where
    E: Fn(&str) -> Option<String>,
{
    // STATE_DIRECTORY is colon-separated when a unit lists several
    if let Some(dir) = env("STATE_DIRECTORY")
        .as_deref()
        .and_then(|dirs| dirs.split(':').next())
        .filter(|dir| !dir.is_empty())
    {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = env("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("podsvc");
    }
    match env("HOME") {
        Some(home) => PathBuf::from(home).join(".local/state/podsvc"),
        None => PathBuf::from("/var/lib/podsvc"),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
