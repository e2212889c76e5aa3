// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host service manager adapters (systemd, Windows SCM)

mod systemd;
mod unsupported;
#[cfg(windows)]
mod windows;

pub use systemd::{render_unit, SystemdAdapter};
pub use unsupported::UnsupportedAdapter;
#[cfg(windows)]
pub use windows::ScmAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeService, FakeServiceManager, ManagerCall};

use async_trait::async_trait;
use podsvc_core::{ServiceSpec, ServiceStatus};
use std::path::PathBuf;
use thiserror::Error;

/// The adapter for the platform this binary was built for
#[cfg(windows)]
pub type NativeServiceManager = ScmAdapter;
#[cfg(target_os = "linux")]
pub type NativeServiceManager = SystemdAdapter;
#[cfg(not(any(windows, target_os = "linux")))]
pub type NativeServiceManager = UnsupportedAdapter;

/// Errors from service manager operations
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("service {0} is not installed")]
    NotInstalled(String),
    #[error("service {0} is already installed")]
    AlreadyInstalled(String),
    #[error("service manager command failed: {0}")]
    CommandFailed(String),
    #[error("service manager not supported: {0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the manager should launch the service process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Absolute path of the executable to launch
    pub executable: PathBuf,
    /// Arguments passed on launch (empty means "run as the service")
    pub args: Vec<String>,
    /// Environment the manager sets for the service process
    pub env: Vec<(String, String)>,
}

impl Registration {
    pub fn new(executable: PathBuf) -> Self {
        Self {
            executable,
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Adapter over the host service manager's control API.
///
/// Every operation validates its preconditions before mutating anything, so
/// a failed call leaves the registered service as it was. Starting a running
/// service and stopping a stopped one both succeed.
#[async_trait]
pub trait ServiceManagerAdapter: Clone + Send + Sync + 'static {
    /// Register the service with the manager
    async fn install(
        &self,
        spec: &ServiceSpec,
        registration: &Registration,
    ) -> Result<(), ManagerError>;

    /// Remove the service registration, stopping it first if needed
    async fn uninstall(&self, name: &str) -> Result<(), ManagerError>;

    /// Ask the manager to start the service
    async fn start(&self, name: &str) -> Result<(), ManagerError>;

    /// Ask the manager to stop the service
    async fn stop(&self, name: &str) -> Result<(), ManagerError>;

    /// Query the manager's view of the service
    async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError>;
}
