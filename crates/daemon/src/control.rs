// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle verbs forwarded to the host service manager

use std::fmt;
use std::path::PathBuf;

use podsvc_adapters::{
    ManagerError, NativeServiceManager, Registration, ServiceManagerAdapter, TracedServiceManager,
};
use podsvc_core::{ControlVerb, ServiceSpec, ServiceStatus};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("failed to {verb} service {name}: {source}")]
    Manager {
        verb: ControlVerb,
        name: &'static str,
        #[source]
        source: ManagerError,
    },

    #[error("could not determine path of the running executable: {0}")]
    NoExecutable(#[source] std::io::Error),
}

impl ControlError {
    /// The manager error behind this failure, if any
    pub fn manager_error(&self) -> Option<&ManagerError> {
        match self {
            ControlError::Manager { source, .. } => Some(source),
            ControlError::NoExecutable(_) => None,
        }
    }

    pub fn verb(&self) -> Option<ControlVerb> {
        match self {
            ControlError::Manager { verb, .. } => Some(*verb),
            ControlError::NoExecutable(_) => Some(ControlVerb::Install),
        }
    }
}

/// Result of a successful control verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    Done {
        verb: ControlVerb,
        name: &'static str,
    },
    Status {
        name: &'static str,
        status: ServiceStatus,
    },
}

impl fmt::Display for ControlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlOutcome::Done { verb, name } => {
                let done = match verb {
                    ControlVerb::Install => "installed",
                    ControlVerb::Uninstall => "uninstalled",
                    ControlVerb::Start => "started",
                    ControlVerb::Stop => "stopped",
                    ControlVerb::Restart => "restarted",
                    ControlVerb::Status => "queried",
                };
                write!(f, "Service {} {}", name, done)
            }
            ControlOutcome::Status { name, status } => write!(f, "{}: {}", name, status),
        }
    }
}

/// Control surface for one service, backed by a service manager adapter
#[derive(Clone)]
pub struct ServiceControl<M> {
    manager: M,
    spec: ServiceSpec,
    launch_env: Vec<(&'static str, String)>,
}

impl<M: ServiceManagerAdapter> ServiceControl<M> {
    pub fn new(manager: M, spec: ServiceSpec) -> Self {
        Self {
            manager,
            spec,
            launch_env: Vec::new(),
        }
    }

    /// Environment `install` registers for the service process
    pub fn with_launch_env(mut self, env: Vec<(&'static str, String)>) -> Self {
        self.launch_env = env;
        self
    }

    fn fail(&self, verb: ControlVerb) -> impl Fn(ManagerError) -> ControlError {
        let name = self.spec.name;
        move |source| ControlError::Manager { verb, name, source }
    }

    fn done(&self, verb: ControlVerb) -> ControlOutcome {
        ControlOutcome::Done {
            verb,
            name: self.spec.name,
        }
    }

    pub async fn install(
        &self,
        registration: &Registration,
    ) -> Result<ControlOutcome, ControlError> {
        self.manager
            .install(&self.spec, registration)
            .await
            .map_err(self.fail(ControlVerb::Install))?;
        Ok(self.done(ControlVerb::Install))
    }

    pub async fn uninstall(&self) -> Result<ControlOutcome, ControlError> {
        self.manager
            .uninstall(self.spec.name)
            .await
            .map_err(self.fail(ControlVerb::Uninstall))?;
        Ok(self.done(ControlVerb::Uninstall))
    }

    pub async fn start(&self) -> Result<ControlOutcome, ControlError> {
        self.manager
            .start(self.spec.name)
            .await
            .map_err(self.fail(ControlVerb::Start))?;
        Ok(self.done(ControlVerb::Start))
    }

    pub async fn stop(&self) -> Result<ControlOutcome, ControlError> {
        self.manager
            .stop(self.spec.name)
            .await
            .map_err(self.fail(ControlVerb::Stop))?;
        Ok(self.done(ControlVerb::Stop))
    }

    /// Stop then start. Stopping an already-stopped service is not an error.
    pub async fn restart(&self) -> Result<ControlOutcome, ControlError> {
        let fail = self.fail(ControlVerb::Restart);
        self.manager.stop(self.spec.name).await.map_err(&fail)?;
        self.manager.start(self.spec.name).await.map_err(fail)?;
        Ok(self.done(ControlVerb::Restart))
    }

    pub async fn status(&self) -> Result<ControlOutcome, ControlError> {
        let status = self
            .manager
            .status(self.spec.name)
            .await
            .map_err(self.fail(ControlVerb::Status))?;
        Ok(ControlOutcome::Status {
            name: self.spec.name,
            status,
        })
    }

    /// Run `verb`; `install` registers the running executable with no
    /// arguments and the launch environment
    pub async fn dispatch(&self, verb: ControlVerb) -> Result<ControlOutcome, ControlError> {
        match verb {
            ControlVerb::Install => {
                let registration = self
                    .launch_env
                    .iter()
                    .fold(Registration::new(current_exe()?), |reg, (key, value)| {
                        reg.with_env(*key, value.clone())
                    });
                self.install(&registration).await
            }
            ControlVerb::Uninstall => self.uninstall().await,
            ControlVerb::Start => self.start().await,
            ControlVerb::Stop => self.stop().await,
            ControlVerb::Restart => self.restart().await,
            ControlVerb::Status => self.status().await,
        }
    }
}

fn current_exe() -> Result<PathBuf, ControlError> {
    std::env::current_exe().map_err(ControlError::NoExecutable)
}

/// The native service manager for this platform, wrapped with tracing
pub fn platform_manager(config: &Config) -> TracedServiceManager<NativeServiceManager> {
    TracedServiceManager::new(native_manager(config))
}

#[cfg(target_os = "linux")]
fn native_manager(config: &Config) -> NativeServiceManager {
    podsvc_adapters::SystemdAdapter::new(config.unit_dir.clone(), config.systemctl.clone())
}

#[cfg(windows)]
fn native_manager(_config: &Config) -> NativeServiceManager {
    podsvc_adapters::ScmAdapter::new()
}

#[cfg(not(any(windows, target_os = "linux")))]
fn native_manager(_config: &Config) -> NativeServiceManager {
    podsvc_adapters::UnsupportedAdapter::new()
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
