// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake service manager for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ManagerError, Registration, ServiceManagerAdapter};
use async_trait::async_trait;
use podsvc_core::{ServiceSpec, ServiceStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded manager call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerCall {
    Install { name: String },
    Uninstall { name: String },
    Start { name: String },
    Stop { name: String },
    Status { name: String },
}

/// Fake registered service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeService {
    pub spec: ServiceSpec,
    pub registration: Registration,
    pub running: bool,
}

/// In-memory service registry
#[derive(Clone, Default)]
pub struct FakeServiceManager {
    services: Arc<Mutex<HashMap<String, FakeService>>>,
    calls: Arc<Mutex<Vec<ManagerCall>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ManagerCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get a registered service by name
    pub fn get_service(&self, name: &str) -> Option<FakeService> {
        self.services
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Make every subsequent call fail as the OS would reject it
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    fn record(&self, call: ManagerCall) -> Result<(), ManagerError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        match self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            Some(message) => Err(ManagerError::CommandFailed(message.clone())),
            None => Ok(()),
        }
    }

    fn set_running(&self, name: &str, running: bool) -> Result<(), ManagerError> {
        let mut services = self.services.lock().unwrap_or_else(|e| e.into_inner());
        let service = services
            .get_mut(name)
            .ok_or_else(|| ManagerError::NotInstalled(name.to_string()))?;
        service.running = running;
        Ok(())
    }
}

#[async_trait]
impl ServiceManagerAdapter for FakeServiceManager {
    async fn install(
        &self,
        spec: &ServiceSpec,
        registration: &Registration,
    ) -> Result<(), ManagerError> {
        self.record(ManagerCall::Install {
            name: spec.name.to_string(),
        })?;

        let mut services = self.services.lock().unwrap_or_else(|e| e.into_inner());
        if services.contains_key(spec.name) {
            return Err(ManagerError::AlreadyInstalled(spec.name.to_string()));
        }
        services.insert(
            spec.name.to_string(),
            FakeService {
                spec: *spec,
                registration: registration.clone(),
                running: false,
            },
        );
        Ok(())
    }

    async fn uninstall(&self, name: &str) -> Result<(), ManagerError> {
        self.record(ManagerCall::Uninstall {
            name: name.to_string(),
        })?;

        let mut services = self.services.lock().unwrap_or_else(|e| e.into_inner());
        if services.remove(name).is_none() {
            return Err(ManagerError::NotInstalled(name.to_string()));
        }
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<(), ManagerError> {
        self.record(ManagerCall::Start {
            name: name.to_string(),
        })?;
        self.set_running(name, true)
    }

    async fn stop(&self, name: &str) -> Result<(), ManagerError> {
        self.record(ManagerCall::Stop {
            name: name.to_string(),
        })?;
        self.set_running(name, false)
    }

    async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError> {
        self.record(ManagerCall::Status {
            name: name.to_string(),
        })?;

        Ok(match self.get_service(name) {
            None => ServiceStatus::NotInstalled,
            Some(service) if service.running => ServiceStatus::Running,
            Some(_) => ServiceStatus::Stopped,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
