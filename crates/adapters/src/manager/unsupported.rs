// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for platforms without a supported service manager

use super::{ManagerError, Registration, ServiceManagerAdapter};
use async_trait::async_trait;
use podsvc_core::{ServiceSpec, ServiceStatus};

/// Rejects every operation with `ManagerError::Unsupported`
#[derive(Clone, Debug, Default)]
pub struct UnsupportedAdapter;

impl UnsupportedAdapter {
    pub fn new() -> Self {
        Self
    }

    fn reject<T>(&self) -> Result<T, ManagerError> {
        Err(ManagerError::Unsupported(std::env::consts::OS.to_string()))
    }
}

#[async_trait]
impl ServiceManagerAdapter for UnsupportedAdapter {
    async fn install(&self, _: &ServiceSpec, _: &Registration) -> Result<(), ManagerError> {
        self.reject()
    }

    async fn uninstall(&self, _: &str) -> Result<(), ManagerError> {
        self.reject()
    }

    async fn start(&self, _: &str) -> Result<(), ManagerError> {
        self.reject()
    }

    async fn stop(&self, _: &str) -> Result<(), ManagerError> {
        self.reject()
    }

    async fn status(&self, _: &str) -> Result<ServiceStatus, ManagerError> {
        self.reject()
    }
}
