// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::manager::{ManagerError, Registration, ServiceManagerAdapter};
use async_trait::async_trait;
use podsvc_core::{ServiceSpec, ServiceStatus};
use std::future::Future;
use std::time::Instant;

/// Wrapper that adds tracing to any ServiceManagerAdapter
#[derive(Clone)]
pub struct TracedServiceManager<M> {
    inner: M,
}

impl<M> TracedServiceManager<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Time an operation and log its outcome
async fn observe<T, F>(op: &'static str, name: &str, fut: F) -> Result<T, ManagerError>
where
    F: Future<Output = Result<T, ManagerError>>,
{
    tracing::info!(op, service = name, "requesting");
    let start = Instant::now();
    let result = fut.await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::info!(op, service = name, elapsed_ms, "completed"),
        Err(e) => tracing::error!(op, service = name, elapsed_ms, error = %e, "failed"),
    }
    result
}

#[async_trait]
impl<M: ServiceManagerAdapter> ServiceManagerAdapter for TracedServiceManager<M> {
    async fn install(
        &self,
        spec: &ServiceSpec,
        registration: &Registration,
    ) -> Result<(), ManagerError> {
        tracing::debug!(
            executable = %registration.executable.display(),
            args = ?registration.args,
            "registering"
        );

        // Precondition: the manager launches this path, so it must exist
        if !registration.executable.is_file() {
            tracing::error!(
                executable = %registration.executable.display(),
                "executable does not exist"
            );
            return Err(ManagerError::CommandFailed(format!(
                "executable does not exist: {}",
                registration.executable.display()
            )));
        }

        observe("install", spec.name, self.inner.install(spec, registration)).await
    }

    async fn uninstall(&self, name: &str) -> Result<(), ManagerError> {
        observe("uninstall", name, self.inner.uninstall(name)).await
    }

    async fn start(&self, name: &str) -> Result<(), ManagerError> {
        observe("start", name, self.inner.start(name)).await
    }

    async fn stop(&self, name: &str) -> Result<(), ManagerError> {
        observe("stop", name, self.inner.stop(name)).await
    }

    async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError> {
        let result = self.inner.status(name).await;
        tracing::debug!(service = name, status = ?result.as_ref().ok(), "queried");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
