// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service lifecycle: startup, the run loop, and shutdown.

use std::future::Future;
use std::time::Duration;

use podsvc_core::{
    Clock, Heartbeat, HeartbeatHandle, HeartbeatWorker, SystemClock, WorkerError, WorkerState,
};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::lock::{InstanceLock, LockError};
use crate::logging::{self, LoggingError};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    #[error("service manager error: {0}")]
    ServiceManager(String),
}

/// Owns the heartbeat worker on behalf of the host service manager.
///
/// `start` schedules the worker and returns at once; `stop` raises the
/// cancellation signal and waits, bounded by the stop timeout, for the
/// worker to reach `Stopped`.
pub struct ServiceController<C: Clock = SystemClock> {
    worker: HeartbeatWorker<C>,
    handle: Option<HeartbeatHandle>,
    stop_timeout: Duration,
    runtime: Handle,
}

impl ServiceController<SystemClock> {
    pub fn new(config: &Config, runtime: Handle) -> Result<Self, LifecycleError> {
        let worker = HeartbeatWorker::new(config.heartbeat_interval)?;
        Ok(Self::with_worker(worker, config.stop_timeout, runtime))
    }
}

impl<C: Clock> ServiceController<C> {
    pub fn with_worker(
        worker: HeartbeatWorker<C>,
        stop_timeout: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            worker,
            handle: None,
            stop_timeout,
            runtime,
        }
    }

    /// Schedule the heartbeat worker. Never waits for the first beat.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        info!(
            interval_ms = self.worker.interval().as_millis() as u64,
            "Service starting..."
        );
        let handle = self.worker.start(&self.runtime)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the worker and wait for it to finish. A no-op if never started.
    pub async fn stop(&mut self) -> Result<(), LifecycleError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        handle.stop(self.stop_timeout).await?;
        info!(
            beats = handle.last_beat().map_or(0, |b| b.seq),
            "Service stopped"
        );
        Ok(())
    }

    pub fn state(&self) -> WorkerState {
        self.worker.state()
    }

    pub fn last_beat(&self) -> Option<Heartbeat> {
        self.handle.as_ref().and_then(HeartbeatHandle::last_beat)
    }

    /// Wait for the `seq`th heartbeat; `None` if not running or it stopped first
    pub async fn wait_for_beat(&self, seq: u64) -> Option<Heartbeat> {
        match &self.handle {
            Some(handle) => handle.wait_for_beat(seq).await,
            None => None,
        }
    }
}

/// Hold the instance lock and run the worker until `shutdown` resolves.
///
/// Must be called from within a tokio runtime.
pub async fn run_until<F>(config: &Config, shutdown: F) -> Result<(), LifecycleError>
where
    F: Future<Output = ()>,
{
    let lock = InstanceLock::acquire(&config.lock_path)?;
    info!(lock = %lock.path().display(), "instance lock acquired");

    let mut controller = ServiceController::new(config, Handle::current())?;
    controller.start()?;

    shutdown.await;
    info!("Stop requested");

    controller.stop().await
}

/// Run as the service itself, blocking until stopped.
///
/// Writes the startup marker and installs the file logger first; both are
/// fatal if the log cannot be opened. Any failure after that is also
/// appended to the log synchronously, since the non-blocking writer may
/// not flush before the process exits.
pub fn run_service(config: &Config) -> Result<(), LifecycleError> {
    logging::write_startup_marker(&config.log_path)?;

    let result = {
        let _guard = logging::setup_file_logging(&config.log_path)?;
        info!(
            service = config.service.name,
            log = %config.log_path.display(),
            config = ?config.source,
            "Service initialization started"
        );
        run_platform(config)
        // _guard drops here, flushing buffered lines ahead of any error line
    };

    if let Err(e) = &result {
        logging::write_error_line(&config.log_path, "service failed", e);
    }
    result
}

#[cfg(windows)]
fn run_platform(config: &Config) -> Result<(), LifecycleError> {
    crate::windows::run(config)
}

#[cfg(not(windows))]
fn run_platform(config: &Config) -> Result<(), LifecycleError> {
    run_foreground(config)
}

/// Run in the foreground until a stop signal arrives
pub(crate) fn run_foreground(config: &Config) -> Result<(), LifecycleError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(LifecycleError::Runtime)?;

    runtime.block_on(async {
        // Register handlers before taking the lock so an early stop isn't lost
        let shutdown = shutdown_signal().map_err(LifecycleError::Signal)?;
        run_until(config, shutdown).await
    })
}

#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl-C"),
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
