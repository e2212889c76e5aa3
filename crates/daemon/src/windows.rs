// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service Control Manager entry point.
//!
//! The SCM calls `service_main` on its own thread. The control handler only
//! forwards stop requests into the tokio runtime over a watch channel.

// define_windows_service! expands to an extern "system" shim with unsafe blocks
#![allow(unsafe_code)]

use std::ffi::OsString;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
    ServiceType,
};
use windows_service::service_control_handler::{
    self, ServiceControlHandlerResult, ServiceStatusHandle,
};
use windows_service::{define_windows_service, service_dispatcher};

use crate::config::Config;
use crate::lifecycle::{run_foreground, run_until, LifecycleError};

/// The process was started from a console rather than by the SCM
const ERROR_FAILED_SERVICE_CONTROLLER_CONNECT: i32 = 1063;

static CONFIG: OnceLock<Config> = OnceLock::new();
static FAILURE: OnceLock<String> = OnceLock::new();

define_windows_service!(ffi_service_main, service_main);

/// Hand the process to the SCM dispatcher, blocking until the service stops.
///
/// Falls back to running in the foreground when not launched by the SCM.
pub(crate) fn run(config: &Config) -> Result<(), LifecycleError> {
    let _ = CONFIG.set(config.clone());

    match service_dispatcher::start(config.service.name, ffi_service_main) {
        Ok(()) => match FAILURE.get() {
            Some(message) => Err(LifecycleError::ServiceManager(message.clone())),
            None => Ok(()),
        },
        Err(windows_service::Error::Winapi(e))
            if e.raw_os_error() == Some(ERROR_FAILED_SERVICE_CONTROLLER_CONNECT) =>
        {
            info!("Not launched by the Service Control Manager, running interactively");
            run_foreground(config)
        }
        Err(e) => Err(LifecycleError::ServiceManager(e.to_string())),
    }
}

fn service_main(_arguments: Vec<OsString>) {
    if let Err(e) = run_under_scm() {
        error!("Service failed: {}", e);
        let _ = FAILURE.set(e.to_string());
    }
}

fn run_under_scm() -> Result<(), LifecycleError> {
    let config = CONFIG
        .get()
        .ok_or_else(|| LifecycleError::ServiceManager("configuration not loaded".to_string()))?;

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let event_handler = move |control| match control {
        ServiceControl::Stop | ServiceControl::Shutdown => {
            info!(?control, "Stop requested by Service Control Manager");
            stop_tx.send_replace(true);
            ServiceControlHandlerResult::NoError
        }
        ServiceControl::Interrogate => ServiceControlHandlerResult::NoError,
        _ => ServiceControlHandlerResult::NotImplemented,
    };

    let status = service_control_handler::register(config.service.name, event_handler)
        .map_err(|e| LifecycleError::ServiceManager(e.to_string()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(LifecycleError::Runtime)?;

    report(
        &status,
        ServiceState::Running,
        ServiceControlAccept::STOP | ServiceControlAccept::SHUTDOWN,
        0,
        Duration::ZERO,
    )?;

    let result = runtime.block_on(run_until(config, async {
        let _ = stop_rx.wait_for(|stop| *stop).await;
        let _ = report(
            &status,
            ServiceState::StopPending,
            ServiceControlAccept::empty(),
            0,
            config.stop_timeout,
        );
    }));

    let exit_code = if result.is_ok() { 0 } else { 1 };
    report(
        &status,
        ServiceState::Stopped,
        ServiceControlAccept::empty(),
        exit_code,
        Duration::ZERO,
    )?;
    result
}

fn report(
    handle: &ServiceStatusHandle,
    state: ServiceState,
    accepted: ServiceControlAccept,
    exit_code: u32,
    wait_hint: Duration,
) -> Result<(), LifecycleError> {
    handle
        .set_service_status(ServiceStatus {
            service_type: ServiceType::OWN_PROCESS,
            current_state: state,
            controls_accepted: accepted,
            exit_code: ServiceExitCode::Win32(exit_code),
            checkpoint: 0,
            wait_hint,
            process_id: None,
        })
        .map_err(|e| LifecycleError::ServiceManager(e.to_string()))
}
