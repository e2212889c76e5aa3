// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows Service Control Manager adapter

use super::{ManagerError, Registration, ServiceManagerAdapter};
use async_trait::async_trait;
use podsvc_core::{ServiceSpec, ServiceStatus};
use std::ffi::{OsStr, OsString};
use windows_service::service::{
    Service, ServiceAccess, ServiceErrorControl, ServiceInfo, ServiceStartType, ServiceState,
    ServiceType,
};
use windows_service::service_manager::{ServiceManager, ServiceManagerAccess};

const ERROR_SERVICE_ALREADY_RUNNING: i32 = 1056;
const ERROR_SERVICE_DOES_NOT_EXIST: i32 = 1060;
const ERROR_SERVICE_NOT_ACTIVE: i32 = 1062;
const ERROR_SERVICE_EXISTS: i32 = 1073;

/// SCM-backed adapter
#[derive(Clone, Debug, Default)]
pub struct ScmAdapter;

impl ScmAdapter {
    pub fn new() -> Self {
        Self
    }

    fn connect(access: ServiceManagerAccess) -> Result<ServiceManager, ManagerError> {
        ServiceManager::local_computer(None::<&str>, access)
            .map_err(|e| ManagerError::CommandFailed(format!("connect to SCM: {}", e)))
    }

    fn open(name: &str, access: ServiceAccess) -> Result<Service, ManagerError> {
        Self::connect(ServiceManagerAccess::CONNECT)?
            .open_service(name, access)
            .map_err(|e| map_error(name, e))
    }
}

fn os_code(err: &windows_service::Error) -> Option<i32> {
    match err {
        windows_service::Error::Winapi(io) => io.raw_os_error(),
        _ => None,
    }
}

fn map_error(name: &str, err: windows_service::Error) -> ManagerError {
    match os_code(&err) {
        Some(ERROR_SERVICE_DOES_NOT_EXIST) => ManagerError::NotInstalled(name.to_string()),
        Some(ERROR_SERVICE_EXISTS) => ManagerError::AlreadyInstalled(name.to_string()),
        _ => ManagerError::CommandFailed(err.to_string()),
    }
}

#[async_trait]
impl ServiceManagerAdapter for ScmAdapter {
    async fn install(
        &self,
        spec: &ServiceSpec,
        registration: &Registration,
    ) -> Result<(), ManagerError> {
        // The SCM has no per-service environment; the service falls back to its defaults
        if !registration.env.is_empty() {
            let keys: Vec<&str> = registration.env.iter().map(|(k, _)| k.as_str()).collect();
            tracing::warn!(?keys, "service environment is not carried by the SCM");
        }

        let manager =
            Self::connect(ServiceManagerAccess::CONNECT | ServiceManagerAccess::CREATE_SERVICE)?;

        let info = ServiceInfo {
            name: OsString::from(spec.name),
            display_name: OsString::from(spec.display_name),
            service_type: ServiceType::OWN_PROCESS,
            start_type: ServiceStartType::AutoStart,
            error_control: ServiceErrorControl::Normal,
            executable_path: registration.executable.clone(),
            launch_arguments: registration.args.iter().map(OsString::from).collect(),
            dependencies: vec![],
            account_name: None,
            account_password: None,
        };

        let service = manager
            .create_service(&info, ServiceAccess::CHANGE_CONFIG)
            .map_err(|e| map_error(spec.name, e))?;
        service
            .set_description(spec.description)
            .map_err(|e| map_error(spec.name, e))?;
        Ok(())
    }

    async fn uninstall(&self, name: &str) -> Result<(), ManagerError> {
        let service = Self::open(
            name,
            ServiceAccess::QUERY_STATUS | ServiceAccess::STOP | ServiceAccess::DELETE,
        )?;

        let status = service.query_status().map_err(|e| map_error(name, e))?;
        if status.current_state != ServiceState::Stopped {
            if let Err(e) = service.stop() {
                if os_code(&e) != Some(ERROR_SERVICE_NOT_ACTIVE) {
                    return Err(map_error(name, e));
                }
            }
        }

        // Deletion completes once the last handle closes
        service.delete().map_err(|e| map_error(name, e))
    }

    async fn start(&self, name: &str) -> Result<(), ManagerError> {
        let service = Self::open(name, ServiceAccess::START)?;
        match service.start::<&OsStr>(&[]) {
            Ok(()) => Ok(()),
            Err(e) if os_code(&e) == Some(ERROR_SERVICE_ALREADY_RUNNING) => Ok(()),
            Err(e) => Err(map_error(name, e)),
        }
    }

    async fn stop(&self, name: &str) -> Result<(), ManagerError> {
        let service = Self::open(name, ServiceAccess::STOP)?;
        match service.stop() {
            Ok(_) => Ok(()),
            Err(e) if os_code(&e) == Some(ERROR_SERVICE_NOT_ACTIVE) => Ok(()),
            Err(e) => Err(map_error(name, e)),
        }
    }

    async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError> {
        let service = match Self::open(name, ServiceAccess::QUERY_STATUS) {
            Ok(service) => service,
            Err(ManagerError::NotInstalled(_)) => return Ok(ServiceStatus::NotInstalled),
            Err(e) => return Err(e),
        };

        let status = service.query_status().map_err(|e| map_error(name, e))?;
        Ok(match status.current_state {
            ServiceState::Running => ServiceStatus::Running,
            ServiceState::Stopped => ServiceStatus::Stopped,
            other => ServiceStatus::Unknown(format!("{:?}", other)),
        })
    }
}
