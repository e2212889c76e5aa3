// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! systemd service manager adapter

use super::{ManagerError, Registration, ServiceManagerAdapter};
use async_trait::async_trait;
use minijinja::{context, Environment};
use podsvc_core::{ServiceSpec, ServiceStatus};
use std::path::PathBuf;
use tokio::process::Command;

const UNIT_TEMPLATE: &str = "\
# {{ description }}
[Unit]
Description={{ display_name }}
After=network.target

[Service]
Type=simple
{%- for assignment in environment %}
Environment={{ assignment }}
{%- endfor %}
ExecStart={{ exec_start }}
Restart=on-failure
RestartSec=5

[Install]
WantedBy=multi-user.target
";

/// Render the unit file for a service registration
pub fn render_unit(
    spec: &ServiceSpec,
    registration: &Registration,
) -> Result<String, ManagerError> {
    let exec_start = std::iter::once(registration.executable.display().to_string())
        .chain(registration.args.iter().cloned())
        .map(|word| quote_word(&word))
        .collect::<Vec<_>>()
        .join(" ");

    // `%` starts a systemd specifier, so it's doubled in assignments
    let environment: Vec<String> = registration
        .env
        .iter()
        .map(|(key, value)| quote_word(&format!("{}={}", key, value).replace('%', "%%")))
        .collect();

    let env = Environment::new();
    let tmpl = env
        .template_from_str(UNIT_TEMPLATE)
        .map_err(|e| ManagerError::CommandFailed(format!("unit template: {}", e)))?;
    tmpl.render(context! {
        description => spec.description,
        display_name => spec.display_name,
        exec_start => exec_start,
        environment => environment,
    })
    .map_err(|e| ManagerError::CommandFailed(format!("unit template: {}", e)))
}

/// Quote a command-line word for ExecStart if it needs it
fn quote_word(word: &str) -> String {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '"' || c == '\\')
    {
        return word.to_string();
    }
    let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// systemd-backed adapter driving `systemctl`
#[derive(Clone, Debug)]
pub struct SystemdAdapter {
    unit_dir: PathBuf,
    systemctl: PathBuf,
}

impl Default for SystemdAdapter {
    fn default() -> Self {
        Self::new(PathBuf::from("/etc/systemd/system"), PathBuf::from("systemctl"))
    }
}

impl SystemdAdapter {
    pub fn new(unit_dir: PathBuf, systemctl: PathBuf) -> Self {
        Self { unit_dir, systemctl }
    }

    /// Path of the unit file for `name`
    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.unit_dir.join(unit_name(name))
    }

    fn require_installed(&self, name: &str) -> Result<PathBuf, ManagerError> {
        let path = self.unit_path(name);
        if !path.is_file() {
            return Err(ManagerError::NotInstalled(name.to_string()));
        }
        Ok(path)
    }

    /// Run systemctl, failing on a non-zero exit status
    async fn systemctl(&self, args: &[&str]) -> Result<String, ManagerError> {
        let output = Command::new(&self.systemctl)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                ManagerError::CommandFailed(format!("{}: {}", self.systemctl.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::CommandFailed(format!(
                "systemctl {} ({}): {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn unit_name(name: &str) -> String {
    format!("{}.service", name)
}

#[async_trait]
impl ServiceManagerAdapter for SystemdAdapter {
    async fn install(
        &self,
        spec: &ServiceSpec,
        registration: &Registration,
    ) -> Result<(), ManagerError> {
        let path = self.unit_path(spec.name);
        if path.exists() {
            return Err(ManagerError::AlreadyInstalled(spec.name.to_string()));
        }

        let unit = render_unit(spec, registration)?;
        tokio::fs::create_dir_all(&self.unit_dir).await?;
        tokio::fs::write(&path, unit).await?;

        let unit = unit_name(spec.name);
        let registered = async {
            self.systemctl(&["daemon-reload"]).await?;
            self.systemctl(&["enable", &unit]).await
        }
        .await;

        if let Err(e) = registered {
            // Leave no unit behind, on disk or loaded
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    unit = %path.display(),
                    error = %rm,
                    "rollback: failed to remove unit file"
                );
            }
            if let Err(reload) = self.systemctl(&["daemon-reload"]).await {
                tracing::warn!(error = %reload, "rollback: daemon-reload failed");
            }
            return Err(e);
        }
        Ok(())
    }

    async fn uninstall(&self, name: &str) -> Result<(), ManagerError> {
        let path = self.require_installed(name)?;
        let unit = unit_name(name);

        self.systemctl(&["stop", &unit]).await?;
        self.systemctl(&["disable", &unit]).await?;
        tokio::fs::remove_file(&path).await?;

        if let Err(e) = self.systemctl(&["daemon-reload"]).await {
            tracing::warn!(error = %e, "daemon-reload after uninstall failed");
        }
        Ok(())
    }

    async fn start(&self, name: &str) -> Result<(), ManagerError> {
        self.require_installed(name)?;
        self.systemctl(&["start", &unit_name(name)]).await?;
        Ok(())
    }

    async fn stop(&self, name: &str) -> Result<(), ManagerError> {
        self.require_installed(name)?;
        self.systemctl(&["stop", &unit_name(name)]).await?;
        Ok(())
    }

    async fn status(&self, name: &str) -> Result<ServiceStatus, ManagerError> {
        if !self.unit_path(name).is_file() {
            return Ok(ServiceStatus::NotInstalled);
        }

        // is-active exits non-zero for anything but "active", so read stdout directly
        let output = Command::new(&self.systemctl)
            .args(["is-active", &unit_name(name)])
            .output()
            .await
            .map_err(|e| {
                ManagerError::CommandFailed(format!("{}: {}", self.systemctl.display(), e))
            })?;

        let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(parse_active_state(&state))
    }
}

/// Map `systemctl is-active` output to a service status
pub(crate) fn parse_active_state(state: &str) -> ServiceStatus {
    match state {
        "active" | "reloading" => ServiceStatus::Running,
        "inactive" | "failed" => ServiceStatus::Stopped,
        other => ServiceStatus::Unknown(other.to_string()),
    }
}

#[cfg(test)]
#[path = "systemd_tests.rs"]
mod tests;
