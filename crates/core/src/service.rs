// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service identity, control verbs and manager-reported status

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity presented to the host service manager at registration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    /// Service identifier (unit name on systemd, service key on Windows)
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

/// The one service this binary registers
pub const POD_CRYPTO_SERVICE: ServiceSpec = ServiceSpec {
    name: "POD-CryptoService",
    display_name: "Print on Demand Cryptographic Service",
    description: "Handles cryptographic operations for POD system",
};

/// Lifecycle action forwarded to the host service manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlVerb {
    Install,
    Uninstall,
    Start,
    Stop,
    Restart,
    Status,
}

impl ControlVerb {
    pub const ALL: [ControlVerb; 6] = [
        ControlVerb::Install,
        ControlVerb::Uninstall,
        ControlVerb::Start,
        ControlVerb::Stop,
        ControlVerb::Restart,
        ControlVerb::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlVerb::Install => "install",
            ControlVerb::Uninstall => "uninstall",
            ControlVerb::Start => "start",
            ControlVerb::Stop => "stop",
            ControlVerb::Restart => "restart",
            ControlVerb::Status => "status",
        }
    }

    /// Whether the verb changes the registered service's state
    pub fn is_mutating(&self) -> bool {
        !matches!(self, ControlVerb::Status)
    }
}

impl fmt::Display for ControlVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized control verb '{0}' (expected one of: install, uninstall, start, stop, restart, status)")]
pub struct VerbError(pub String);

impl FromStr for ControlVerb {
    type Err = VerbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlVerb::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| VerbError(s.to_string()))
    }
}

/// Service state as reported by the host service manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ServiceStatus {
    NotInstalled,
    Stopped,
    Running,
    /// Transitional or unrecognized state, with the manager's own wording
    Unknown(String),
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::NotInstalled => write!(f, "not installed"),
            ServiceStatus::Stopped => write!(f, "stopped"),
            ServiceStatus::Running => write!(f, "running"),
            ServiceStatus::Unknown(detail) => write!(f, "unknown ({})", detail),
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
