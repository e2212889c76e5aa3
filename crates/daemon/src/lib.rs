// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POD service host: configuration, logging and the service lifecycle.
//!
//! The binary calls [`lifecycle::run_service`] when launched with no
//! arguments and [`control::ServiceControl`] for lifecycle verbs.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod control;
pub mod lifecycle;
pub mod lock;
pub mod logging;
#[cfg(windows)]
mod windows;

pub use config::{Config, ConfigError};
pub use control::{platform_manager, ControlError, ControlOutcome, ServiceControl};
pub use lifecycle::{run_service, LifecycleError, ServiceController};
pub use lock::{InstanceLock, LockError};
pub use logging::{LoggingError, STARTUP_MARKER_PREFIX};
