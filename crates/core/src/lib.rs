// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! podsvc-core: Core library for the POD service host
//!
//! This crate provides:
//! - The fixed service identity presented to the host service manager
//! - Control verbs and service status as reported by the manager
//! - The heartbeat worker state machine
//! - A clock abstraction for testable time handling

pub mod clock;
pub mod heartbeat;
pub mod service;

pub use clock::{Clock, FakeClock, SystemClock};
pub use heartbeat::{Heartbeat, HeartbeatHandle, HeartbeatWorker, WorkerError, WorkerState};
pub use service::{ControlVerb, ServiceSpec, ServiceStatus, VerbError, POD_CRYPTO_SERVICE};
