// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat worker: a single background task that sleeps a fixed interval
//! and emits a liveness record each cycle until cancelled.
//!
//! The worker moves through `Idle -> Running -> Stopped` exactly once.
//! The sleep races the cancellation signal, so a stop request takes effect
//! without waiting out the current interval.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};

/// Lifecycle state of the heartbeat worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "idle"),
            WorkerState::Running => write!(f, "running"),
            WorkerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Liveness record emitted once per cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    /// 1-based cycle number
    pub seq: u64,
    /// Time since the worker entered `Running`
    pub uptime: Duration,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("heartbeat interval must be greater than zero")]
    ZeroInterval,

    #[error("heartbeat worker cannot start from state '{0}'")]
    AlreadyStarted(WorkerState),

    #[error("heartbeat worker did not stop within {0:?}")]
    StopTimeout(Duration),
}

/// Periodic liveness emitter
pub struct HeartbeatWorker<C: Clock = SystemClock> {
    interval: Duration,
    clock: C,
    state: Arc<watch::Sender<WorkerState>>,
}

impl HeartbeatWorker<SystemClock> {
    pub fn new(interval: Duration) -> Result<Self, WorkerError> {
        Self::with_clock(interval, SystemClock)
    }
}

impl<C: Clock> HeartbeatWorker<C> {
    pub fn with_clock(interval: Duration, clock: C) -> Result<Self, WorkerError> {
        if interval.is_zero() {
            return Err(WorkerError::ZeroInterval);
        }
        let (state, _) = watch::channel(WorkerState::Idle);
        Ok(Self {
            interval,
            clock,
            state: Arc::new(state),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Launch the loop on `runtime` and return immediately.
    ///
    /// The first heartbeat is emitted one full interval after this returns.
    pub fn start(&self, runtime: &Handle) -> Result<HeartbeatHandle, WorkerError> {
        let mut prior = WorkerState::Idle;
        let transitioned = self.state.send_if_modified(|state| {
            prior = *state;
            if *state == WorkerState::Idle {
                *state = WorkerState::Running;
                true
            } else {
                false
            }
        });
        if !transitioned {
            return Err(WorkerError::AlreadyStarted(prior));
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (beat_tx, beat_rx) = watch::channel(None);

        runtime.spawn(run_loop(
            self.interval,
            self.clock.clone(),
            cancel_rx,
            beat_tx,
            Arc::clone(&self.state),
        ));

        Ok(HeartbeatHandle {
            cancel: cancel_tx,
            state: self.state.subscribe(),
            beats: beat_rx,
        })
    }
}

async fn run_loop<C: Clock>(
    interval: Duration,
    clock: C,
    mut cancel: watch::Receiver<bool>,
    beats: watch::Sender<Option<Heartbeat>>,
    state: Arc<watch::Sender<WorkerState>>,
) {
    info!(interval_ms = interval.as_millis() as u64, "Service started");
    let started = clock.now();
    let mut seq = 0u64;

    loop {
        tokio::select! {
            biased;
            // Err means every handle was dropped, which also cancels
            _ = cancel.wait_for(|stop| *stop) => break,
            _ = tokio::time::sleep(interval) => {}
        }

        seq += 1;
        let beat = Heartbeat {
            seq,
            uptime: clock.since(started),
        };
        info!(seq, uptime_secs = beat.uptime.as_secs(), "Service heartbeat");
        beats.send_replace(Some(beat));
    }

    state.send_replace(WorkerState::Stopped);
    debug!(beats = seq, "heartbeat loop exited");
}

/// Control handle for a running worker. Dropping it cancels the loop.
pub struct HeartbeatHandle {
    cancel: watch::Sender<bool>,
    state: watch::Receiver<WorkerState>,
    beats: watch::Receiver<Option<Heartbeat>>,
}

impl HeartbeatHandle {
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Most recent heartbeat, if any cycle has completed
    pub fn last_beat(&self) -> Option<Heartbeat> {
        *self.beats.borrow()
    }

    /// Wait until at least `seq` heartbeats have been emitted.
    ///
    /// Returns `None` if the worker stopped first.
    pub async fn wait_for_beat(&self, seq: u64) -> Option<Heartbeat> {
        let mut beats = self.beats.clone();
        let reached = beats
            .wait_for(|beat| beat.is_some_and(|b| b.seq >= seq))
            .await
            .ok()
            .and_then(|beat| *beat);
        reached
    }

    /// Raise the cancellation signal without waiting
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Cancel the loop and wait for it to reach `Stopped`, bounded by `timeout`.
    pub async fn stop(&self, timeout: Duration) -> Result<(), WorkerError> {
        self.cancel();
        let mut state = self.state.clone();
        let waited = tokio::time::timeout(
            timeout,
            state.wait_for(|s| *s == WorkerState::Stopped),
        )
        .await
        .map(|_| ());
        waited.map_err(|_| WorkerError::StopTimeout(timeout))
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
