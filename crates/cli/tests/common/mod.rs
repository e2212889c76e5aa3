// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]
#![allow(deprecated)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Heartbeat interval used by run-mode tests
pub const TEST_INTERVAL_MS: u64 = 100;

/// Isolated state directory for one test
pub struct ServiceEnv {
    pub dir: TempDir,
}

impl ServiceEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("logs").join("service.log")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.path().join("podsvc.pid")
    }

    /// Command with environment pointing at this state dir
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("podsvc"));
        self.apply_env(&mut cmd);
        cmd
    }

    /// assert_cmd variant of [`ServiceEnv::command`]
    pub fn assert_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("podsvc").expect("podsvc binary");
        cmd.env("PODSVC_STATE_DIR", self.state_dir())
            .env("PODSVC_HEARTBEAT_INTERVAL_MS", TEST_INTERVAL_MS.to_string())
            .env("PODSVC_SYSTEMCTL", "false")
            .env("PODSVC_UNIT_DIR", self.state_dir().join("units"))
            .env_remove("PODSVC_CONFIG")
            .env_remove("PODSVC_LOG_PATH")
            .env_remove("RUST_LOG")
            .timeout(Duration::from_secs(30));
        cmd
    }

    fn apply_env(&self, cmd: &mut Command) {
        cmd.env("PODSVC_STATE_DIR", self.state_dir())
            .env("PODSVC_HEARTBEAT_INTERVAL_MS", TEST_INTERVAL_MS.to_string())
            .env_remove("PODSVC_CONFIG")
            .env_remove("PODSVC_LOG_PATH")
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
    }

    /// Launch `podsvc` in run mode
    pub fn spawn_service(&self) -> RunningService {
        self.spawn_with(|_| {})
    }

    pub fn spawn_with(&self, configure: impl FnOnce(&mut Command)) -> RunningService {
        let mut cmd = self.command();
        configure(&mut cmd);
        RunningService {
            child: cmd.spawn().expect("Failed to spawn podsvc"),
        }
    }
}

/// A `podsvc` process in run mode; killed on drop if still alive
pub struct RunningService {
    pub child: Child,
}

impl RunningService {
    pub fn pid(&self) -> i32 {
        self.child.id() as i32
    }

    /// Send SIGTERM and wait for exit
    #[cfg(unix)]
    pub fn terminate(&mut self) -> ExitStatus {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        kill(Pid::from_raw(self.pid()), Signal::SIGTERM).expect("Failed to send SIGTERM");
        self.wait_timeout(Duration::from_secs(10))
            .expect("podsvc did not exit after SIGTERM")
    }

    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().expect("Failed to poll child") {
                return Some(status);
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        None
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Number of occurrences of `needle` in the file (0 if missing)
pub fn count_in_file(path: &Path, needle: &str) -> usize {
    std::fs::read_to_string(path)
        .map(|c| c.matches(needle).count())
        .unwrap_or(0)
}

/// Poll until the file contains `needle` at least `times` times
pub fn wait_for_count(path: &Path, needle: &str, times: usize, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if count_in_file(path, needle) >= times {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}
