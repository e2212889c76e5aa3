//! Shared helpers for podsvc specs.

#![allow(dead_code, deprecated)]

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use tempfile::TempDir;

/// Heartbeat interval used whenever a spec runs the service
pub const TEST_INTERVAL_MS: u64 = 100;

/// An isolated state directory standing in for a host
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join("logs").join("service.log")
    }

    pub fn unit_dir(&self) -> PathBuf {
        self.path().join("units")
    }

    pub fn unit_path(&self) -> PathBuf {
        self.unit_dir().join("POD-CryptoService.service")
    }

    /// Write a file relative to the state dir, creating parent dirs
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// `podsvc` with the environment pointed at this project.
    ///
    /// The service manager is a systemctl stand-in that always fails, so
    /// nothing here can reach the real host.
    pub fn podsvc(&self) -> CliBuilder {
        CliBuilder::new()
            .env("PODSVC_STATE_DIR", self.path())
            .env("PODSVC_UNIT_DIR", self.unit_dir())
            .env("PODSVC_SYSTEMCTL", "false")
            .env("PODSVC_HEARTBEAT_INTERVAL_MS", TEST_INTERVAL_MS.to_string())
    }
}

/// `podsvc` with no project environment (help, parse errors)
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().into_owned(),
        ));
        self
    }

    fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("podsvc").expect("podsvc binary");
        cmd.env_remove("PODSVC_CONFIG")
            .env_remove("PODSVC_LOG_PATH")
            .env_remove("RUST_LOG")
            .args(&self.args)
            .timeout(Duration::from_secs(30));
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn run(&self) -> Output {
        self.command().output().expect("run podsvc")
    }

    /// Run and require exit code 0
    pub fn passes(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\n{}",
            run.output.status.code(),
            run.dump()
        );
        run
    }

    /// Run and require a non-zero exit
    pub fn fails(self) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert!(
            !run.output.status.success(),
            "expected failure\n{}",
            run.dump()
        );
        run
    }

    /// Run and require a specific exit code
    pub fn exits(self, code: i32) -> RunAssert {
        let output = self.run();
        let run = RunAssert { output };
        assert_eq!(run.output.status.code(), Some(code), "{}", run.dump());
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    fn dump(&self) -> String {
        format!("stdout:\n{}\nstderr:\n{}", self.stdout(), self.stderr())
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout().contains(needle),
            "stdout missing '{}'\n{}",
            needle,
            self.dump()
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout().contains(needle),
            "stdout unexpectedly has '{}'\n{}",
            needle,
            self.dump()
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr().contains(needle),
            "stderr missing '{}'\n{}",
            needle,
            self.dump()
        );
        self
    }
}
