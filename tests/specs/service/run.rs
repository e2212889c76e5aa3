//! Run mode specs

#![cfg(unix)]

use crate::prelude::*;

#[test]
fn run_then_sigterm_exits_zero_and_logs_the_stop() {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    let project = Project::empty();
    let mut child = Command::new(assert_cmd::cargo::cargo_bin("podsvc"))
        .env("PODSVC_STATE_DIR", project.path())
        .env("PODSVC_HEARTBEAT_INTERVAL_MS", TEST_INTERVAL_MS.to_string())
        .env_remove("PODSVC_CONFIG")
        .env_remove("PODSVC_LOG_PATH")
        .env_remove("RUST_LOG")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let log = project.log_path();
    while Instant::now() < deadline {
        let content = std::fs::read_to_string(&log).unwrap_or_default();
        if content.matches("Service heartbeat").count() >= 2 {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).unwrap();
    let status = child.wait().unwrap();
    assert!(status.success(), "{:?}", status);

    project
        .podsvc()
        .args(&["logs", "--current"])
        .passes()
        .stdout_has("Service heartbeat")
        .stdout_has("Service stopped");
}
