//! Log viewer specs

use crate::prelude::*;

const TWO_RUNS: &str = "\
2026-01-01T00:00:00.000000Z --- podsvc: starting (pid: 10) ---
2026-01-01T00:00:00.100000Z  INFO Service initialization started
2026-01-01T00:00:09.000000Z  INFO Service stopped
2026-01-02T00:00:00.000000Z --- podsvc: starting (pid: 20) ---
2026-01-02T00:00:00.100000Z  INFO Service initialization started
2026-01-02T00:00:05.100000Z  INFO Service heartbeat seq=1
";

#[test]
fn logs_without_a_log_file() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["logs"])
        .passes()
        .stdout_has("No log file yet");
}

#[test]
fn logs_prints_the_tail() {
    let project = Project::empty();
    project.file("logs/service.log", TWO_RUNS);

    project
        .podsvc()
        .args(&["logs", "--lines", "2"])
        .passes()
        .stdout_has("pid: 20")
        .stdout_has("heartbeat seq=1")
        .stdout_lacks("pid: 10");
}

#[test]
fn logs_current_run_only() {
    let project = Project::empty();
    project.file("logs/service.log", TWO_RUNS);

    project
        .podsvc()
        .args(&["logs", "--current"])
        .passes()
        .stdout_has("pid: 20")
        .stdout_lacks("Service stopped");
}
