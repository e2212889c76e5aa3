//! Argument and configuration error specs

use crate::prelude::*;

#[test]
fn unrecognized_verb_is_a_usage_error() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["frobnicate"])
        .exits(2)
        .stderr_has("unrecognized subcommand");
}

#[test]
fn unrecognized_verb_touches_nothing() {
    let project = Project::empty();

    project.podsvc().args(&["reinstall"]).exits(2);

    assert!(!project.log_path().exists());
    assert!(!project.unit_dir().exists());
}

#[test]
fn missing_explicit_config_fails() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["--config", "nope.toml", "status"])
        .exits(1)
        .stderr_has("config file not found");
}

#[test]
fn zero_heartbeat_interval_is_rejected() {
    let project = Project::empty();

    project
        .podsvc()
        .env("PODSVC_HEARTBEAT_INTERVAL_MS", "0")
        .exits(1)
        .stderr_has("greater than zero");

    assert!(!project.log_path().exists());
}

#[test]
fn malformed_env_override_is_rejected() {
    let project = Project::empty();

    project
        .podsvc()
        .env("PODSVC_STOP_TIMEOUT_MS", "soon")
        .args(&["status"])
        .exits(1)
        .stderr_has("PODSVC_STOP_TIMEOUT_MS");
}

#[test]
fn unknown_config_key_is_rejected() {
    let project = Project::empty();
    project.file("podsvc.toml", "heartbeat = \"5s\"\n");

    project
        .podsvc()
        .args(&["status"])
        .exits(1)
        .stderr_has("invalid config file");
}
