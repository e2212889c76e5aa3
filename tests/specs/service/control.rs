//! Control verb specs
//!
//! The systemd adapter is pointed at a scratch unit directory and a
//! stand-in `systemctl`, so these never reach the real host.

use crate::prelude::*;

#[test]
fn start_when_not_installed_fails() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["start"])
        .exits(1)
        .stderr_has("failed to start service POD-CryptoService");
}

#[cfg(target_os = "linux")]
#[test]
fn start_when_not_installed_suggests_install() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["start"])
        .fails()
        .stderr_has("not installed")
        .stderr_has("podsvc install");
}

#[cfg(target_os = "linux")]
#[test]
fn control_failure_is_recorded_in_the_log() {
    let project = Project::empty();

    project.podsvc().args(&["stop"]).fails();

    let log = std::fs::read_to_string(project.log_path()).unwrap();
    assert!(log.contains("ERROR stop"), "log:\n{}", log);
}

#[cfg(target_os = "linux")]
#[test]
fn status_reports_not_installed() {
    let project = Project::empty();

    project
        .podsvc()
        .args(&["status"])
        .passes()
        .stdout_has("POD-CryptoService")
        .stdout_has("not installed");
}

#[cfg(target_os = "linux")]
#[test]
fn status_as_json() {
    let project = Project::empty();

    let run = project
        .podsvc()
        .args(&["status", "--output", "json"])
        .passes();

    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["service"], "POD-CryptoService");
    assert_eq!(json["status"]["state"], "not_installed");
}

#[cfg(target_os = "linux")]
#[test]
fn install_writes_unit_and_uninstall_removes_it() {
    let project = Project::empty();

    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .args(&["install"])
        .passes()
        .stdout_has("Service POD-CryptoService installed");

    let unit = std::fs::read_to_string(project.unit_path()).unwrap();
    assert!(unit.contains("Description=Print on Demand Cryptographic Service"));
    assert!(unit.contains("ExecStart="));

    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .args(&["install"])
        .fails()
        .stderr_has("already installed");

    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .args(&["uninstall"])
        .passes()
        .stdout_has("uninstalled");
    assert!(!project.unit_path().exists());
}

#[cfg(target_os = "linux")]
#[test]
fn rejected_install_leaves_nothing_behind() {
    let project = Project::empty();

    project.podsvc().args(&["install"]).exits(1);

    assert!(!project.unit_path().exists());
}

#[cfg(target_os = "linux")]
#[test]
fn restart_runs_against_installed_unit() {
    let project = Project::empty();
    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .args(&["install"])
        .passes();

    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .args(&["restart"])
        .passes()
        .stdout_has("restarted");
}

#[cfg(target_os = "linux")]
#[test]
fn install_carries_resolved_config_into_the_unit() {
    let project = Project::empty();
    let config = project.file("podsvc-alt.toml", "heartbeat_interval = \"1s\"\n");
    let log = project.path().join("elsewhere.log");

    project
        .podsvc()
        .env("PODSVC_SYSTEMCTL", "true")
        .env("PODSVC_LOG_PATH", &log)
        .args(&["--config", &config.display().to_string(), "install"])
        .passes();

    let unit = std::fs::read_to_string(project.unit_path()).unwrap();
    for line in [
        format!("Environment=PODSVC_STATE_DIR={}", project.path().display()),
        format!("Environment=PODSVC_LOG_PATH={}", log.display()),
        format!("Environment=PODSVC_CONFIG={}", config.display()),
    ] {
        assert!(unit.contains(&line), "missing {}\nunit:\n{}", line, unit);
    }
    assert!(!unit.contains("HEARTBEAT"), "unit:\n{}", unit);
}
