//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_lifecycle_verbs() {
    let run = cli().args(&["--help"]).passes();
    for verb in ["install", "uninstall", "start", "stop", "restart", "status", "logs"] {
        assert!(run.stdout().contains(verb), "help missing '{}'", verb);
    }
}

#[test]
fn help_explains_no_command_runs_the_service() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("With no command, runs as the service itself");
}

#[test]
fn version_prints_package_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn completions_generate_for_bash() {
    cli()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("podsvc");
}
