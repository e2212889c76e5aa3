// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn lock_records_pid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state/podsvc.pid");

    let lock = InstanceLock::acquire(&path).unwrap();

    let pid: u32 = std::fs::read_to_string(lock.path())
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert_eq!(pid, std::process::id());
}

#[test]
fn second_lock_is_rejected_while_held() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("podsvc.pid");

    let _held = InstanceLock::acquire(&path).unwrap();
    let err = InstanceLock::acquire(&path).unwrap_err();

    assert!(matches!(err, LockError::Held(..)));
    assert!(err.to_string().contains("already running"));
}

#[test]
fn lock_file_is_removed_on_drop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("podsvc.pid");

    drop(InstanceLock::acquire(&path).unwrap());

    assert!(!path.exists());
    // And can be taken again
    InstanceLock::acquire(&path).unwrap();
}

#[test]
fn stale_lock_file_is_reused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("podsvc.pid");
    std::fs::write(&path, "99999999\n").unwrap();

    let lock = InstanceLock::acquire(&path).unwrap();
    let content = std::fs::read_to_string(lock.path()).unwrap();
    assert_eq!(content.trim(), std::process::id().to_string());
}
