// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance lock for run mode

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("another instance is already running (lock held on {0})")]
    Held(PathBuf, #[source] std::io::Error),

    #[error("failed to create lock file {0}: {1}")]
    Create(PathBuf, #[source] std::io::Error),
}

/// Exclusive lock on the PID file, released and removed on drop
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    file: File,
}

impl InstanceLock {
    /// Take the lock and record our PID in it
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| LockError::Create(path.to_path_buf(), e))?;
        }

        // Open without truncating so a losing instance can't wipe the holder's PID
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockError::Create(path.to_path_buf(), e))?;

        file.try_lock_exclusive()
            .map_err(|e| LockError::Held(path.to_path_buf(), e))?;

        file.set_len(0)
            .and_then(|_| writeln!(file, "{}", std::process::id()))
            .map_err(|e| LockError::Create(path.to_path_buf(), e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove lock file {}: {}", self.path.display(), e);
        }
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
