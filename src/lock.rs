//! Single-instance lock.
//!
//! A lock file next to the database detects a second running instance. The
//! lock is an OS advisory lock, which vanishes with the owning process, so a
//! file left behind by a crash is reclaimable immediately.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Fixed name of the lock file inside the app data directory.
pub const LOCK_FILE: &str = "linktray.lock";

pub struct InstanceLock {
    file: Option<File>,
    path: PathBuf,
}

impl InstanceLock {
    /// Take the exclusive lock, failing if another live process holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        file.try_lock_exclusive().map_err(|_| Error::AlreadyRunning)?;

        // The flock is the lock; the PID is only recorded for diagnostics.
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(InstanceLock {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = FileExt::unlock(&file);
        }
        let _ = fs::remove_file(&self.path);
    }
}
