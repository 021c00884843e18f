//! Run lock for the pool root.
//!
//! One flock(2) per pool keeps concurrent invocations from racing on the
//! destination key or interleaving run-log appends. The lock file carries
//! no content; holding the open descriptor is the lock.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Block until the pool's lock is ours. Released when dropped.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock = Self::open(path)?;
        lock.file
            .lock_exclusive()
            .with_context(|| format!("acquire lock {}", lock.path.display()))?;
        Ok(lock)
    }

    /// Take the lock only if nobody holds it; `Ok(None)` means busy.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let lock = Self::open(path)?;
        match lock.file.try_lock_exclusive() {
            Ok(()) => Ok(Some(lock)),
            Err(ref e) if is_contended(e) => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("try lock {}", lock.path.display()))
            }
        }
    }

    fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("open lock file {}", path.display()))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

/// fs2 reports a held flock as WouldBlock on most platforms, but on Linux
/// the raw EAGAIN can leak through as ErrorKind::Other.
fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock || e.raw_os_error() == Some(11)
}
