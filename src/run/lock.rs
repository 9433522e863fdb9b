//! Cross-process run lock.
//!
//! Only one ingest run may write to a database at a time. The lock is an
//! exclusive advisory lock on a file next to the database. The operating
//! system releases it when the holding process exits, so a run that is killed
//! never blocks later runs. Waiters poll until the timeout and then give up.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::config::RUN_LOCK_POLL_INTERVAL;
use crate::error_handling::RunError;

/// Held for the duration of a run; the lock is released on drop.
///
/// The lock file itself stays on disk.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// Waits up to `timeout` for the lock at `path`, creating the file if
    /// needed.
    ///
    /// # Errors
    ///
    /// `RunError::LockContention` when another holder keeps the lock past the
    /// timeout, `RunError::LockIo` when the file can't be opened or locked.
    pub async fn acquire(path: impl AsRef<Path>, timeout: Duration) -> Result<Self, RunError> {
        let path = path.as_ref().to_path_buf();
        let file = match tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await
        {
            Ok(file) => file.into_std().await,
            Err(source) => return Err(RunError::LockIo { path, source }),
        };

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    log::debug!("Acquired run lock {}", path.display());
                    return Ok(Self { path, file });
                }
                Err(e) if is_contended(&e) => {
                    if started.elapsed() >= timeout {
                        return Err(RunError::LockContention {
                            path,
                            waited_secs: timeout.as_secs(),
                        });
                    }
                    tokio::time::sleep(RUN_LOCK_POLL_INTERVAL).await;
                }
                Err(source) => return Err(RunError::LockIo { path, source }),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("Failed to release run lock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lock_is_released_on_drop() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("news.db.lock");

        let lock = RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect("first acquire");
        assert!(path.exists());
        drop(lock);

        RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect("reacquire after release");
    }

    #[tokio::test]
    async fn test_leftover_file_without_holder_is_not_contention() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("news.db.lock");
        std::fs::write(&path, b"").expect("leftover lock file");

        let lock = RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect("leftover file must not block");
        assert_eq!(lock.path(), path.as_path());
    }

    #[tokio::test]
    async fn test_contention_times_out() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("news.db.lock");
        let _held = RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect("first acquire");

        let started = Instant::now();
        let err = RunLock::acquire(&path, Duration::from_millis(300))
            .await
            .expect_err("second acquire must fail");
        assert!(matches!(err, RunError::LockContention { .. }));
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_waiter_gets_lock_when_released() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("news.db.lock");
        let held = RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect("first acquire");

        let waiter = {
            let path = path.clone();
            tokio::spawn(async move { RunLock::acquire(&path, Duration::from_secs(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(250)).await;
        drop(held);
        assert!(waiter.await.expect("join").is_ok());
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_io_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("news.db.lock");
        let err = RunLock::acquire(&path, Duration::from_millis(50))
            .await
            .expect_err("no directory");
        assert!(matches!(err, RunError::LockIo { .. }));
    }
}
