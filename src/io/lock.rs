use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lock file guarding writes to the store
pub const STORE_LOCK: &str = ".lock";
/// Lock file guarding rewrites of the recovery log
pub const RECOVERY_LOCK: &str = ".recovery.lock";

const STORE_LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another zw process may be writing")]
    Timeout { path: PathBuf },
}

/// Advisory flock on a named file in the data directory.
///
/// The TUI and any number of CLI invocations share the data directory; each
/// write path takes the lock for its file first. Released when dropped. The
/// lock file itself stays, so every waiter contends on the same inode.
pub struct DirLock {
    _file: File,
}

impl DirLock {
    /// Lock `dir/name`, retrying until `timeout` runs out
    pub fn acquire(dir: &Path, name: &str, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(lock) = DirLock::try_acquire(dir, name)? {
                return Ok(lock);
            }
            if Instant::now() >= deadline {
                return Err(LockError::Timeout {
                    path: dir.join(name),
                });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
    }

    /// Lock `dir/name` if nobody else holds it
    pub fn try_acquire(dir: &Path, name: &str) -> Result<Option<Self>, LockError> {
        let path = dir.join(name);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;
        if flock_exclusive(&file) {
            Ok(Some(DirLock { _file: file }))
        } else {
            Ok(None)
        }
    }

    /// The store write lock, waiting up to five seconds
    pub fn store(dir: &Path) -> Result<Self, LockError> {
        DirLock::acquire(dir, STORE_LOCK, STORE_LOCK_TIMEOUT)
    }
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> bool {
    true
}
