//! Cross-platform advisory file lock.
//!
//! Independent processes (parallel test-runner invocations, for instance)
//! coordinate by locking a shared file path. The lock is advisory: it only
//! excludes other processes that also go through this API.
//!
//! # Basic Example
//!
//! ```rust,no_run
//! use runner_sync_filelock::FileLock;
//!
//! # fn example() -> Result<(), runner_sync_filelock::FileLockError> {
//! let lock = FileLock::new();
//!
//! // Relative names resolve under $HOME/.runner
//! let guard = lock.acquire("nightly-suite.lock")?;
//! // ... exclusive section ...
//! guard.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Non-blocking Acquisition
//!
//! ```rust
//! use runner_sync_filelock::{FileLock, FileLockError};
//!
//! # fn example(dir: &std::path::Path) {
//! let lock = FileLock::builder().base_dir(dir).build();
//!
//! let held = lock.try_acquire("deploy.lock").unwrap();
//! match lock.try_acquire("deploy.lock") {
//!     Err(FileLockError::LockUnavailable { path }) => {
//!         println!("{} is busy, retry later", path.display());
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! held.release().unwrap();
//! # }
//! # let dir = std::env::temp_dir().join("runner-sync-doc");
//! # example(&dir);
//! ```
//!
//! # Backends
//!
//! The lock goes through a [`LockBackend`] chosen once per [`FileLock`]:
//! `flock` on unix and a one-byte `LockFileEx` record lock on Windows.

mod backend;
mod config;
mod error;
mod events;

pub use backend::{LockBackend, LockMode};
pub use config::{FileLockConfig, FileLockConfigBuilder, DEFAULT_LOCK_DIR};
pub use error::{FileLockError, Result};
pub use events::FileLockEvent;

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::counter;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Process-level mutual exclusion over named file paths.
///
/// A `FileLock` is cheap to clone; clones share configuration and listeners.
#[derive(Clone)]
pub struct FileLock {
    config: Arc<FileLockConfig>,
}

impl FileLock {
    /// Creates a lock that resolves relative names under `$HOME/.runner`.
    pub fn new() -> Self {
        FileLockConfig::builder().build()
    }

    /// Creates a new configuration builder.
    pub fn builder() -> FileLockConfigBuilder {
        FileLockConfigBuilder::new()
    }

    pub(crate) fn with_config(config: FileLockConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the name of this lock instance.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the locking backend in use.
    pub fn backend(&self) -> LockBackend {
        self.config.backend
    }

    /// Resolves a lock name to the path that will be locked.
    ///
    /// Absolute paths are returned unchanged; relative names are joined onto
    /// the configured base directory.
    pub fn resolve(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        let name = name.as_ref();
        if name.is_absolute() {
            return Ok(name.to_path_buf());
        }

        let base = match &self.config.base_dir {
            Some(dir) => dir.clone(),
            None => default_base_dir().ok_or_else(|| FileLockError::HomeDirUnavailable {
                name: name.to_path_buf(),
            })?,
        };
        Ok(base.join(name))
    }

    /// Acquires the lock, waiting as long as another holder owns it.
    pub fn acquire(&self, name: impl AsRef<Path>) -> Result<FileLockGuard> {
        self.lock(name, LockMode::Blocking)
    }

    /// Acquires the lock or fails with [`FileLockError::LockUnavailable`]
    /// without waiting.
    pub fn try_acquire(&self, name: impl AsRef<Path>) -> Result<FileLockGuard> {
        self.lock(name, LockMode::NonBlocking)
    }

    /// Acquires the lock in the given mode.
    pub fn lock(&self, name: impl AsRef<Path>, mode: LockMode) -> Result<FileLockGuard> {
        let path = self.resolve(name)?;
        let start = Instant::now();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                FileLockError::io(format!("creating lock directory {}", dir.display()), e)
            })?;
        }

        let file = loop {
            let file = open_lock_file(&path)?;

            let granted = self.config.backend.lock(&file, mode).map_err(|e| {
                FileLockError::io(format!("locking {}", path.display()), e)
            })?;

            if !granted {
                break None;
            }
            if is_still_linked(&file, &path) {
                break Some(file);
            }

            // The previous holder removed the file between our open and lock
            #[cfg(feature = "tracing")]
            debug!(lock = %self.config.name, path = %path.display(), "locked a removed file, retrying");
            let _ = self.config.backend.unlock(&file);
        };

        let Some(file) = file else {
            #[cfg(feature = "metrics")]
            counter!("filelock_acquisitions_total", "lock" => self.config.name.clone(), "result" => "unavailable")
                .increment(1);

            #[cfg(feature = "tracing")]
            debug!(lock = %self.config.name, path = %path.display(), "lock held elsewhere");

            self.config.event_listeners.emit(&FileLockEvent::Unavailable {
                instance_name: self.config.name.clone(),
                timestamp: Instant::now(),
                path: path.clone(),
            });
            return Err(FileLockError::LockUnavailable { path });
        };

        #[cfg(feature = "metrics")]
        counter!("filelock_acquisitions_total", "lock" => self.config.name.clone(), "result" => "acquired")
            .increment(1);

        #[cfg(feature = "tracing")]
        debug!(lock = %self.config.name, path = %path.display(), "lock acquired");

        self.config.event_listeners.emit(&FileLockEvent::Acquired {
            instance_name: self.config.name.clone(),
            timestamp: Instant::now(),
            path: path.clone(),
            waited: start.elapsed(),
        });

        Ok(FileLockGuard {
            file: Some(file),
            path,
            acquired_at: Instant::now(),
            config: Arc::clone(&self.config),
        })
    }
}

impl Default for FileLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FileLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLock")
            .field("name", &self.config.name)
            .field("base_dir", &self.config.base_dir)
            .field("backend", &self.config.backend)
            .finish()
    }
}

/// Proof of holding a file lock.
///
/// The OS handle is owned by the guard. Call [`release`](Self::release) to
/// unlock and observe errors; dropping the guard performs the same cleanup and
/// only logs failures.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct FileLockGuard {
    file: Option<File>,
    path: PathBuf,
    acquired_at: Instant,
    config: Arc<FileLockConfig>,
}

impl FileLockGuard {
    /// Returns the resolved path of the locked file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the lock file, then unlocks and closes the handle.
    ///
    /// A lock file that another holder already removed is not an error.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };

        // Unlink while still holding the lock, and only the file we hold.
        // A waiter blocked on this handle then fails its link check and
        // retries on a fresh file instead of sharing a removed one.
        let removed = if is_still_linked(&file, &self.path) {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(FileLockError::io(
                    format!("removing {}", self.path.display()),
                    e,
                )),
            }
        } else {
            Ok(())
        };

        let unlocked = self
            .config
            .backend
            .unlock(&file)
            .map_err(|e| FileLockError::io(format!("unlocking {}", self.path.display()), e));
        drop(file);
        removed?;
        unlocked?;

        #[cfg(feature = "metrics")]
        counter!("filelock_releases_total", "lock" => self.config.name.clone()).increment(1);

        #[cfg(feature = "tracing")]
        debug!(lock = %self.config.name, path = %self.path.display(), "lock released");

        self.config.event_listeners.emit(&FileLockEvent::Released {
            instance_name: self.config.name.clone(),
            timestamp: Instant::now(),
            path: self.path.clone(),
            held: self.acquired_at.elapsed(),
        });
        Ok(())
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(_e) = self.release_inner() {
            #[cfg(feature = "tracing")]
            warn!(lock = %self.config.name, path = %self.path.display(), error = %_e, "failed to release lock on drop");
        }
    }
}

impl fmt::Debug for FileLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLockGuard")
            .field("path", &self.path)
            .field("held", &self.file.is_some())
            .finish_non_exhaustive()
    }
}

fn default_base_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_LOCK_DIR))
}

/// Returns `true` if `path` still names the file behind `file`.
#[cfg(unix)]
fn is_still_linked(file: &File, path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (file.metadata(), fs::metadata(path)) {
        (Ok(held), Ok(named)) => held.dev() == named.dev() && held.ino() == named.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_still_linked(_file: &File, path: &Path) -> bool {
    path.exists()
}

fn open_lock_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(|e| FileLockError::io(format!("opening lock file {}", path.display()), e))
}
