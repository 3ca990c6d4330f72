//! Common error type for runner-sync primitives.
//!
//! Each primitive crate has its own error enum (`CacheError`, `PoolError`,
//! `FileLockError`). Code that uses several of them at once, such as a test
//! runner that holds a file lock while feeding a worker pool and correlating
//! ids through a cache, can use [`SyncError`] instead and rely on the `From`
//! conversions each crate provides:
//!
//! ```rust
//! use runner_sync_core::SyncError;
//!
//! #[derive(Debug)]
//! struct UploadFailed;
//!
//! impl std::fmt::Display for UploadFailed {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "upload failed")
//!     }
//! }
//!
//! impl std::error::Error for UploadFailed {}
//!
//! fn report(err: SyncError<UploadFailed>) {
//!     match err {
//!         SyncError::KeyNotFound { key } => eprintln!("no cached id for {}", key),
//!         SyncError::LockUnavailable { path } => eprintln!("{} is busy", path.display()),
//!         SyncError::Handler(e) => eprintln!("step failed: {}", e),
//!         other => eprintln!("{}", other),
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A common error type that wraps every runner-sync primitive error.
///
/// # Type Parameters
///
/// - `E`: the error type of the caller's own code, carried by [`SyncError::Handler`]
#[derive(Debug)]
pub enum SyncError<E> {
    /// A cache lookup found no entry for the key.
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// A non-blocking file lock request found the lock held elsewhere.
    LockUnavailable {
        /// The resolved lock file path.
        path: PathBuf,
    },

    /// An underlying filesystem or locking syscall failed.
    Io {
        /// What was being attempted.
        context: String,
        /// The OS error.
        source: io::Error,
    },

    /// The worker pool rejected an operation.
    Pool {
        /// Description of the rejection.
        reason: String,
    },

    /// A failure from the caller's own code.
    ///
    /// No primitive produces this variant: the worker pool logs handler
    /// failures instead of returning them. Callers wrap their own step
    /// errors here (a rejected HTTP call, a failed assertion) so one
    /// `Result<_, SyncError<E>>` covers both the primitives and their work.
    Handler(E),
}

impl<E> fmt::Display for SyncError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::KeyNotFound { key } => write!(f, "key not found: {}", key),
            SyncError::LockUnavailable { path } => {
                write!(f, "lock unavailable: {}", path.display())
            }
            SyncError::Io { context, source } => write!(f, "{}: {}", context, source),
            SyncError::Pool { reason } => write!(f, "worker pool: {}", reason),
            SyncError::Handler(e) => write!(f, "handler failure: {}", e),
        }
    }
}

impl<E> std::error::Error for SyncError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Io { source, .. } => Some(source),
            SyncError::Handler(e) => Some(e),
            _ => None,
        }
    }
}

// From implementations for each primitive error live in the primitive crates.

impl<E> SyncError<E> {
    /// Returns `true` if this is a cache miss.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, SyncError::KeyNotFound { .. })
    }

    /// Returns `true` if a file lock was held elsewhere.
    pub fn is_lock_unavailable(&self) -> bool {
        matches!(self, SyncError::LockUnavailable { .. })
    }

    /// Returns `true` if this is an I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self, SyncError::Io { .. })
    }

    /// Returns `true` if this is a worker pool rejection.
    pub fn is_pool(&self) -> bool {
        matches!(self, SyncError::Pool { .. })
    }

    /// Returns `true` if this wraps a failure from the caller's own code.
    pub fn is_handler(&self) -> bool {
        matches!(self, SyncError::Handler(_))
    }

    /// Extracts the handler error, if this is a `Handler` variant.
    pub fn handler_error(self) -> Option<E> {
        match self {
            SyncError::Handler(e) => Some(e),
            _ => None,
        }
    }

    /// Maps the handler error using a function.
    ///
    /// # Examples
    ///
    /// ```
    /// use runner_sync_core::SyncError;
    ///
    /// let err: SyncError<String> = SyncError::Handler("timeout".to_string());
    /// let mapped: SyncError<usize> = err.map_handler(|s| s.len());
    /// assert_eq!(mapped.handler_error(), Some(7));
    /// ```
    pub fn map_handler<F, T>(self, f: F) -> SyncError<T>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            SyncError::KeyNotFound { key } => SyncError::KeyNotFound { key },
            SyncError::LockUnavailable { path } => SyncError::LockUnavailable { path },
            SyncError::Io { context, source } => SyncError::Io { context, source },
            SyncError::Pool { reason } => SyncError::Pool { reason },
            SyncError::Handler(e) => SyncError::Handler(f(e)),
        }
    }
}
