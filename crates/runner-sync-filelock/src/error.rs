//! Error types for the advisory file lock.

use runner_sync_core::SyncError;
use std::io;
use std::path::PathBuf;

/// Errors that can occur when acquiring or releasing a file lock.
#[derive(Debug, thiserror::Error)]
pub enum FileLockError {
    /// Another holder owns the lock and a non-blocking request was made.
    #[error("lock unavailable: {} is held by another holder", .path.display())]
    LockUnavailable {
        /// The resolved lock file path.
        path: PathBuf,
    },

    /// A relative lock name was given but no home directory could be found.
    #[error("cannot resolve lock name {name:?}: no home directory")]
    HomeDirUnavailable {
        /// The relative name that could not be resolved.
        name: PathBuf,
    },

    /// Directory creation, file open, lock, or unlock failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// The OS error.
        #[source]
        source: io::Error,
    },
}

impl FileLockError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        FileLockError::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` if the lock was held elsewhere.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FileLockError::LockUnavailable { .. })
    }
}

/// Result type for file lock operations.
pub type Result<T> = std::result::Result<T, FileLockError>;

impl<E> From<FileLockError> for SyncError<E> {
    fn from(err: FileLockError) -> Self {
        match err {
            FileLockError::LockUnavailable { path } => SyncError::LockUnavailable { path },
            FileLockError::HomeDirUnavailable { name } => SyncError::Io {
                context: format!("resolving lock name {}", name.display()),
                source: io::Error::new(io::ErrorKind::NotFound, "no home directory"),
            },
            FileLockError::Io { context, source } => SyncError::Io { context, source },
        }
    }
}
