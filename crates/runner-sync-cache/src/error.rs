//! Error types for the cache.

use runner_sync_core::SyncError;

/// Errors that can occur in the cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The requested key has no live entry.
    #[error("key not found: {key:?}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },
}

impl CacheError {
    /// Returns the key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            CacheError::KeyNotFound { key } => key,
        }
    }
}

impl<E> From<CacheError> for SyncError<E> {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::KeyNotFound { key } => SyncError::KeyNotFound { key },
        }
    }
}
