//! Configuration for the file lock.

use crate::backend::LockBackend;
use crate::events::FileLockEvent;
use runner_sync_core::events::{EventListeners, FnListener};
use std::path::PathBuf;
use std::time::Duration;

/// Directory under the user's home that relative lock names resolve into.
pub const DEFAULT_LOCK_DIR: &str = ".runner";

/// Configuration for a [`FileLock`](crate::FileLock).
#[derive(Clone)]
pub struct FileLockConfig {
    /// Directory relative lock names resolve into. `None` means
    /// `$HOME/.runner`, looked up at acquisition time.
    pub(crate) base_dir: Option<PathBuf>,
    /// Locking API used for every acquisition.
    pub(crate) backend: LockBackend,
    /// Name of this lock instance.
    pub(crate) name: String,
    /// Event listeners.
    pub(crate) event_listeners: EventListeners<FileLockEvent>,
}

impl FileLockConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> FileLockConfigBuilder {
        FileLockConfigBuilder::new()
    }
}

/// Builder for file lock configuration.
pub struct FileLockConfigBuilder {
    base_dir: Option<PathBuf>,
    backend: LockBackend,
    name: String,
    event_listeners: EventListeners<FileLockEvent>,
}

impl FileLockConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            base_dir: None,
            backend: LockBackend::detect(),
            name: "file-lock".to_string(),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the directory that relative lock names resolve into.
    ///
    /// Default: `$HOME/.runner`
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Overrides the locking backend.
    ///
    /// Default: [`LockBackend::detect()`]
    pub fn backend(mut self, backend: LockBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the name of this lock instance for observability.
    ///
    /// Default: "file-lock"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked when a lock is granted.
    ///
    /// The callback receives the resolved path and the time spent waiting.
    pub fn on_acquired<F>(mut self, f: F) -> Self
    where
        F: Fn(&PathBuf, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let FileLockEvent::Acquired { path, waited, .. } = event {
                f(path, *waited);
            }
        }));
        self
    }

    /// Registers a callback invoked when a non-blocking request is refused.
    pub fn on_unavailable<F>(mut self, f: F) -> Self
    where
        F: Fn(&PathBuf) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let FileLockEvent::Unavailable { path, .. } = event {
                f(path);
            }
        }));
        self
    }

    /// Registers a callback invoked after a lock is released.
    ///
    /// The callback receives the resolved path and how long it was held.
    pub fn on_released<F>(mut self, f: F) -> Self
    where
        F: Fn(&PathBuf, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let FileLockEvent::Released { path, held, .. } = event {
                f(path, *held);
            }
        }));
        self
    }

    /// Builds the file lock.
    pub fn build(self) -> crate::FileLock {
        let config = FileLockConfig {
            base_dir: self.base_dir,
            backend: self.backend,
            name: self.name,
            event_listeners: self.event_listeners,
        };
        crate::FileLock::with_config(config)
    }
}

impl Default for FileLockConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
