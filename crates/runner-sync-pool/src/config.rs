//! Configuration for the worker pool.

use crate::events::PoolEvent;
use runner_sync_core::{EventListeners, FnListener};
use std::marker::PhantomData;
use std::time::Duration;

/// Configuration for a [`WorkerPool`](crate::WorkerPool).
pub struct WorkerPoolConfig {
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<PoolEvent>,
}

impl WorkerPoolConfig {
    /// Creates a new configuration builder.
    pub fn builder<T>() -> WorkerPoolConfigBuilder<T> {
        WorkerPoolConfigBuilder::new()
    }
}

/// Builder for a pool that processes items of type `T`.
pub struct WorkerPoolConfigBuilder<T> {
    name: String,
    event_listeners: EventListeners<PoolEvent>,
    _item: PhantomData<fn(T)>,
}

impl<T> WorkerPoolConfigBuilder<T> {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            name: String::from("worker-pool"),
            event_listeners: EventListeners::new(),
            _item: PhantomData,
        }
    }

    /// Sets the name of this pool. Worker threads are named
    /// `<name>-worker-<index>`.
    ///
    /// Default: "worker-pool"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked when a worker picks up an item.
    ///
    /// The callback receives the worker index.
    pub fn on_task_started<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let PoolEvent::TaskStarted { worker, .. } = event {
                f(*worker);
            }
        }));
        self
    }

    /// Registers a callback invoked when a handler returns `Ok`.
    pub fn on_task_completed<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let PoolEvent::TaskCompleted { duration, .. } = event {
                f(*duration);
            }
        }));
        self
    }

    /// Registers a callback invoked when a handler fails or panics.
    ///
    /// The callback receives the rendered error.
    pub fn on_task_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let PoolEvent::TaskFailed { error, .. } = event {
                f(error);
            }
        }));
        self
    }

    /// Registers a callback invoked once every worker has been joined.
    pub fn on_shutdown<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let PoolEvent::Shutdown { duration, .. } = event {
                f(*duration);
            }
        }));
        self
    }

    /// Builds an unstarted pool.
    pub fn build(self) -> crate::WorkerPool<T>
    where
        T: Send + 'static,
    {
        let config = WorkerPoolConfig {
            name: self.name,
            event_listeners: self.event_listeners,
        };
        crate::WorkerPool::with_config(config)
    }
}

impl<T> Default for WorkerPoolConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
