//! Worker pool implementation.

use crate::config::WorkerPoolConfig;
use crate::error::{PoolError, Result};
use crate::events::PoolEvent;
use crate::state::{PoolState, PoolStats, Shared};
use crossbeam_channel::{Receiver, Sender};
use futures::executor::block_on;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 32;

/// A queued message. Each one carries the admission permit it consumed; the
/// permit is released when the worker is done with the message.
enum Message<T> {
    Task(T, OwnedSemaphorePermit),
    Shutdown(OwnedSemaphorePermit),
}

struct Running<T> {
    sender: Sender<Message<T>>,
    semaphore: Arc<Semaphore>,
    workers: Vec<JoinHandle<()>>,
}

enum Lifecycle<T> {
    Unstarted,
    Running(Running<T>),
    Finished,
}

/// A fixed-size pool of OS threads applying one handler to queued items.
///
/// At most `n` items (the pool size) are admitted at once; [`enqueue`]
/// blocks while all of them are outstanding. [`shutdown`] lets every
/// admitted item finish before joining the workers.
///
/// [`enqueue`]: WorkerPool::enqueue
/// [`shutdown`]: WorkerPool::shutdown
pub struct WorkerPool<T> {
    config: Arc<WorkerPoolConfig>,
    shared: Arc<Shared>,
    lifecycle: RwLock<Lifecycle<T>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Creates an unstarted pool with default configuration.
    pub fn new() -> Self {
        WorkerPoolConfig::builder().build()
    }

    /// Creates a new configuration builder.
    pub fn builder() -> crate::WorkerPoolConfigBuilder<T> {
        crate::WorkerPoolConfigBuilder::new()
    }

    pub(crate) fn with_config(config: WorkerPoolConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "pool_tasks_submitted_total",
                "Total number of items admitted into the pool"
            );
            describe_counter!(
                "pool_tasks_completed_total",
                "Total number of items whose handler succeeded"
            );
            describe_counter!(
                "pool_tasks_failed_total",
                "Total number of items whose handler failed or panicked"
            );
            describe_gauge!(
                "pool_tasks_in_flight",
                "Number of items currently being handled"
            );
        }

        Self {
            config: Arc::new(config),
            shared: Arc::new(Shared::default()),
            lifecycle: RwLock::new(Lifecycle::Unstarted),
        }
    }

    /// Spawns `workers` threads that apply `handler` to every queued item.
    ///
    /// A handler that returns `Err` or panics is logged and counted; the
    /// worker moves on to the next item.
    pub fn start<H, E>(&self, workers: usize, handler: H) -> Result<()>
    where
        H: Fn(T) -> std::result::Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        if workers == 0 {
            return Err(PoolError::InvalidWorkerCount);
        }

        let mut lifecycle = self.lifecycle.write();
        if !matches!(*lifecycle, Lifecycle::Unstarted) {
            return Err(PoolError::AlreadyStarted);
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        let handler = Arc::new(handler);
        let mut handles = Vec::with_capacity(workers);

        for index in 0..workers {
            let worker = Worker {
                index,
                receiver: receiver.clone(),
                handler: Arc::clone(&handler),
                config: Arc::clone(&self.config),
                shared: Arc::clone(&self.shared),
            };
            let spawned = thread::Builder::new()
                .name(format!("{}-worker-{}", self.config.name, index))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    // Disconnect so the workers already spawned exit
                    drop(sender);
                    drop(receiver);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn { source });
                }
            }
        }

        *lifecycle = Lifecycle::Running(Running {
            sender,
            semaphore: Arc::new(Semaphore::new(workers)),
            workers: handles,
        });
        self.shared.set_state(PoolState::Running);

        #[cfg(feature = "tracing")]
        info!(pool = %self.config.name, workers, "worker pool started");

        Ok(())
    }

    /// Starts the pool with [`DEFAULT_WORKERS`] threads.
    pub fn start_default<H, E>(&self, handler: H) -> Result<()>
    where
        H: Fn(T) -> std::result::Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.start(DEFAULT_WORKERS, handler)
    }
}

impl<T> WorkerPool<T> {
    /// Queues `item`, blocking while the pool has no free admission permit.
    pub fn enqueue(&self, item: T) -> Result<()> {
        let lifecycle = self.lifecycle.read();
        let Lifecycle::Running(running) = &*lifecycle else {
            return Err(PoolError::NotRunning);
        };

        let permit = block_on(Arc::clone(&running.semaphore).acquire_owned())
            .map_err(|_| PoolError::NotRunning)?;
        self.submit(running, item, permit)
    }

    /// Queues `item` without waiting.
    ///
    /// Returns [`PoolError::Full`] if every admission permit is taken.
    pub fn try_enqueue(&self, item: T) -> Result<()> {
        let lifecycle = self.lifecycle.read();
        let Lifecycle::Running(running) = &*lifecycle else {
            return Err(PoolError::NotRunning);
        };

        let permit = match Arc::clone(&running.semaphore).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                return Err(PoolError::Full {
                    capacity: running.workers.len(),
                })
            }
            Err(TryAcquireError::Closed) => return Err(PoolError::NotRunning),
        };
        self.submit(running, item, permit)
    }

    fn submit(&self, running: &Running<T>, item: T, permit: OwnedSemaphorePermit) -> Result<()> {
        running
            .sender
            .send(Message::Task(item, permit))
            .map_err(|_| PoolError::NotRunning)?;
        self.shared.record_submitted();

        #[cfg(feature = "metrics")]
        counter!("pool_tasks_submitted_total", "pool" => self.config.name.clone()).increment(1);

        Ok(())
    }

    /// Stops the pool after every admitted item has been handled.
    ///
    /// One shutdown sentinel per worker is queued behind the pending items,
    /// the call waits until all admission permits are back, and then every
    /// worker thread is joined. Calling this on a pool that is not running is
    /// a no-op.
    ///
    /// A handler that calls `enqueue` on its own pool can deadlock once every
    /// permit is taken, and a pending shutdown then waits on it as well.
    pub fn shutdown(&self) -> Result<()> {
        let running = {
            let mut lifecycle = self.lifecycle.write();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Finished) {
                Lifecycle::Running(running) => running,
                other => {
                    *lifecycle = other;
                    return Ok(());
                }
            }
        };

        let start = Instant::now();
        self.shared.set_state(PoolState::Draining);

        #[cfg(feature = "tracing")]
        debug!(pool = %self.config.name, "draining worker pool");

        let Running {
            sender,
            semaphore,
            workers,
        } = running;
        let capacity = workers.len();

        for _ in 0..capacity {
            let sent = block_on(Arc::clone(&semaphore).acquire_owned())
                .ok()
                .map(|permit| sender.send(Message::Shutdown(permit)));
            if !matches!(sent, Some(Ok(()))) {
                // All workers are gone; nothing left to signal
                break;
            }
        }
        drop(sender);

        // Every item and sentinel has been acknowledged once all permits are back
        if let Ok(permits) = block_on(semaphore.acquire_many(capacity as u32)) {
            drop(permits);
        }
        semaphore.close();

        let mut panicked = None;
        for handle in workers {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(name);
            }
        }

        self.shared.set_state(PoolState::Stopped);
        let duration = start.elapsed();

        #[cfg(feature = "tracing")]
        info!(pool = %self.config.name, workers = capacity, ?duration, "shutdown all workers");

        self.config.event_listeners.emit(&PoolEvent::Shutdown {
            instance_name: self.config.name.clone(),
            timestamp: Instant::now(),
            workers: capacity,
            duration,
        });

        match panicked {
            Some(worker) => Err(PoolError::WorkerPanicked { worker }),
            None => Ok(()),
        }
    }

    /// Returns the name of this pool.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> PoolState {
        self.shared.state()
    }

    /// Returns the number of worker threads, or 0 if the pool is not running.
    pub fn worker_count(&self) -> usize {
        match &*self.lifecycle.read() {
            Lifecycle::Running(running) => running.workers.len(),
            _ => 0,
        }
    }

    /// Returns a snapshot of the task counters.
    pub fn stats(&self) -> PoolStats {
        self.shared.stats()
    }
}

impl<T: Send + 'static> Default for WorkerPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if let Err(_e) = self.shutdown() {
            #[cfg(feature = "tracing")]
            warn!(pool = %self.config.name, error = %_e, "worker pool shutdown on drop failed");
        }
    }
}

impl<T> fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.config.name)
            .field("state", &self.state())
            .field("stats", &self.stats())
            .finish()
    }
}

struct Worker<T, H> {
    index: usize,
    receiver: Receiver<Message<T>>,
    handler: Arc<H>,
    config: Arc<WorkerPoolConfig>,
    shared: Arc<Shared>,
}

impl<T, H, E> Worker<T, H>
where
    H: Fn(T) -> std::result::Result<(), E>,
    E: fmt::Display,
{
    fn run(self) {
        while let Ok(message) = self.receiver.recv() {
            match message {
                Message::Task(item, permit) => {
                    self.handle(item);
                    drop(permit);
                }
                Message::Shutdown(permit) => {
                    drop(permit);
                    break;
                }
            }
        }
    }

    fn handle(&self, item: T) {
        let _in_flight = self.shared.task_started();

        #[cfg(feature = "metrics")]
        gauge!("pool_tasks_in_flight", "pool" => self.config.name.clone()).set(_in_flight as f64);

        self.emit(PoolEvent::TaskStarted {
            instance_name: self.config.name.clone(),
            timestamp: Instant::now(),
            worker: self.index,
        });

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(item)));
        let duration = start.elapsed();

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(format!("handler panicked: {}", panic_message(&*payload))),
        };

        let _in_flight = self.shared.task_finished(failure.is_none());

        #[cfg(feature = "metrics")]
        gauge!("pool_tasks_in_flight", "pool" => self.config.name.clone()).set(_in_flight as f64);

        match failure {
            None => {
                #[cfg(feature = "metrics")]
                counter!("pool_tasks_completed_total", "pool" => self.config.name.clone())
                    .increment(1);

                self.emit(PoolEvent::TaskCompleted {
                    instance_name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    worker: self.index,
                    duration,
                });
            }
            Some(error) => {
                #[cfg(feature = "metrics")]
                counter!("pool_tasks_failed_total", "pool" => self.config.name.clone())
                    .increment(1);

                #[cfg(feature = "tracing")]
                warn!(pool = %self.config.name, worker = self.index, error = %error, "task handler failed");

                self.emit(PoolEvent::TaskFailed {
                    instance_name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    worker: self.index,
                    duration,
                    error,
                });
            }
        }
    }

    fn emit(&self, event: PoolEvent) {
        if !self.config.event_listeners.is_empty() {
            self.config.event_listeners.emit(&event);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
