use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use super::{Task, ThreadPool};
use crate::config::{PoolConfig, WaitStrategy};
use crate::queue::SafeQueue;
use crate::{PoolError, Result};

/// A thread pool whose workers pull jobs from one shared [`SafeQueue`].
///
/// Workers are spawned on construction and live until the pool is dropped
/// or [`shutdown`](SharedQueueThreadPool::shutdown) is called. Shutdown raises
/// a flag and joins every worker; a job that is running finishes first, but
/// jobs still queued at that point are dropped without running.
///
/// A panicking job is logged and counted; its worker keeps running.
pub struct SharedQueueThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

/// State shared between the pool handle and its workers.
struct Shared {
    queue: SafeQueue<Task>,
    shutdown: AtomicBool,
    wait: WaitStrategy,
    panicked: AtomicUsize,
}

impl ThreadPool for SharedQueueThreadPool {
    fn new(threads: u32) -> Result<Self> {
        Self::with_config(PoolConfig::default().threads(threads as usize))
    }

    fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.queue.push(Box::new(job));
    }
}

impl SharedQueueThreadPool {
    /// Creates a pool with one worker per detected CPU and the default wait strategy.
    pub fn new_default() -> Result<Self> {
        Self::with_config(PoolConfig::default())
    }

    /// Creates a pool from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidThreadCount`] for an explicit count of zero,
    /// [`PoolError::InvalidName`] if the name prefix contains a NUL byte and
    /// [`PoolError::Io`] if a worker thread cannot be spawned.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Self::start(config, spawn_worker)
    }

    fn start<S>(config: PoolConfig, mut spawn: S) -> Result<Self>
    where
        S: FnMut(usize, &str, Arc<Shared>) -> Result<JoinHandle<()>>,
    {
        let threads = config.resolved_threads();
        if threads == 0 {
            return Err(PoolError::InvalidThreadCount(threads));
        }
        // Thread names are C strings; std panics on an interior NUL.
        if config.name_prefix.contains('\0') {
            return Err(PoolError::InvalidName(config.name_prefix));
        }

        let mut pool = SharedQueueThreadPool {
            shared: Arc::new(Shared {
                queue: SafeQueue::new(),
                shutdown: AtomicBool::new(false),
                wait: config.wait,
                panicked: AtomicUsize::new(0),
            }),
            workers: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            // On failure `pool` is dropped here, which joins the workers spawned so far.
            let handle = spawn(id, &config.name_prefix, pool.shared.clone())?;
            pool.workers.push(handle);
        }

        info!(
            "Thread pool started with {} workers ({:?} wait)",
            threads, config.wait
        );
        Ok(pool)
    }

    /// Number of worker threads, fixed for the lifetime of the pool.
    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Number of submitted jobs not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Number of jobs that panicked so far.
    pub fn panicked(&self) -> usize {
        self.shared.panicked.load(Ordering::Relaxed)
    }

    /// Stops the pool, blocking until every worker has exited.
    ///
    /// Returns the number of queued jobs that were abandoned.
    pub fn shutdown(mut self) -> usize {
        self.stop()
    }

    fn stop(&mut self) -> usize {
        if self.shared.shutdown.swap(true, Ordering::AcqRel) {
            return 0;
        }
        self.shared.queue.notify_all();

        for (id, handle) in self.workers.drain(..).enumerate() {
            if handle.join().is_err() {
                error!("Worker {id} terminated abnormally");
            }
        }

        let abandoned = std::iter::from_fn(|| self.shared.queue.try_pop()).count();
        if abandoned > 0 {
            warn!("Thread pool stopped, {abandoned} queued jobs abandoned");
        } else {
            info!("Thread pool stopped");
        }
        abandoned
    }
}

impl Drop for SharedQueueThreadPool {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a single named worker thread running the poll-execute loop.
fn spawn_worker(id: usize, prefix: &str, shared: Arc<Shared>) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name(format!("{prefix}-{id}"))
        .spawn(move || run_worker(id, &shared))?;
    Ok(handle)
}

fn run_worker(id: usize, shared: &Shared) {
    debug!("Worker {id} started");
    while !shared.shutdown.load(Ordering::Acquire) {
        let job = match shared.wait {
            WaitStrategy::Yield => shared.queue.try_pop(),
            WaitStrategy::Block => shared.queue.wait_pop(&shared.shutdown),
        };
        match job {
            Some(job) => shared.execute(id, job),
            None if shared.wait == WaitStrategy::Yield => thread::yield_now(),
            None => {}
        }
    }
    debug!("Worker {id}: shutdown observed, exiting");
}

impl Shared {
    fn execute(&self, id: usize, job: Task) {
        // Catch panics so the worker loop continues
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            self.panicked.fetch_add(1, Ordering::Relaxed);
            error!(
                "Worker {id} job panicked: {}, continuing",
                panic_message(payload.as_ref())
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic payload"
    }
}
