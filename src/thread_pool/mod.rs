use crate::Result;

/// A unit of work accepted by a thread pool: runs once, takes nothing, returns nothing.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool for executing jobs concurrently.
///
/// Implementors own a fixed set of worker threads and distribute
/// submitted jobs across them.
pub trait ThreadPool {
    /// Creates a new thread pool with the given number of threads.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero or a worker thread cannot be spawned.
    /// Workers spawned before the failure are stopped and joined.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Submits a job to the pool.
    ///
    /// The job will be executed by exactly one of the threads in the pool,
    /// unless the pool is shut down while the job is still queued.
    fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod shared_queue;

pub use self::shared_queue::SharedQueueThreadPool;
