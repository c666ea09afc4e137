#![deny(missing_docs)]

//! A fixed-size worker thread pool fed by a thread-safe FIFO task queue.
//!
//! [`SharedQueueThreadPool`] spawns its workers once, on construction. Each
//! worker repeatedly takes the next job from a shared [`SafeQueue`] and runs
//! it to completion. Dropping the pool signals shutdown and joins every worker.

mod config;
mod error;
mod queue;
/// Thread pool implementations and the job type they accept.
pub mod thread_pool;

pub use config::{PoolConfig, WaitStrategy};
pub use error::{PoolError, Result};
pub use queue::SafeQueue;
pub use thread_pool::{SharedQueueThreadPool, Task, ThreadPool};
