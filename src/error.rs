use std::io;
use thiserror::Error;

/// Error type for thread pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The OS refused to create a worker thread.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error while writing a run report.
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A pool was requested with an unusable number of threads.
    #[error("Invalid thread count: {0}")]
    InvalidThreadCount(usize),

    /// A worker thread name prefix cannot be used as a thread name.
    #[error("Invalid thread name prefix: {0:?}")]
    InvalidName(String),
}

/// Result type alias for thread pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
