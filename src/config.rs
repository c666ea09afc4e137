use serde::{Deserialize, Serialize};

const DEFAULT_NAME_PREFIX: &str = "pool-worker";

/// How an idle worker waits for the next task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitStrategy {
    /// Poll the queue and call `thread::yield_now` when it is empty.
    ///
    /// Idle workers keep a core busy. The queue still signals on every push,
    /// but nothing waits on that signal.
    #[default]
    Yield,
    /// Sleep on the queue's condition variable until a push or shutdown wakes the worker.
    Block,
}

/// Optional settings for [`SharedQueueThreadPool`](crate::SharedQueueThreadPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of workers. `None` uses the detected hardware concurrency.
    pub threads: Option<usize>,
    /// Idle behaviour of the workers.
    pub wait: WaitStrategy,
    /// Worker threads are named `{name_prefix}-{id}`.
    pub name_prefix: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            threads: None,
            wait: WaitStrategy::default(),
            name_prefix: DEFAULT_NAME_PREFIX.to_owned(),
        }
    }
}

impl PoolConfig {
    /// Sets an explicit worker count.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Sets the idle wait strategy.
    pub fn wait(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    /// Sets the worker thread name prefix.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Resolves the worker count, falling back to 1 if detection reports 0.
    pub(crate) fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| num_cpus::get().max(1))
    }
}
