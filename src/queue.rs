use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A mutex-guarded FIFO queue shared by any number of producers and consumers.
///
/// The sequence is only read or mutated while the lock is held, and the lock
/// is only held for the duration of a container operation. `push` signals one
/// waiter on every call; [`try_pop`](SafeQueue::try_pop) never waits, while
/// [`wait_pop`](SafeQueue::wait_pop) sleeps until that signal arrives.
pub struct SafeQueue<T> {
    items: Mutex<VecDeque<T>>,
    cond: Condvar,
}

impl<T> SafeQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        SafeQueue {
            items: Mutex::new(VecDeque::new()),
            cond: Condvar::new(),
        }
    }

    /// Appends `value` to the back of the queue and wakes one waiting consumer.
    pub fn push(&self, value: T) {
        self.lock().push_back(value);
        self.cond.notify_one();
    }

    /// Removes the front item, or returns `None` immediately if the queue is empty.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Removes the front item, sleeping while the queue is empty.
    ///
    /// Returns `None` once `stop` is observed true with nothing to pop. Whoever
    /// sets `stop` must call [`notify_all`](SafeQueue::notify_all) afterwards.
    pub fn wait_pop(&self, stop: &AtomicBool) -> Option<T> {
        let mut items = self.lock();
        loop {
            if let Some(value) = items.pop_front() {
                return Some(value);
            }
            if stop.load(Ordering::Acquire) {
                return None;
            }
            items = self
                .cond
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wakes every consumer blocked in `wait_pop`.
    ///
    /// The lock is taken first so a consumer between its `stop` check and its
    /// wait cannot miss the wake-up.
    pub fn notify_all(&self) {
        let _items = self.lock();
        self.cond.notify_all();
    }

    /// Number of queued items at the time of the call.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is queued at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Items are never left half-mutated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for SafeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
