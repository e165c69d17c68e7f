//! A handle to the result of a job running on the `Scheduler`.

use std::sync::Arc;

use super::latch::LockLatch;

/// A asynchronous job result. You sould checks the completion status with
/// `poll` method manually, and fetch the result with `take` once it returns
/// true. Only `wait` ever blocks.
pub struct Task<T> {
    latch: Arc<LockLatch<T>>,
}

impl<T> Task<T> {
    #[inline]
    pub(crate) fn new(latch: Arc<LockLatch<T>>) -> Self {
        Task { latch }
    }

    /// Creates a task that has finished with `value` already.
    pub fn ready(value: T) -> Self {
        let latch = LockLatch::new();
        latch.set(value);
        Task::new(Arc::new(latch))
    }

    /// Returns true if the job has finished.
    #[inline]
    pub fn poll(&self) -> bool {
        self.latch.is_set()
    }

    /// Blocks current thread until the job finished.
    #[inline]
    pub fn wait(&self) {
        self.latch.wait();
    }

    /// Takes the result, returns `None` if the job has not finished yet.
    #[inline]
    pub fn take(&self) -> Option<T> {
        self.latch.take()
    }
}
