use std::sync::{Condvar, Mutex};

/// A Latch starts as empty and eventually receives a value through `set`. You
/// can block until it becomes set, and the value could be taken out once.
///
/// Everything written by the setter before `set` is visible to any thread that
/// observes `is_set() == true`, since both sides go through the same mutex.
pub struct LockLatch<T> {
    m: Mutex<Option<T>>,
    v: Condvar,
}

impl<T> LockLatch<T> {
    #[inline]
    pub fn new() -> Self {
        LockLatch {
            m: Mutex::new(None),
            v: Condvar::new(),
        }
    }

    /// Set the latch with `value`, waking up all the waiting threads.
    pub fn set(&self, value: T) {
        let mut guard = self.m.lock().unwrap();
        *guard = Some(value);
        self.v.notify_all();
    }

    /// Test if the latch is set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.m.lock().unwrap().is_some()
    }

    /// Block until latch is set.
    pub fn wait(&self) {
        let mut guard = self.m.lock().unwrap();
        while guard.is_none() {
            guard = self.v.wait(guard).unwrap();
        }
    }

    /// Takes the value out of latch, returns `None` if it has not been set yet
    /// or has been taken already.
    #[inline]
    pub fn take(&self) -> Option<T> {
        self.m.lock().unwrap().take()
    }
}

impl<T> Default for LockLatch<T> {
    fn default() -> Self {
        LockLatch::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn basic() {
        let latch = LockLatch::new();
        assert!(!latch.is_set());
        latch.set(3);
        assert!(latch.is_set());
        latch.wait();
        assert_eq!(latch.take(), Some(3));
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn cross_thread() {
        let latch = Arc::new(LockLatch::new());
        let tx = latch.clone();
        let t = thread::spawn(move || tx.set(String::from("done")));

        latch.wait();
        assert_eq!(latch.take().as_ref().map(|v| v.as_str()), Some("done"));
        t.join().unwrap();
    }
}
