use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_deque::{Injector, Steal};

use super::latch::LockLatch;
use super::task::Task;
use super::unwind;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed-size pool of worker threads executing fire-and-forget jobs. A
/// headless scheduler has no threads and executes every job inline.
pub struct Scheduler {
    shared: Option<Arc<Shared>>,
    threads: Vec<thread::JoinHandle<()>>,
}

struct Shared {
    injector: Injector<Job>,
    watcher: Watcher,
    terminated: AtomicBool,
    pending: AtomicUsize,
}

impl Scheduler {
    /// Creates a new `Scheduler` with `num` worker threads. Zero workers makes
    /// it headless.
    pub fn new(num: u32, stack_size: Option<usize>) -> Self {
        if num == 0 {
            return Scheduler::headless();
        }

        let shared = Arc::new(Shared {
            injector: Injector::new(),
            watcher: Watcher(Mutex::new(()), Condvar::new()),
            terminated: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        });

        let mut threads = Vec::with_capacity(num as usize);
        for i in 0..num {
            let mut b = thread::Builder::new().name(format!("rescache-worker-{}", i));
            if let Some(stack_size) = stack_size {
                b = b.stack_size(stack_size);
            }

            let sc = shared.clone();
            match b.spawn(move || Scheduler::main_loop(&sc)) {
                Ok(handle) => threads.push(handle),
                Err(err) => error!("[Scheduler] failed to spawn worker {}: {}", i, err),
            }
        }

        if threads.is_empty() {
            warn!("[Scheduler] no worker could be spawned, falls back to headless mode.");
            return Scheduler::headless();
        }

        info!("[Scheduler] starts with {} workers.", threads.len());
        Scheduler {
            shared: Some(shared),
            threads,
        }
    }

    /// Creates a `Scheduler` which runs jobs on the calling thread.
    pub fn headless() -> Self {
        Scheduler {
            shared: None,
            threads: Vec::new(),
        }
    }

    /// Returns true if jobs are executed inline.
    #[inline]
    pub fn is_headless(&self) -> bool {
        self.shared.is_none()
    }

    /// Returns the number of worker threads.
    #[inline]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Returns the number of jobs that have been spawned but not finished yet.
    #[inline]
    pub fn pending(&self) -> usize {
        self.shared
            .as_ref()
            .map(|v| v.pending.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Spawns an asynchronous job. Panics inside the job are captured and
    /// logged.
    pub fn spawn<F>(&self, func: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self.shared {
            Some(ref shared) => {
                shared.pending.fetch_add(1, Ordering::AcqRel);
                shared.injector.push(Box::new(func));
                shared.watcher.notify_one();
            }
            None => Scheduler::execute(Box::new(func)),
        }
    }

    /// Spawns an asynchronous job whose result is delivered through a `Task`.
    ///
    /// A job that panics never completes its task, so callers that poll or
    /// wait on the task must keep `func` from unwinding.
    pub fn spawn_task<F, T>(&self, func: F) -> Task<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let latch = Arc::new(LockLatch::new());
        let tx = latch.clone();
        self.spawn(move || tx.set(func()));
        Task::new(latch)
    }

    fn execute(job: Job) {
        if let Err(err) = unwind::halt_unwinding(job) {
            error!("[Scheduler] job panicked: {}", unwind::describe(err.as_ref()));
        }
    }

    fn main_loop(shared: &Shared) {
        let mut ms = 1;

        loop {
            match shared.injector.steal() {
                Steal::Success(job) => {
                    Scheduler::execute(job);
                    shared.pending.fetch_sub(1, Ordering::AcqRel);
                    ms = 1;
                }
                Steal::Retry => {}
                Steal::Empty => {
                    if shared.terminated.load(Ordering::Acquire) {
                        break;
                    }

                    shared.watcher.wait_timeout(ms);
                    ms = (ms * 2).min(48);
                }
            }
        }
    }
}

impl Drop for Scheduler {
    /// Signals the workers to quit once the queue has been drained, and blocks
    /// current thread until all of them finished.
    fn drop(&mut self) {
        if let Some(ref shared) = self.shared {
            shared.terminated.store(true, Ordering::Release);
            shared.watcher.notify_all();
        }

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                error!("[Scheduler] worker terminated abnormally.");
            }
        }
    }
}

struct Watcher(Mutex<()>, Condvar);

impl Watcher {
    #[inline]
    fn wait_timeout(&self, ms: u64) {
        let v = self.0.lock().unwrap();
        let _ = self.1.wait_timeout(v, Duration::from_millis(ms));
    }

    #[inline]
    fn notify_one(&self) {
        self.1.notify_one()
    }

    #[inline]
    fn notify_all(&self) {
        self.1.notify_all()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn headless() {
        let sched = Scheduler::headless();
        assert!(sched.is_headless());

        let task = sched.spawn_task(|| 1 + 1);
        assert!(task.poll());
        assert_eq!(task.take(), Some(2));
    }

    #[test]
    fn workers() {
        let sched = Scheduler::new(4, None);
        assert_eq!(sched.len(), 4);

        let counter = Arc::new(AtomicUsize::new(0));
        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let counter = counter.clone();
                sched.spawn_task(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    i
                })
            })
            .collect();

        for (i, task) in tasks.iter().enumerate() {
            task.wait();
            assert_eq!(task.take(), Some(i));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 64);
    }

    #[test]
    fn panic_is_captured() {
        let sched = Scheduler::new(1, None);
        sched.spawn(|| panic!("boom"));

        let task = sched.spawn_task(|| "alive");
        task.wait();
        assert_eq!(task.take(), Some("alive"));
    }

    #[test]
    fn drop_drains_queue() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let sched = Scheduler::new(2, None);
            for _ in 0..32 {
                let counter = counter.clone();
                sched.spawn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }

        assert_eq!(counter.load(Ordering::SeqCst), 32);
    }
}
