//! A tiny job system that runs the background loads of the resource cache.

pub mod latch;
pub mod scheduler;
pub mod task;

mod unwind;

pub use self::unwind::describe as describe_panic;
pub use self::unwind::halt_unwinding;

pub mod prelude {
    pub use super::latch::LockLatch;
    pub use super::scheduler::Scheduler;
    pub use super::task::Task;
}
