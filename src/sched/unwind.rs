use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// Executes `f` and captures any panic, translating that panic into a
/// `Err` result.
pub fn halt_unwinding<F, R>(func: F) -> thread::Result<R>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(func))
}

/// Extracts the message of a captured panic payload.
pub fn describe(payload: &(dyn ::std::any::Any + Send)) -> &str {
    if let Some(v) = payload.downcast_ref::<&'static str>() {
        v
    } else if let Some(v) = payload.downcast_ref::<String>() {
        v.as_str()
    } else {
        "Box<Any>"
    }
}
