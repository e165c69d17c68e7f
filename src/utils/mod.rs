//! Commonly used utilities like handles, pools and inline paths.

#[macro_use]
pub mod handle;
pub mod fixed_path;
pub mod handle_pool;
pub mod hash;

pub mod prelude {
    pub use super::fixed_path::{FixedPath, MAX_PATH_LEN};
    pub use super::handle::{Handle, HandleIndex};
    pub use super::handle_pool::HandlePool;
    pub use super::hash::FastHashMap;
}
