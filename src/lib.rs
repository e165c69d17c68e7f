//! # rescache
//!
//! A fixed-capacity, reference-counted cache of named resources (files,
//! shaders, materials, meshes and textures) that are loaded asynchronously
//! on a small pool of worker threads.
//!
//! ```rust,ignore
//! use rescache::prelude::*;
//!
//! let mut manager = ResourceManager::new(ManagerParams::default())?;
//! manager.add(ResourceType::File, "config.json", None)?;
//!
//! let mut config = manager.make_ref(ResourceType::File, "config.json")?;
//! config.set_callback(|v| println!("{} bytes.", v.as_file().unwrap().len()));
//! config.request()?;
//!
//! loop {
//!     manager.update(std::time::Duration::from_millis(16));
//! }
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

#[macro_use]
pub mod utils;
pub mod errors;
pub mod res;
pub mod sched;

pub mod prelude {
    pub use crate::errors::{Error, ErrorCode, Result};
    pub use crate::res::prelude::*;
    pub use crate::utils::prelude::{FixedPath, MAX_PATH_LEN};
}
