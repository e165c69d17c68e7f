//! The resource cache tracks named, typed and lazily-loaded resources, loads
//! them on background workers and reference-counts their usage.
//!
//! # Registration
//!
//! A resource is identified by a `FixedPath` and registered with its type in
//! one of a fixed number of slots:
//!
//! ```rust,ignore
//! manager.add(ResourceType::Texture, "textures/crate.vtex", None)?;
//! ```
//!
//! Paths beginning with `builtin:` name procedural resources like a white
//! texture or a unit cube. They are registered and requested by the manager
//! itself, so they stay resident until `finalize`.
//!
//! # Demand
//!
//! Nothing is loaded until there is demand. A `Ref` is a handle to one path;
//! `request` adds demand and `release` gives it back:
//!
//! ```rust,ignore
//! let mut texture = manager.make_ref(ResourceType::Texture, "textures/crate.vtex")?;
//! texture.set_callback(|v| println!("{:?} is ready.", v.as_texture()));
//! texture.request()?;
//! ```
//!
//! # Tick
//!
//! `ResourceManager::update` should be called once per frame. For every
//! active slot it either notifies the pending refs of a settled resource,
//! launches a load for new demand, or drops a resource nobody asks for.
//! Loads never block the tick, and a resource is never dropped while its load
//! is still running.
//!
//! Loading failures are recorded on the resource as `Status::Error` with an
//! `ErrorCode`. Whether pending callbacks hear about them is decided by
//! `NotifyPolicy`.
//!
//! # Slot Reuse
//!
//! Slots are recycled after `remove`. Every binding of a slot gets a new
//! generation, and a `Ref` validates its cached `(index, generation)` pair
//! before trusting it, so a stale ref never touches the resource of another
//! path.

pub mod assets;
pub mod backend;
pub mod builtin;
pub mod loader;
pub mod manager;
pub mod params;
pub mod reference;
pub mod resolver;
pub mod resource;

mod slot;

pub use self::slot::{SlotHandle, SlotInfo};

pub mod prelude {
    pub use super::assets::prelude::*;
    pub use super::backend::{Backend, HeadlessBackend};
    pub use super::builtin::BUILTIN_PREFIX;
    pub use super::loader::{LoadContext, Loader, LoaderFactory, Origin};
    pub use super::manager::{ResourceManager, ResourceManagerShared};
    pub use super::params::{LoadParams, ManagerParams, NotifyPolicy, MAX_RESOURCES};
    pub use super::reference::Ref;
    pub use super::resolver::{Directory, Memory, PathResolver};
    pub use super::resource::{Resource, ResourceData, ResourceType, Status};
    pub use super::slot::SlotHandle;
}
