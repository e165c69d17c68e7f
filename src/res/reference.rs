//! Caller-held demand handles.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use crate::errors::*;
use crate::utils::prelude::FixedPath;

use super::manager::ResourceManagerShared;
use super::resource::{Resource, ResourceType};
use super::slot::SlotHandle;

type Callback = Box<dyn FnMut(&Resource) + Send + 'static>;

#[derive(Default)]
struct CallbackCell {
    func: Option<Callback>,
    // Bumped whenever the callback is replaced or cleared.
    epoch: u64,
}

/// The part of a `Ref` that the slot keeps in its unhandled list. It is
/// shared so the callback could be swapped while the ref is pending.
#[derive(Default)]
pub struct RefState {
    callback: Mutex<CallbackCell>,
}

impl RefState {
    /// Runs the callback without holding the lock, so it could replace or
    /// clear itself through its own `Ref`.
    pub(crate) fn notify(&self, resource: &Resource) {
        let (func, epoch) = {
            let mut cell = self.callback.lock().unwrap();
            (cell.func.take(), cell.epoch)
        };

        if let Some(mut func) = func {
            func(resource);

            let mut cell = self.callback.lock().unwrap();
            if cell.epoch == epoch {
                cell.func = Some(func);
            }
        }
    }

    fn replace(&self, func: Option<Callback>) {
        let mut cell = self.callback.lock().unwrap();
        cell.func = func;
        cell.epoch = cell.epoch.wrapping_add(1);
    }
}

/// A `Ref` is the unit of demand on a registered path. `request` makes the
/// manager load the resource and notify the callback once it has settled,
/// `release` gives the demand back. A `Ref` never owns the resource.
///
/// Dropping a requested `Ref` releases it.
pub struct Ref {
    kind: ResourceType,
    path: FixedPath,
    manager: Weak<ResourceManagerShared>,
    handle: Option<SlotHandle>,
    requested: bool,
    state: Arc<RefState>,
}

impl Ref {
    pub(crate) fn new(kind: ResourceType, path: FixedPath, manager: Weak<ResourceManagerShared>) -> Self {
        Ref {
            kind,
            path,
            manager,
            handle: None,
            requested: false,
            state: Arc::new(RefState::default()),
        }
    }

    /// Adds demand on the path. Requesting twice has no further effect.
    ///
    /// Fails with `UnknownResource` if the path is not registered with the
    /// type of this ref, or the manager has gone.
    pub fn request(&mut self) -> Result<()> {
        if self.requested {
            return Ok(());
        }

        let manager = self
            .manager
            .upgrade()
            .ok_or_else(|| Error::UnknownResource(format!("{} (manager dropped)", self.path)))?;

        let handle = manager.request(self.kind, &self.path, self.handle, &self.state)?;
        self.handle = Some(handle);
        self.requested = true;
        Ok(())
    }

    /// Gives the demand back. Releasing twice has no further effect.
    pub fn release(&mut self) {
        if !self.requested {
            return;
        }

        self.requested = false;
        if let (Some(manager), Some(handle)) = (self.manager.upgrade(), self.handle) {
            manager.release(handle, &self.state);
        }
    }

    /// Points this ref at another path. The demand does not migrate, callers
    /// are expected to `release` before and `request` again afterwards.
    pub fn set_path<T: AsRef<str>>(&mut self, path: T) -> Result<()> {
        let path = path.as_ref();
        if self.path == path {
            return Ok(());
        }

        self.path.assign(path)?;

        if self.requested {
            warn!(
                "[Ref] changes path to {} while requested, the demand stays on the previous slot.",
                self.path
            );
        } else {
            self.handle = None;
        }

        Ok(())
    }

    /// Replaces the callback. It does not fire for a resource that has been
    /// settled already, only on later notification cycles of this ref.
    pub fn set_callback<F>(&mut self, func: F)
    where
        F: FnMut(&Resource) + Send + 'static,
    {
        self.state.replace(Some(Box::new(func)));
    }

    pub fn clear_callback(&mut self) {
        self.state.replace(None);
    }

    /// The slot index this ref was resolved to by its last `request`.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.handle.map(|v| v.index() as usize)
    }

    #[inline]
    pub fn handle(&self) -> Option<SlotHandle> {
        self.handle
    }

    #[inline]
    pub fn path(&self) -> &FixedPath {
        &self.path
    }

    #[inline]
    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested
    }
}

impl Drop for Ref {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ref")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("handle", &self.handle)
            .field("requested", &self.requested)
            .finish()
    }
}
