//! A fixed-capacity cache entry.
//!
//! Synchronization is split in two tiers. The demand counter and the
//! "has unhandled refs" flag are atomics touched on the hot path by any
//! thread. The list of unhandled refs is a structural collection, so it lives
//! behind a per-slot mutex, and `has_unhandled` is only ever flipped while that
//! mutex is held.
//!
//! The resource itself is created and destroyed by the driver thread only.
//! While it is loading it is owned by its background task and comes back
//! through the task latch, which also publishes its terminal status.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use smallvec::SmallVec;

use crate::sched::prelude::Task;
use crate::utils::prelude::{FixedPath, Handle, HandleIndex};

use super::params::LoadParams;
use super::reference::RefState;
use super::resource::{Resource, ResourceType, Status};

impl_handle!(SlotHandle);

/// The registration identity of a slot.
#[derive(Debug, Clone)]
pub struct SlotInfo {
    pub kind: ResourceType,
    pub path: FixedPath,
    pub params: LoadParams,
}

impl Default for SlotInfo {
    fn default() -> Self {
        SlotInfo {
            kind: ResourceType::File,
            path: FixedPath::default(),
            params: LoadParams::default(),
        }
    }
}

#[derive(Default)]
struct Refs {
    count: AtomicUsize,
    unhandled: Mutex<SmallVec<[Arc<RefState>; 4]>>,
    has_unhandled: AtomicBool,
}

#[derive(Default)]
struct Loading {
    in_progress: AtomicBool,
    task: Mutex<Option<Task<Resource>>>,
}

pub(crate) struct Slot {
    index: HandleIndex,
    in_use: AtomicBool,
    generation: AtomicU32,
    info: RwLock<SlotInfo>,
    resource: RwLock<Option<Arc<Resource>>>,
    refs: Refs,
    loading: Loading,
}

impl Slot {
    pub fn new(index: usize) -> Self {
        Slot {
            index: index as HandleIndex,
            in_use: AtomicBool::new(false),
            generation: AtomicU32::new(0),
            info: RwLock::new(SlotInfo::default()),
            resource: RwLock::new(None),
            refs: Refs::default(),
            loading: Loading::default(),
        }
    }

    /// Binds a free slot to `info` and resets its bookkeeping.
    pub fn bind(&self, info: SlotInfo) {
        *self.info.write().unwrap() = info;
        self.refs.count.store(0, Ordering::Release);
        self.take_unhandled();
        self.in_use.store(true, Ordering::Release);
    }

    /// Unbinds this slot, invalidating every handle pointing at it. The
    /// caller must have settled any in-flight load already. Returns the
    /// resource so it could be dropped outside of the locks.
    pub fn unbind(&self) -> Option<Arc<Resource>> {
        self.in_use.store(false, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.refs.count.store(0, Ordering::Release);
        self.take_unhandled();
        *self.info.write().unwrap() = SlotInfo::default();
        self.resource.write().unwrap().take()
    }

    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }

    /// The current `(index, generation)` pair of this slot.
    #[inline]
    pub fn handle(&self) -> SlotHandle {
        Handle::new(self.index, self.generation.load(Ordering::Acquire)).into()
    }

    /// Checks if `handle` was issued for the current binding of this slot.
    #[inline]
    pub fn is_current(&self, handle: SlotHandle) -> bool {
        self.is_in_use() && handle.version() == self.generation.load(Ordering::Acquire)
    }

    pub fn info(&self) -> SlotInfo {
        self.info.read().unwrap().clone()
    }

    pub fn kind(&self) -> ResourceType {
        self.info.read().unwrap().kind
    }

    pub fn path(&self) -> FixedPath {
        self.info.read().unwrap().path
    }

    #[inline]
    pub fn ref_count(&self) -> usize {
        self.refs.count.load(Ordering::Acquire)
    }

    /// Adds demand on behalf of `state`.
    pub fn acquire(&self, state: &Arc<RefState>) {
        self.refs.count.fetch_add(1, Ordering::AcqRel);

        let mut unhandled = self.refs.unhandled.lock().unwrap();
        unhandled.push(state.clone());
        self.refs.has_unhandled.store(true, Ordering::Release);
    }

    /// Removes demand of `state`. Returns false if the counter was zero
    /// already.
    pub fn release(&self, state: &Arc<RefState>) -> bool {
        {
            let mut unhandled = self.refs.unhandled.lock().unwrap();
            if let Some(i) = unhandled.iter().position(|v| Arc::ptr_eq(v, state)) {
                unhandled.swap_remove(i);
            }

            if unhandled.is_empty() {
                self.refs.has_unhandled.store(false, Ordering::Release);
            }
        }

        self.refs
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1))
            .is_ok()
    }

    /// Takes the pending refs out, leaving the list empty.
    pub fn take_unhandled(&self) -> SmallVec<[Arc<RefState>; 4]> {
        let mut unhandled = self.refs.unhandled.lock().unwrap();
        self.refs.has_unhandled.store(false, Ordering::Release);
        ::std::mem::replace(&mut *unhandled, SmallVec::new())
    }

    #[inline]
    pub fn has_unhandled(&self) -> bool {
        self.refs.has_unhandled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.loading.in_progress.load(Ordering::Acquire)
    }

    /// Checks if a resource instance exists, no matter it is loading or
    /// settled.
    pub fn has_resource(&self) -> bool {
        self.is_loading() || self.resource.read().unwrap().is_some()
    }

    /// Hands a loading task over to this slot.
    pub fn launch(&self, task: Task<Resource>) {
        *self.loading.task.lock().unwrap() = Some(task);
        self.loading.in_progress.store(true, Ordering::Release);
    }

    /// Moves the resource out of a finished task into the slot. Returns true
    /// if a load has been settled by this call.
    pub fn settle(&self) -> bool {
        if !self.is_loading() {
            return false;
        }

        let mut task = self.loading.task.lock().unwrap();
        let resource = match task.as_ref() {
            Some(v) if v.poll() => v.take(),
            Some(_) => return false,
            None => None,
        };

        *task = None;
        self.loading.in_progress.store(false, Ordering::Release);
        if let Some(resource) = resource {
            *self.resource.write().unwrap() = Some(Arc::new(resource));
            true
        } else {
            false
        }
    }

    /// Blocks until the in-flight load, if any, has finished. Then settles it.
    pub fn wait(&self) {
        if let Some(task) = self.loading.task.lock().unwrap().as_ref() {
            task.wait();
        }

        self.settle();
    }

    /// The settled resource, if any.
    pub fn resource(&self) -> Option<Arc<Resource>> {
        self.resource.read().unwrap().clone()
    }

    /// Visits the settled resource while keeping it locked.
    pub fn visit<F, R>(&self, func: F) -> Option<R>
    where
        F: FnOnce(&Resource) -> R,
    {
        self.resource.read().unwrap().as_ref().map(|v| func(&**v))
    }

    /// The status seen by the driver. A loading resource reports `Unloaded`.
    pub fn status(&self) -> Option<Status> {
        if self.is_loading() {
            return Some(Status::Unloaded);
        }

        self.visit(|v| v.status())
    }

    /// Drops the settled resource.
    pub fn drop_resource(&self) -> Option<Arc<Resource>> {
        self.resource.write().unwrap().take()
    }
}
