//! The resource manager: a fixed array of slots, the path index and the
//! scheduling tick that loads and unloads resources on demand.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use smallvec::SmallVec;

use crate::errors::*;
use crate::sched::prelude::{Scheduler, Task};
use crate::sched::{describe_panic, halt_unwinding};
use crate::utils::prelude::{FastHashMap, FixedPath};

use super::backend::{Backend, HeadlessBackend};
use super::builtin;
use super::loader::{Loader, LoaderFactory, Origin};
use super::params::{LoadParams, ManagerParams, NotifyPolicy};
use super::reference::{Ref, RefState};
use super::resolver::{Directory, PathResolver};
use super::resource::{Resource, ResourceType, Status};
use super::slot::{Slot, SlotHandle, SlotInfo};

type Notification = (Arc<Resource>, SmallVec<[Arc<RefState>; 4]>);

struct Registry {
    indices: FastHashMap<FixedPath, usize>,
    free: Vec<usize>,
    active: Vec<usize>,
}

/// The thread-safe part of the manager. `request` and `release` only take
/// the registry lock for reading, while `add` and `remove` take it for
/// writing, which serializes them against each other and against the tick.
pub struct ResourceManagerShared {
    capacity: usize,
    notify: NotifyPolicy,
    slots: Vec<Slot>,
    registry: RwLock<Registry>,
    factory: RwLock<LoaderFactory>,
    resolver: Arc<dyn PathResolver>,
    backend: Arc<dyn Backend>,
    // Resources of removed slots, dropped by the next tick.
    graveyard: Mutex<Vec<Arc<Resource>>>,
}

impl ResourceManagerShared {
    fn new(params: &ManagerParams, resolver: Arc<dyn PathResolver>, backend: Arc<dyn Backend>) -> Self {
        let registry = Registry {
            indices: FastHashMap::default(),
            free: (0..params.capacity).rev().collect(),
            active: Vec::with_capacity(params.capacity),
        };

        ResourceManagerShared {
            capacity: params.capacity,
            notify: params.notify,
            slots: (0..params.capacity).map(Slot::new).collect(),
            registry: RwLock::new(registry),
            factory: RwLock::new(LoaderFactory::new()),
            resolver,
            backend,
            graveyard: Mutex::new(Vec::new()),
        }
    }

    /// Registers `path` as a resource of `kind`.
    ///
    /// Fails with `DuplicatePath` if the path is registered already,
    /// `NotFound` if it is neither a builtin of `kind` nor an existing file, and
    /// `Capacity` if every slot is in use.
    pub fn add<T: AsRef<str>>(&self, kind: ResourceType, path: T, params: Option<LoadParams>) -> Result<()> {
        let path = FixedPath::new(path)?;
        let mut registry = self.registry.write().unwrap();

        if registry.indices.contains_key(&path) {
            return Err(Error::DuplicatePath(path.to_string()));
        }

        if !self.exists(kind, &path) {
            return Err(Error::NotFound(path.to_string()));
        }

        let index = registry
            .free
            .pop()
            .ok_or_else(|| Error::Capacity(self.capacity))?;

        self.slots[index].bind(SlotInfo {
            kind,
            path,
            params: params.unwrap_or_default(),
        });

        registry.indices.insert(path, index);
        registry.active.push(index);

        debug!("[ResourceManager] adds {:?} {} at slot {}.", kind, path, index);
        Ok(())
    }

    /// Unregisters `path`, blocking until its in-flight load, if any, has
    /// finished. Refs still pointing at the slot turn stale.
    pub fn remove<T: AsRef<str>>(&self, path: T) {
        let path = path.as_ref();
        let mut registry = self.registry.write().unwrap();

        let index = match registry.indices.remove(path) {
            Some(index) => index,
            None => {
                warn!("[ResourceManager] removes unregistered {}.", path);
                return;
            }
        };

        let slot = &self.slots[index];
        slot.wait();

        if slot.ref_count() > 0 {
            warn!(
                "[ResourceManager] removes {} with {} outstanding requests.",
                path,
                slot.ref_count()
            );
        }

        if let Some(resource) = slot.unbind() {
            self.graveyard.lock().unwrap().push(resource);
        }

        registry.active.retain(|&v| v != index);
        registry.free.push(index);
        debug!("[ResourceManager] removes {} from slot {}.", path, index);
    }

    /// Creates a ref addressing `path`. Slot state is untouched until the ref
    /// is requested.
    pub fn make_ref<T: AsRef<str>>(self: &Arc<Self>, kind: ResourceType, path: T) -> Result<Ref> {
        let path = FixedPath::new(path)?;
        Ok(Ref::new(kind, path, Arc::downgrade(self)))
    }

    /// Swaps the loader of `kind` resources from `origin`. It takes effect on
    /// the next load.
    pub fn register_loader(&self, kind: ResourceType, origin: Origin, loader: Arc<dyn Loader>) {
        self.factory.write().unwrap().register(kind, origin, loader);
    }

    /// The net number of outstanding requests on `path`.
    pub fn ref_count<T: AsRef<str>>(&self, path: T) -> usize {
        self.index_of(path)
            .map(|v| self.slots[v].ref_count())
            .unwrap_or(0)
    }

    /// Visits the resource at `index`, which is `Some` only if the slot is in
    /// use and its resource is loaded. `func` must not call back into this
    /// manager.
    pub fn resource<F, R>(&self, index: usize, func: F) -> Option<R>
    where
        F: FnOnce(&Resource) -> R,
    {
        let _registry = self.registry.read().unwrap();
        let slot = self.slots.get(index).filter(|v| v.is_in_use())?;
        if slot.is_loading() {
            return None;
        }

        slot.visit(|v| if v.status() == Status::Loaded { Some(func(v)) } else { None })
            .and_then(|v| v)
    }

    /// The status of the resource at `index`, `None` if there is no instance.
    pub fn status(&self, index: usize) -> Option<Status> {
        let _registry = self.registry.read().unwrap();
        self.slots
            .get(index)
            .filter(|v| v.is_in_use())
            .and_then(|v| v.status())
    }

    /// The error code of a settled resource at `index`.
    pub fn err_code(&self, index: usize) -> Option<ErrorCode> {
        let _registry = self.registry.read().unwrap();
        let slot = self.slots.get(index).filter(|v| v.is_in_use())?;
        if slot.is_loading() {
            return None;
        }

        slot.visit(|v| v.err_code())
    }

    pub fn index_of<T: AsRef<str>>(&self, path: T) -> Option<usize> {
        let registry = self.registry.read().unwrap();
        registry.indices.get(path.as_ref()).cloned()
    }

    pub fn kind_of(&self, index: usize) -> Option<ResourceType> {
        let _registry = self.registry.read().unwrap();
        self.slots
            .get(index)
            .filter(|v| v.is_in_use())
            .map(|v| v.kind())
    }

    /// The number of registered paths.
    pub fn len(&self) -> usize {
        self.registry.read().unwrap().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of loads in flight.
    pub fn loading(&self) -> usize {
        let registry = self.registry.read().unwrap();
        registry
            .active
            .iter()
            .filter(|&&v| self.slots[v].is_loading())
            .count()
    }

    pub(crate) fn request(
        &self,
        kind: ResourceType,
        path: &FixedPath,
        handle: Option<SlotHandle>,
        state: &Arc<RefState>,
    ) -> Result<SlotHandle> {
        let registry = self.registry.read().unwrap();

        let cached = handle.and_then(|handle| {
            self.slots
                .get(handle.index() as usize)
                .filter(|v| v.is_current(handle) && v.path() == *path)
        });

        let slot = match cached {
            Some(slot) => slot,
            None => {
                let index = registry
                    .indices
                    .get(path)
                    .ok_or_else(|| Error::UnknownResource(path.to_string()))?;
                &self.slots[*index]
            }
        };

        let registered = slot.kind();
        if registered != kind {
            return Err(Error::UnknownResource(format!(
                "{} ({:?} requested but registered as {:?})",
                path, kind, registered
            )));
        }

        slot.acquire(state);
        Ok(slot.handle())
    }

    pub(crate) fn release(&self, handle: SlotHandle, state: &Arc<RefState>) {
        let _registry = self.registry.read().unwrap();

        match self.slots.get(handle.index() as usize) {
            Some(slot) if slot.is_current(handle) => {
                if !slot.release(state) {
                    warn!(
                        "[ResourceManager] releases {} which has no demand.",
                        slot.path()
                    );
                }
            }
            _ => debug!("[ResourceManager] ignores release of stale {}.", handle),
        }
    }

    fn exists(&self, kind: ResourceType, path: &FixedPath) -> bool {
        if builtin::is_builtin(path) {
            builtin::find(path) == Some(kind)
                || self.factory.read().unwrap().has_override(kind, Origin::Builtin)
        } else {
            self.resolver.exists(path)
        }
    }

    /// Runs the state transitions of every active slot. Notifications are
    /// collected into `notifications` and dropped resources into `drops`, so
    /// the caller could deliver and destroy them without holding any lock.
    fn advance(
        &self,
        scheduler: &Scheduler,
        notifications: &mut Vec<Notification>,
        drops: &mut Vec<Arc<Resource>>,
    ) {
        drops.extend(self.graveyard.lock().unwrap().drain(..));

        let registry = self.registry.read().unwrap();
        for &index in &registry.active {
            let slot = &self.slots[index];
            slot.settle();

            match slot.status() {
                Some(status) if status != Status::Unloaded && slot.has_unhandled() => {
                    let pending = slot.take_unhandled();
                    if !self.notify.notifies(status) {
                        debug!(
                            "[ResourceManager] skips {} notifications of {} ({:?}).",
                            pending.len(),
                            slot.path(),
                            status
                        );
                    } else if let Some(resource) = slot.resource() {
                        notifications.push((resource, pending));
                    }
                }
                _ if slot.ref_count() > 0 && !slot.has_resource() => {
                    self.launch(slot, scheduler);
                }
                _ if slot.ref_count() == 0 && !slot.is_loading() => {
                    if let Some(resource) = slot.drop_resource() {
                        debug!("[ResourceManager] unloads {}.", slot.path());
                        drops.push(resource);
                    }
                }
                _ => {}
            }
        }
    }

    fn launch(&self, slot: &Slot, scheduler: &Scheduler) {
        let info = slot.info();
        let loader = self.factory.read().unwrap().select(info.kind, &info.path);

        let mut resource = Resource::new(
            info.kind,
            info.path,
            info.params,
            loader.clone(),
            self.backend.clone(),
        );

        if loader.is_none() {
            warn!(
                "[ResourceManager] has no loader for {:?} {}.",
                info.kind, info.path
            );

            resource.abort(ErrorCode::LoadingError);
            slot.launch(Task::ready(resource));
            return;
        }

        debug!("[ResourceManager] launches loading of {}.", info.path);

        let resolver = self.resolver.clone();
        let task = scheduler.spawn_task(move || {
            if let Err(err) = halt_unwinding(|| resource.load(&*resolver)) {
                error!(
                    "[ResourceManager] loader of {} panicked: {}",
                    resource.path(),
                    describe_panic(err.as_ref())
                );

                resource.abort(ErrorCode::LoadingError);
            }

            resource
        });

        slot.launch(task);
    }

    /// Blocks until every in-flight load has finished.
    fn wait_all(&self) {
        let registry = self.registry.read().unwrap();
        for &index in &registry.active {
            self.slots[index].wait();
        }
    }

    /// Checks if some slots still hold a resource nobody asks for.
    fn has_pending_unloads(&self) -> bool {
        let registry = self.registry.read().unwrap();
        let pending = registry.active.iter().any(|&v| {
            let slot = &self.slots[v];
            slot.ref_count() == 0 && slot.has_resource()
        });

        pending || !self.graveyard.lock().unwrap().is_empty()
    }
}

/// The driver side of the cache. It owns the background workers and the
/// builtin refs, and must be ticked with `update` once per frame.
pub struct ResourceManager {
    shared: Arc<ResourceManagerShared>,
    scheduler: Scheduler,
    builtins: Vec<Ref>,
    notifications: Vec<Notification>,
    drops: Vec<Arc<Resource>>,
    elapsed: Duration,
    ticks: u64,
    finalized: bool,
}

impl ResourceManager {
    /// Creates a manager that resolves files under `params.content_root`, with
    /// a headless backend.
    pub fn new(params: ManagerParams) -> Result<Self> {
        let resolver = Arc::new(Directory::new(&params.content_root)?);
        ResourceManager::with(params, resolver, Arc::new(HeadlessBackend::new()))
    }

    pub fn with(
        params: ManagerParams,
        resolver: Arc<dyn PathResolver>,
        backend: Arc<dyn Backend>,
    ) -> Result<Self> {
        if params.builtins && params.capacity < builtin::CATALOG.len() {
            return Err(Error::Capacity(params.capacity));
        }

        let scheduler = if params.workers == 0 {
            Scheduler::headless()
        } else {
            Scheduler::new(params.workers as u32, params.stack_size)
        };

        info!(
            "[ResourceManager] setups with {} slots and {} workers.",
            params.capacity, params.workers
        );

        let shared = Arc::new(ResourceManagerShared::new(&params, resolver, backend));
        let mut builtins = Vec::new();

        if params.builtins {
            for &(path, kind) in builtin::CATALOG.iter() {
                shared.add(kind, path, None)?;
                let mut v = shared.make_ref(kind, path)?;
                v.request()?;
                builtins.push(v);
            }
        }

        Ok(ResourceManager {
            shared,
            scheduler,
            builtins,
            notifications: Vec::new(),
            drops: Vec::new(),
            elapsed: Duration::default(),
            ticks: 0,
            finalized: false,
        })
    }

    /// Returns the shared parts of the manager.
    #[inline]
    pub fn shared(&self) -> Arc<ResourceManagerShared> {
        self.shared.clone()
    }

    /// The scheduling tick. Settled loads notify their pending refs, new
    /// demand launches loads, and resources without demand are dropped. It
    /// never blocks on a load.
    pub fn update(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.ticks += 1;

        self.shared
            .advance(&self.scheduler, &mut self.notifications, &mut self.drops);

        for (resource, pending) in self.notifications.drain(..) {
            for v in &pending {
                v.notify(&resource);
            }
        }

        self.drops.clear();
    }

    /// Waits for every in-flight load, releases the builtin refs and ticks
    /// until every resource without demand has been dropped. This is the only
    /// call that blocks on loads, and it runs on drop as well.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }

        self.shared.wait_all();
        self.builtins.clear();

        loop {
            self.update(Duration::default());
            if !self.shared.has_pending_unloads() {
                break;
            }

            self.shared.wait_all();
        }

        self.shared.wait_all();
        self.finalized = true;
        info!("[ResourceManager] finalized after {} ticks.", self.ticks);
    }

    /// The accumulated time of all ticks.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn add<T: AsRef<str>>(&self, kind: ResourceType, path: T, params: Option<LoadParams>) -> Result<()> {
        self.shared.add(kind, path, params)
    }

    #[inline]
    pub fn remove<T: AsRef<str>>(&self, path: T) {
        self.shared.remove(path)
    }

    #[inline]
    pub fn make_ref<T: AsRef<str>>(&self, kind: ResourceType, path: T) -> Result<Ref> {
        self.shared.make_ref(kind, path)
    }

    #[inline]
    pub fn ref_count<T: AsRef<str>>(&self, path: T) -> usize {
        self.shared.ref_count(path)
    }

    #[inline]
    pub fn resource<F, R>(&self, index: usize, func: F) -> Option<R>
    where
        F: FnOnce(&Resource) -> R,
    {
        self.shared.resource(index, func)
    }

    #[inline]
    pub fn status(&self, index: usize) -> Option<Status> {
        self.shared.status(index)
    }

    #[inline]
    pub fn err_code(&self, index: usize) -> Option<ErrorCode> {
        self.shared.err_code(index)
    }

    #[inline]
    pub fn index_of<T: AsRef<str>>(&self, path: T) -> Option<usize> {
        self.shared.index_of(path)
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        self.finalize();
    }
}
