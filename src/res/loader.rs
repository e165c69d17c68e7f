//! The seam where kind-specific decoders plug into the cache.

use std::sync::Arc;

use crate::errors::*;
use crate::utils::prelude::{FastHashMap, FixedPath};

use super::assets::prelude::*;
use super::backend::Backend;
use super::builtin::{self, BuiltinLoader};
use super::params::LoadParams;
use super::resolver::PathResolver;
use super::resource::{ResourceData, ResourceType};

/// Everything a loader could touch while it is decoding a resource.
pub struct LoadContext<'a> {
    pub path: &'a FixedPath,
    pub params: &'a LoadParams,
    pub resolver: &'a dyn PathResolver,
    pub backend: &'a dyn Backend,
}

impl<'a> LoadContext<'a> {
    /// Reads the content of the resource path into memory.
    pub fn read(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.resolver
            .read_to_end(self.path, &mut bytes)
            .map_err(|err| Error::CannotOpenFile(self.path.to_string(), err))?;
        Ok(bytes)
    }
}

/// A stateless strategy that turns a path into kind-specific data. Loaders run
/// on the background workers, so they must be shareable across threads.
pub trait Loader: Send + Sync + 'static {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData>;
}

/// Where the content of a resource comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Procedurally generated, named with `BUILTIN_PREFIX`.
    Builtin,
    /// Read from the path resolver.
    File,
}

impl Origin {
    #[inline]
    pub fn of<T: AsRef<str>>(path: T) -> Self {
        if builtin::is_builtin(path) {
            Origin::Builtin
        } else {
            Origin::File
        }
    }
}

/// Selects a loader for `(ResourceType, Origin)` pairs. Registered loaders
/// override the defaults shipped with this crate.
#[derive(Default)]
pub struct LoaderFactory {
    overrides: FastHashMap<(ResourceType, Origin), Arc<dyn Loader>>,
}

impl LoaderFactory {
    pub fn new() -> Self {
        LoaderFactory::default()
    }

    /// Registers `loader` for `kind` resources of `origin`, returning the
    /// previous override if any.
    pub fn register(
        &mut self,
        kind: ResourceType,
        origin: Origin,
        loader: Arc<dyn Loader>,
    ) -> Option<Arc<dyn Loader>> {
        self.overrides.insert((kind, origin), loader)
    }

    pub fn unregister(&mut self, kind: ResourceType, origin: Origin) -> Option<Arc<dyn Loader>> {
        self.overrides.remove(&(kind, origin))
    }

    #[inline]
    pub fn has_override(&self, kind: ResourceType, origin: Origin) -> bool {
        self.overrides.contains_key(&(kind, origin))
    }

    /// Returns the loader of a resource, or `None` if there is no decoder for
    /// this combination.
    pub fn select(&self, kind: ResourceType, path: &FixedPath) -> Option<Arc<dyn Loader>> {
        let origin = Origin::of(path);
        if let Some(loader) = self.overrides.get(&(kind, origin)) {
            return Some(loader.clone());
        }

        Self::default_loader(kind, origin)
    }

    fn default_loader(kind: ResourceType, origin: Origin) -> Option<Arc<dyn Loader>> {
        match (kind, origin) {
            (_, Origin::Builtin) => Some(Arc::new(BuiltinLoader)),
            (ResourceType::File, Origin::File) => Some(Arc::new(FileLoader)),
            (ResourceType::Texture, Origin::File) => Some(Arc::new(TextureLoader)),
            (ResourceType::Mesh, Origin::File) => Some(Arc::new(MeshLoader)),
            (ResourceType::Shader, Origin::File) => Some(Arc::new(ShaderLoader)),
            (ResourceType::Material, Origin::File) => Some(Arc::new(MaterialLoader)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Nothing;

    impl Loader for Nothing {
        fn load(&self, _: &LoadContext) -> Result<ResourceData> {
            Err(Error::Loading("nothing".into()))
        }
    }

    #[test]
    fn origin() {
        assert_eq!(Origin::of("builtin:textures/white"), Origin::Builtin);
        assert_eq!(Origin::of("textures/white.vtex"), Origin::File);
        assert_eq!(Origin::of("builtin"), Origin::File);
    }

    #[test]
    fn overrides() {
        let path = FixedPath::new("a.bin").unwrap();
        let mut factory = LoaderFactory::new();
        assert!(factory.select(ResourceType::File, &path).is_some());

        let nothing: Arc<dyn Loader> = Arc::new(Nothing);
        assert!(factory
            .register(ResourceType::File, Origin::File, nothing.clone())
            .is_none());

        let selected = factory.select(ResourceType::File, &path).unwrap();
        assert!(Arc::ptr_eq(&selected, &nothing));

        assert!(factory.unregister(ResourceType::File, Origin::File).is_some());
        let selected = factory.select(ResourceType::File, &path).unwrap();
        assert!(!Arc::ptr_eq(&selected, &nothing));
    }
}
