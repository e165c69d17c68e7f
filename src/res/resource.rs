//! The loadable entity owned by a slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::*;
use crate::utils::prelude::FixedPath;

use super::assets::prelude::*;
use super::backend::Backend;
use super::loader::{LoadContext, Loader};
use super::params::LoadParams;
use super::resolver::PathResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    File,
    Shader,
    Material,
    Mesh,
    Texture,
}

/// The lifecycle of a resource instance: `Unloaded` moves to `Loaded` or
/// `Error` exactly once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Unloaded,
    Loaded,
    Error,
}

/// The decoded payload of a resource.
#[derive(Debug, Clone)]
pub enum ResourceData {
    File(FileResource),
    Shader(ShaderResource),
    Material(MaterialResource),
    Mesh(MeshResource),
    Texture(TextureResource),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceType {
        match *self {
            ResourceData::File(_) => ResourceType::File,
            ResourceData::Shader(_) => ResourceType::Shader,
            ResourceData::Material(_) => ResourceType::Material,
            ResourceData::Mesh(_) => ResourceType::Mesh,
            ResourceData::Texture(_) => ResourceType::Texture,
        }
    }

    fn release(&self, backend: &dyn Backend) {
        match *self {
            ResourceData::Shader(ref v) => backend.delete_shader(v.handle),
            ResourceData::Mesh(ref v) => backend.delete_mesh(v.handle),
            ResourceData::Texture(ref v) => backend.delete_texture(v.handle),
            ResourceData::File(_) | ResourceData::Material(_) => {}
        }
    }
}

static INSTANCES: AtomicU64 = AtomicU64::new(1);

/// A resource instance. It is created by the manager once there is demand on
/// its slot, loaded on a background worker and dropped by the manager once
/// the demand is gone. Dropping it releases its backend objects.
pub struct Resource {
    kind: ResourceType,
    path: FixedPath,
    params: LoadParams,
    instance: u64,
    status: Status,
    err_code: ErrorCode,
    data: Option<ResourceData>,
    loader: Option<Arc<dyn Loader>>,
    backend: Arc<dyn Backend>,
}

impl Resource {
    pub fn new(
        kind: ResourceType,
        path: FixedPath,
        params: LoadParams,
        loader: Option<Arc<dyn Loader>>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Resource {
            kind,
            path,
            params,
            instance: INSTANCES.fetch_add(1, Ordering::Relaxed),
            status: Status::Unloaded,
            err_code: ErrorCode::NoError,
            data: None,
            loader,
            backend,
        }
    }

    /// Runs the loader. This is effective only once per instance, the terminal
    /// status is set as the last action.
    pub fn load(&mut self, resolver: &dyn PathResolver) {
        if self.status != Status::Unloaded {
            warn!(
                "[Resource] {} (#{}) has been loaded already.",
                self.path, self.instance
            );
            return;
        }

        let loader = match self.loader {
            Some(ref loader) => loader.clone(),
            None => {
                self.abort(ErrorCode::LoadingError);
                return;
            }
        };

        let ts = Instant::now();
        let result = {
            let ctx = LoadContext {
                path: &self.path,
                params: &self.params,
                resolver,
                backend: &*self.backend,
            };

            loader.load(&ctx)
        };

        match result {
            Ok(data) => {
                if data.kind() != self.kind {
                    warn!(
                        "[Resource] {} expects {:?} but got {:?}.",
                        self.path,
                        self.kind,
                        data.kind()
                    );

                    data.release(&*self.backend);
                    self.abort(ErrorCode::BadFormat);
                    return;
                }

                info!(
                    "[Resource] {} (#{}) loaded in {:?}.",
                    self.path,
                    self.instance,
                    ts.elapsed()
                );

                self.data = Some(data);
                self.err_code = ErrorCode::NoError;
                self.status = Status::Loaded;
            }
            Err(err) => {
                warn!("[Resource] failed to load {}: {}", self.path, err);
                self.abort(err.code());
            }
        }
    }

    /// Marks this instance as failed with `code`.
    pub fn abort(&mut self, code: ErrorCode) {
        if self.status == Status::Unloaded {
            self.err_code = code;
            self.status = Status::Error;
        }
    }

    #[inline]
    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &FixedPath {
        &self.path
    }

    #[inline]
    pub fn params(&self) -> &LoadParams {
        &self.params
    }

    /// The unique id of this instance. A resource that is dropped and created
    /// again gets a new id.
    #[inline]
    pub fn instance(&self) -> u64 {
        self.instance
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn err_code(&self) -> ErrorCode {
        self.err_code
    }

    #[inline]
    pub fn data(&self) -> Option<&ResourceData> {
        self.data.as_ref()
    }

    pub fn as_file(&self) -> Option<&FileResource> {
        match self.data {
            Some(ResourceData::File(ref v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_shader(&self) -> Option<&ShaderResource> {
        match self.data {
            Some(ResourceData::Shader(ref v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_material(&self) -> Option<&MaterialResource> {
        match self.data {
            Some(ResourceData::Material(ref v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshResource> {
        match self.data {
            Some(ResourceData::Mesh(ref v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureResource> {
        match self.data {
            Some(ResourceData::Texture(ref v)) => Some(v),
            _ => None,
        }
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            data.release(&*self.backend);
            debug!("[Resource] {} (#{}) dropped.", self.path, self.instance);
        }
    }
}

impl ::std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("instance", &self.instance)
            .field("status", &self.status)
            .field("err_code", &self.err_code)
            .finish()
    }
}
