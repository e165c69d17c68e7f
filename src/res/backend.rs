//! The boundary to the device that owns the uploaded objects (e.g. a GPU).

use std::sync::Mutex;

use failure::Error;

use crate::utils::prelude::{Handle, HandlePool};

use super::assets::prelude::*;

/// Creates and deletes device objects on behalf of loaders. Implementations
/// are called from background workers concurrently.
pub trait Backend: Send + Sync + 'static {
    fn create_texture(&self, params: &TextureParams, bytes: &[u8]) -> Result<TextureHandle, Error>;
    fn delete_texture(&self, handle: TextureHandle);

    fn create_mesh(&self, params: &MeshParams, data: &MeshData) -> Result<MeshHandle, Error>;
    fn delete_mesh(&self, handle: MeshHandle);

    fn create_shader(&self, params: &ShaderParams, vs: &str, fs: &str) -> Result<ShaderHandle, Error>;
    fn delete_shader(&self, handle: ShaderHandle);
}

/// A backend without device. It only allocates handles and keeps track of the
/// live objects, which is all the cache needs to run in tools and tests.
#[derive(Default)]
pub struct HeadlessBackend {
    textures: Mutex<HandlePool>,
    meshes: Mutex<HandlePool>,
    shaders: Mutex<HandlePool>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        HeadlessBackend::default()
    }

    /// The number of live textures.
    pub fn textures(&self) -> usize {
        self.textures.lock().unwrap().len()
    }

    pub fn meshes(&self) -> usize {
        self.meshes.lock().unwrap().len()
    }

    pub fn shaders(&self) -> usize {
        self.shaders.lock().unwrap().len()
    }

    fn delete(pool: &Mutex<HandlePool>, handle: Handle) {
        if !pool.lock().unwrap().free(handle) {
            warn!("[HeadlessBackend] deletes dead object {}.", handle);
        }
    }
}

impl Backend for HeadlessBackend {
    fn create_texture(&self, _: &TextureParams, _: &[u8]) -> Result<TextureHandle, Error> {
        Ok(self.textures.lock().unwrap().create().into())
    }

    fn delete_texture(&self, handle: TextureHandle) {
        Self::delete(&self.textures, handle.into());
    }

    fn create_mesh(&self, _: &MeshParams, _: &MeshData) -> Result<MeshHandle, Error> {
        Ok(self.meshes.lock().unwrap().create().into())
    }

    fn delete_mesh(&self, handle: MeshHandle) {
        Self::delete(&self.meshes, handle.into());
    }

    fn create_shader(&self, _: &ShaderParams, _: &str, _: &str) -> Result<ShaderHandle, Error> {
        Ok(self.shaders.lock().unwrap().create().into())
    }

    fn delete_shader(&self, handle: ShaderHandle) {
        Self::delete(&self.shaders, handle.into());
    }
}
