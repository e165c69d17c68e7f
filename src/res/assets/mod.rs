//! Per-kind data of resources, the file loaders that decode them and the
//! builders that generate the builtin catalog.

pub mod file;
pub mod material;
pub mod material_loader;
pub mod mesh;
pub mod mesh_builder;
pub mod mesh_loader;
pub mod shader;
pub mod shader_loader;
pub mod texture;
pub mod texture_builder;
pub mod texture_loader;

pub mod prelude {
    pub use super::file::{FileLoader, FileResource};
    pub use super::material::{MaterialDesc, MaterialResource};
    pub use super::material_loader::MaterialLoader;
    pub use super::mesh::{
        IndexFormat, MeshData, MeshHandle, MeshParams, MeshPrimitive, MeshResource, Vertex,
    };
    pub use super::mesh_loader::MeshLoader;
    pub use super::shader::{
        Attribute, ShaderHandle, ShaderParams, ShaderResource, UniformVariableType,
    };
    pub use super::shader_loader::ShaderLoader;
    pub use super::texture::{
        TextureFilter, TextureFormat, TextureHandle, TextureParams, TextureResource, TextureWrap,
    };
    pub use super::texture_loader::TextureLoader;
}
