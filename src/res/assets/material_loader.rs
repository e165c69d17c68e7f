use crate::errors::*;
use crate::res::loader::{LoadContext, Loader};
use crate::res::resource::ResourceData;

use super::material::*;

/// Decodes JSON material descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialLoader;

impl Loader for MaterialLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let bytes = ctx.read()?;
        let desc: MaterialDesc = serde_json::from_slice(&bytes)?;
        let material = MaterialResource::from_desc(desc)?;

        info!(
            "[MaterialLoader] loads {} (shader {}, {} textures).",
            ctx.path,
            material.shader,
            material.textures.len()
        );

        Ok(ResourceData::Material(material))
    }
}
