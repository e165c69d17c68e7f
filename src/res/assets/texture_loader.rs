use std::io::Cursor;

use crate::errors::*;
use crate::res::loader::{LoadContext, Loader};
use crate::res::resource::ResourceData;

use super::texture::*;

pub const MAGIC: [u8; 8] = [
    'V' as u8, 'T' as u8, 'E' as u8, 'X' as u8, ' ' as u8, 0, 0, 1,
];

/// Decodes `.vtex` files: MAGIC, then bincode-encoded `TextureParams` and
/// pixel bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureLoader;

impl TextureLoader {
    /// Encodes a texture into the format `TextureLoader` accepts.
    pub fn encode(params: &TextureParams, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut buf = MAGIC.to_vec();
        bincode::serialize_into(&mut buf, params)?;
        bincode::serialize_into(&mut buf, bytes)?;
        Ok(buf)
    }

    /// Creates the backend object of a texture after validating its content.
    pub fn upload(ctx: &LoadContext, params: TextureParams, bytes: &[u8]) -> Result<ResourceData> {
        params.validate(bytes)?;
        let handle = ctx.backend.create_texture(&params, bytes)?;

        info!(
            "[TextureLoader] loads {} ({}x{} - {:?}).",
            ctx.path, params.dimensions.0, params.dimensions.1, params.format
        );

        Ok(ResourceData::Texture(TextureResource { handle, params }))
    }
}

impl Loader for TextureLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let bytes = ctx.read()?;

        // magic: [u8; 8]
        if bytes.len() < MAGIC.len() || bytes[0..8] != MAGIC[..] {
            return Err(Error::BadFormat(format!(
                "[TextureLoader] MAGIC number of {} not match.",
                ctx.path
            )));
        }

        let mut file = Cursor::new(&bytes[8..]);
        let mut params: TextureParams = bincode::deserialize_from(&mut file)?;
        let data: Vec<u8> = bincode::deserialize_from(&mut file)?;

        params.apply(ctx.params);
        TextureLoader::upload(ctx, params, &data)
    }
}
