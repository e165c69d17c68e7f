use std::io::Cursor;

use crate::errors::*;
use crate::res::loader::{LoadContext, Loader};
use crate::res::resource::ResourceData;

use super::shader::*;

pub const MAGIC: [u8; 8] = [
    'V' as u8, 'S' as u8, 'H' as u8, 'D' as u8, ' ' as u8, 0, 0, 1,
];

/// Decodes `.vshd` files: MAGIC, then bincode-encoded `ShaderParams`, vertex
/// and fragment sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShaderLoader;

impl ShaderLoader {
    pub fn encode(params: &ShaderParams, vs: &str, fs: &str) -> Result<Vec<u8>> {
        let mut buf = MAGIC.to_vec();
        bincode::serialize_into(&mut buf, params)?;
        bincode::serialize_into(&mut buf, vs)?;
        bincode::serialize_into(&mut buf, fs)?;
        Ok(buf)
    }

    pub fn upload(ctx: &LoadContext, params: ShaderParams, vs: &str, fs: &str) -> Result<ResourceData> {
        params.validate(vs, fs)?;
        let handle = ctx.backend.create_shader(&params, vs, fs)?;

        info!(
            "[ShaderLoader] loads {} ({} attributes, {} uniforms).",
            ctx.path,
            params.attributes.len(),
            params.uniforms.len()
        );

        Ok(ResourceData::Shader(ShaderResource { handle, params }))
    }
}

impl Loader for ShaderLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let bytes = ctx.read()?;

        if bytes.len() < MAGIC.len() || bytes[0..8] != MAGIC[..] {
            return Err(Error::BadFormat(format!(
                "[ShaderLoader] MAGIC number of {} not match.",
                ctx.path
            )));
        }

        let mut file = Cursor::new(&bytes[8..]);
        let params: ShaderParams = bincode::deserialize_from(&mut file)?;
        let vs: String = bincode::deserialize_from(&mut file)?;
        let fs: String = bincode::deserialize_from(&mut file)?;
        ShaderLoader::upload(ctx, params, &vs, &fs)
    }
}
