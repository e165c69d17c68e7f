use std::io::Cursor;

use crate::errors::*;
use crate::res::loader::{LoadContext, Loader};
use crate::res::resource::ResourceData;

use super::mesh::*;

pub const MAGIC: [u8; 8] = [
    'V' as u8, 'M' as u8, 'S' as u8, 'H' as u8, ' ' as u8, 0, 0, 1,
];

/// Decodes `.vmsh` files: MAGIC, then bincode-encoded `MeshParams` and
/// `MeshData`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshLoader;

impl MeshLoader {
    pub fn encode(params: &MeshParams, data: &MeshData) -> Result<Vec<u8>> {
        let mut buf = MAGIC.to_vec();
        bincode::serialize_into(&mut buf, params)?;
        bincode::serialize_into(&mut buf, data)?;
        Ok(buf)
    }

    pub fn upload(ctx: &LoadContext, params: MeshParams, data: &MeshData) -> Result<ResourceData> {
        params.validate(data)?;
        let handle = ctx.backend.create_mesh(&params, data)?;

        info!(
            "[MeshLoader] loads {} ({} verts, {} idxes).",
            ctx.path, params.num_verts, params.num_idxes
        );

        Ok(ResourceData::Mesh(MeshResource { handle, params }))
    }
}

impl Loader for MeshLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let bytes = ctx.read()?;

        // MAGIC: [u8; 8]
        if bytes.len() < MAGIC.len() || bytes[0..8] != MAGIC[..] {
            return Err(Error::BadFormat(format!(
                "[MeshLoader] MAGIC number of {} not match.",
                ctx.path
            )));
        }

        let mut file = Cursor::new(&bytes[8..]);
        let params: MeshParams = bincode::deserialize_from(&mut file)?;
        let data: MeshData = bincode::deserialize_from(&mut file)?;
        MeshLoader::upload(ctx, params, &data)
    }
}
