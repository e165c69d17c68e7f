//! Opaque blobs read verbatim from the resolver.

use crate::errors::*;
use crate::res::loader::{LoadContext, Loader};
use crate::res::resource::ResourceData;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileResource {
    pub bytes: Vec<u8>,
}

impl FileResource {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reads the whole file into memory without any decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl Loader for FileLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let bytes = ctx.read()?;
        info!("[FileLoader] loads {} ({} bytes).", ctx.path, bytes.len());
        Ok(ResourceData::File(FileResource { bytes }))
    }
}
