//! Materials bind a shader to the textures and constants it samples. They
//! reference other resources by path and own no backend object.

use inlinable_string::InlinableString;
use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::utils::prelude::{FastHashMap, FixedPath};

/// The serialized form of a material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub shader: String,
    pub textures: FastHashMap<InlinableString, String>,
    pub colors: FastHashMap<InlinableString, [f32; 4]>,
    pub scalars: FastHashMap<InlinableString, f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialResource {
    pub shader: FixedPath,
    pub textures: FastHashMap<InlinableString, FixedPath>,
    pub colors: FastHashMap<InlinableString, [f32; 4]>,
    pub scalars: FastHashMap<InlinableString, f32>,
}

impl MaterialResource {
    pub fn from_desc(desc: MaterialDesc) -> Result<Self> {
        if desc.shader.is_empty() {
            return Err(Error::BadFormat("material without shader".into()));
        }

        let shader = Self::path(&desc.shader)?;
        let mut textures = FastHashMap::default();
        for (k, v) in desc.textures {
            textures.insert(k, Self::path(&v)?);
        }

        Ok(MaterialResource {
            shader,
            textures,
            colors: desc.colors,
            scalars: desc.scalars,
        })
    }

    /// Returns the path of the texture bound to `name`.
    pub fn texture<T: AsRef<str>>(&self, name: T) -> Option<&FixedPath> {
        self.textures.get(name.as_ref())
    }

    fn path(v: &str) -> Result<FixedPath> {
        FixedPath::new(v).map_err(|err| Error::BadFormat(format!("{} ({:?})", err, v)))
    }
}
