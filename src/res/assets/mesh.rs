//! Immutable mesh: a vertex buffer plus an index buffer.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::errors::*;

impl_handle!(MeshHandle);

/// The layout every builtin and imported mesh uses: position, normal and
/// texcoord, all in little-endian `f32`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    /// The size in bytes of an encoded vertex.
    pub const STRIDE: usize = 32;

    #[inline]
    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Vertex {
            position,
            normal,
            texcoord,
        }
    }

    pub fn encode(verts: &[Vertex]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(verts.len() * Vertex::STRIDE);
        for v in verts {
            let fields = v.position.iter().chain(&v.normal).chain(&v.texcoord);
            for &f in fields {
                // Writing into a `Vec` never fails.
                let _ = bytes.write_f32::<LittleEndian>(f);
            }
        }

        bytes
    }

    pub fn decode(bytes: &[u8]) -> Result<Vec<Vertex>> {
        if bytes.len() % Vertex::STRIDE != 0 {
            return Err(Error::BadFormat(format!(
                "vertex buffer of {} bytes is not a multiple of {}",
                bytes.len(),
                Vertex::STRIDE
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let mut verts = Vec::with_capacity(bytes.len() / Vertex::STRIDE);
        for _ in 0..bytes.len() / Vertex::STRIDE {
            let mut v = [0.0f32; 8];
            cursor.read_f32_into::<LittleEndian>(&mut v)?;
            verts.push(Vertex::new(
                [v[0], v[1], v[2]],
                [v[3], v[4], v[5]],
                [v[6], v[7]],
            ));
        }

        Ok(verts)
    }
}

/// Defines how the input vertex data is used to assemble primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshPrimitive {
    Points,
    Lines,
    Triangles,
}

impl MeshPrimitive {
    /// Returns the number of indices a single primitive consumes.
    pub fn assemble(self) -> usize {
        match self {
            MeshPrimitive::Points => 1,
            MeshPrimitive::Lines => 2,
            MeshPrimitive::Triangles => 3,
        }
    }
}

/// Specifies the data type of index buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    /// Returns the size in bytes of an index.
    pub fn stride(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }

    pub fn encode(idxes: &[u16]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(idxes.len() * 2);
        for &i in idxes {
            let _ = bytes.write_u16::<LittleEndian>(i);
        }

        bytes
    }

    /// Returns the largest index in `bytes`.
    fn max(self, bytes: &[u8]) -> Result<u32> {
        let mut cursor = Cursor::new(bytes);
        let mut max = 0;
        for _ in 0..bytes.len() / self.stride() {
            let v = match self {
                IndexFormat::U16 => u32::from(cursor.read_u16::<LittleEndian>()?),
                IndexFormat::U32 => cursor.read_u32::<LittleEndian>()?,
            };

            max = max.max(v);
        }

        Ok(max)
    }
}

/// The parameters of a mesh object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshParams {
    /// The size in bytes of a vertex.
    pub stride: usize,
    pub num_verts: usize,
    pub num_idxes: usize,
    pub index_format: IndexFormat,
    pub primitive: MeshPrimitive,
}

impl Default for MeshParams {
    fn default() -> Self {
        MeshParams {
            stride: Vertex::STRIDE,
            num_verts: 0,
            num_idxes: 0,
            index_format: IndexFormat::U16,
            primitive: MeshPrimitive::Triangles,
        }
    }
}

impl MeshParams {
    pub fn validate(&self, data: &MeshData) -> Result<()> {
        if self.num_verts == 0 || self.stride == 0 {
            return Err(Error::BadFormat("mesh has no vertex".into()));
        }

        let vlen = self.num_verts.checked_mul(self.stride).ok_or_else(|| {
            Error::BadFormat(format!(
                "vertex buffer of {} x {} bytes overflows",
                self.num_verts, self.stride
            ))
        })?;

        if data.vptr.len() != vlen {
            return Err(Error::BadFormat(format!(
                "vertex buffer expects {} bytes but got {}",
                vlen,
                data.vptr.len()
            )));
        }

        let ilen = self
            .num_idxes
            .checked_mul(self.index_format.stride())
            .ok_or_else(|| {
                Error::BadFormat(format!("index buffer of {} indices overflows", self.num_idxes))
            })?;

        if data.iptr.len() != ilen {
            return Err(Error::BadFormat(format!(
                "index buffer expects {} bytes but got {}",
                ilen,
                data.iptr.len()
            )));
        }

        if self.num_idxes % self.primitive.assemble() != 0 {
            return Err(Error::BadFormat(format!(
                "{} indices could not assemble {:?}",
                self.num_idxes, self.primitive
            )));
        }

        if self.num_idxes > 0 && self.index_format.max(&data.iptr)? as usize >= self.num_verts {
            return Err(Error::BadFormat("index out of vertex range".into()));
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshData {
    pub vptr: Vec<u8>,
    pub iptr: Vec<u8>,
}

/// The loaded state of a mesh: the backend object and its description.
#[derive(Debug, Clone, Copy)]
pub struct MeshResource {
    pub handle: MeshHandle,
    pub params: MeshParams,
}
