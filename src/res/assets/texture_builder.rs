//! Procedural textures of the builtin catalog.

use super::texture::*;

fn solid(rgba: [u8; 4]) -> (TextureParams, Vec<u8>) {
    let mut params = TextureParams::default();
    params.dimensions = (2, 2);

    let bytes = rgba.iter().cloned().cycle().take(params.len()).collect();
    (params, bytes)
}

pub fn white() -> (TextureParams, Vec<u8>) {
    solid([255, 255, 255, 255])
}

pub fn black() -> (TextureParams, Vec<u8>) {
    solid([0, 0, 0, 255])
}

/// A flat tangent-space normal map.
pub fn normal() -> (TextureParams, Vec<u8>) {
    solid([128, 128, 255, 255])
}

/// A 64x64 black and white checkerboard with 8 pixel cells.
pub fn checkerboard() -> (TextureParams, Vec<u8>) {
    const SIZE: u32 = 64;
    const CELL: u32 = 8;

    let mut params = TextureParams::default();
    params.dimensions = (SIZE, SIZE);
    params.filter = TextureFilter::Nearest;
    params.wrap = TextureWrap::Repeat;

    let mut bytes = Vec::with_capacity(params.len());
    for y in 0..SIZE {
        for x in 0..SIZE {
            let v = if (x / CELL + y / CELL) % 2 == 0 { 255 } else { 0 };
            bytes.extend_from_slice(&[v, v, v, 255]);
        }
    }

    (params, bytes)
}
