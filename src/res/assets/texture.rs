//! Immutable 2D texture. A texture is a container of one image which could be
//! sampled from a shader once uploaded by the backend.

use serde::{Deserialize, Serialize};

use crate::errors::*;
use crate::res::params::LoadParams;

impl_handle!(TextureHandle);

/// The parameters of a texture object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureParams {
    /// Sets the wrap parameter for texture.
    pub wrap: TextureWrap,
    /// Specify how the texture is used whenever the pixel being sampled.
    pub filter: TextureFilter,
    /// Should we generates a complete set of mipmaps for a texture object.
    pub mipmap: bool,
    /// Sets the format of data.
    pub format: TextureFormat,
    /// Sets the dimensions of texture.
    pub dimensions: (u32, u32),
}

impl Default for TextureParams {
    fn default() -> Self {
        TextureParams {
            format: TextureFormat::U8U8U8U8,
            wrap: TextureWrap::Clamp,
            filter: TextureFilter::Linear,
            mipmap: false,
            dimensions: (0, 0),
        }
    }
}

impl TextureParams {
    /// Returns the exact size in bytes of the image data, or `None` if it does
    /// not fit in `usize`.
    pub fn size(&self) -> Option<usize> {
        (self.dimensions.0 as usize)
            .checked_mul(self.dimensions.1 as usize)?
            .checked_mul(self.format.size())
    }

    /// Returns the size in bytes of the image data, saturated at `usize::MAX`.
    #[inline]
    pub fn len(&self) -> usize {
        self.size().unwrap_or(usize::MAX)
    }

    /// Checks if the texture has no pixel at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self, bytes: &[u8]) -> Result<()> {
        let len = self.size().ok_or_else(|| {
            Error::BadFormat(format!(
                "texture dimensions {:?} overflow",
                self.dimensions
            ))
        })?;

        if len == 0 {
            return Err(Error::BadFormat(format!(
                "texture dimensions {:?} are empty",
                self.dimensions
            )));
        }

        if bytes.len() != len {
            return Err(Error::BadFormat(format!(
                "texture expects {} bytes but got {}",
                len,
                bytes.len()
            )));
        }

        Ok(())
    }

    /// Overrides sampling state with the hints in `params`: `filter`
    /// (`nearest`/`linear`), `wrap` (`repeat`/`mirror`/`clamp`) and `mipmap`.
    pub fn apply(&mut self, params: &LoadParams) {
        match params.get("filter") {
            Some("nearest") => self.filter = TextureFilter::Nearest,
            Some("linear") => self.filter = TextureFilter::Linear,
            Some(v) => warn!("[TextureParams] ignores unknown filter {:?}.", v),
            None => {}
        }

        match params.get("wrap") {
            Some("repeat") => self.wrap = TextureWrap::Repeat,
            Some("mirror") => self.wrap = TextureWrap::Mirror,
            Some("clamp") => self.wrap = TextureWrap::Clamp,
            Some(v) => warn!("[TextureParams] ignores unknown wrap {:?}.", v),
            None => {}
        }

        if let Some(mipmap) = params.get_bool("mipmap") {
            self.mipmap = mipmap;
        }
    }
}

/// Specify how the texture is used whenever the pixel being sampled.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TextureFilter {
    /// Returns the value of the texture element that is nearest to the center
    /// of the pixel being textured.
    Nearest,
    /// Returns the weighted average of the four texture elements that are closest to the
    /// center of the pixel being textured.
    Linear,
}

/// Sets the wrap parameter for texture.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TextureWrap {
    /// Samples at coord x + 1 map to coord x.
    Repeat,
    /// Samples at coord x + 1 map to coord 1 - x.
    Mirror,
    /// Samples at coord x + 1 map to coord 1.
    Clamp,
}

/// List of all the possible formats of input data when uploading to texture.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TextureFormat {
    U8,
    U8U8,
    U8U8U8,
    U8U8U8U8,
}

impl TextureFormat {
    /// Returns the size in bytes of a pixel.
    pub fn size(self) -> usize {
        match self {
            TextureFormat::U8 => 1,
            TextureFormat::U8U8 => 2,
            TextureFormat::U8U8U8 => 3,
            TextureFormat::U8U8U8U8 => 4,
        }
    }
}

/// The loaded state of a texture: the backend object and its description.
#[derive(Debug, Clone, Copy)]
pub struct TextureResource {
    pub handle: TextureHandle,
    pub params: TextureParams,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate() {
        let mut params = TextureParams::default();
        assert!(params.validate(&[]).is_err());

        params.dimensions = (2, 2);
        assert_eq!(params.len(), 16);
        assert!(params.validate(&[0; 16]).is_ok());
        assert!(params.validate(&[0; 15]).is_err());

        params.format = TextureFormat::U8;
        assert!(params.validate(&[0; 4]).is_ok());

        params.format = TextureFormat::U8U8U8U8;
        params.dimensions = (::std::u32::MAX, ::std::u32::MAX);
        assert!(params.size().is_none());
        assert_eq!(params.validate(&[]).unwrap_err().code(), ErrorCode::BadFormat);
    }

    #[test]
    fn apply() {
        let mut params = TextureParams::default();
        params.apply(
            &LoadParams::new()
                .with("filter", "nearest")
                .with("wrap", "repeat")
                .with("mipmap", "true"),
        );

        assert_eq!(params.filter, TextureFilter::Nearest);
        assert_eq!(params.wrap, TextureWrap::Repeat);
        assert!(params.mipmap);
    }
}
