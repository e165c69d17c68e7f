//! Shader program sources and the variables they expose.

use std::str::FromStr;

use inlinable_string::InlinableString;
use serde::{Deserialize, Serialize};

use crate::errors::*;

impl_handle!(ShaderHandle);

/// The maximum number of uniform variables a shader could declare.
pub const MAX_UNIFORM_VARIABLES: usize = 32;

/// The possible pre-defined and named attributes in the vertex component.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Attribute {
    Position,
    Normal,
    Color0,
    Texcoord0,
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Position" => Ok(Attribute::Position),
            "Normal" => Ok(Attribute::Normal),
            "Color0" => Ok(Attribute::Color0),
            "Texcoord0" => Ok(Attribute::Texcoord0),
            _ => Err(Error::BadFormat(format!("undefined attribute {}", s))),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum UniformVariableType {
    Texture,
    F32,
    Vector2f,
    Vector3f,
    Vector4f,
    Matrix4f,
}

/// A `ShaderParams` describes the interface of a shader program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderParams {
    /// The vertex attributes and their component counts.
    pub attributes: Vec<(Attribute, u8)>,
    pub uniforms: Vec<(InlinableString, UniformVariableType)>,
}

impl ShaderParams {
    pub fn validate(&self, vs: &str, fs: &str) -> Result<()> {
        if self.uniforms.len() > MAX_UNIFORM_VARIABLES {
            return Err(Error::BadFormat(format!(
                "too many uniform variables (> {})",
                MAX_UNIFORM_VARIABLES
            )));
        }

        if let Some(&(attr, size)) = self.attributes.iter().find(|v| v.1 == 0 || v.1 > 4) {
            return Err(Error::BadFormat(format!(
                "attribute {:?} has {} components",
                attr, size
            )));
        }

        if vs.is_empty() {
            return Err(Error::BadFormat(
                "vertex shader is required to describe a proper program".into(),
            ));
        }

        if fs.is_empty() {
            return Err(Error::BadFormat(
                "fragment shader is required to describe a proper program".into(),
            ));
        }

        Ok(())
    }

    /// Gets the type of a uniform variable by its name.
    pub fn uniform<T: AsRef<str>>(&self, name: T) -> Option<UniformVariableType> {
        let name = name.as_ref();
        self.uniforms.iter().find(|v| v.0 == name).map(|v| v.1)
    }
}

/// The loaded state of a shader: the backend object and its description.
#[derive(Debug, Clone)]
pub struct ShaderResource {
    pub handle: ShaderHandle,
    pub params: ShaderParams,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate() {
        let mut params = ShaderParams::default();
        params.attributes.push((Attribute::Position, 3));
        params
            .uniforms
            .push(("u_MainTex".into(), UniformVariableType::Texture));

        assert!(params.validate("vs", "fs").is_ok());
        assert!(params.validate("", "fs").is_err());
        assert!(params.validate("vs", "").is_err());
        assert_eq!(
            params.uniform("u_MainTex"),
            Some(UniformVariableType::Texture)
        );
        assert_eq!(params.uniform("u_Color"), None);

        params.attributes.push((Attribute::Normal, 5));
        assert!(params.validate("vs", "fs").is_err());
    }

    #[test]
    fn attribute() {
        assert_eq!("Normal".parse::<Attribute>().unwrap(), Attribute::Normal);
        assert!("Tangent".parse::<Attribute>().is_err());
    }
}
