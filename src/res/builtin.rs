//! The catalog of builtin resources. They are named with a reserved prefix,
//! generated procedurally and never touch the path resolver.

use crate::errors::*;
use crate::utils::prelude::{FastHashMap, FixedPath};

use super::assets::prelude::*;
use super::assets::{mesh_builder, texture_builder};
use super::loader::{LoadContext, Loader};
use super::resource::{ResourceData, ResourceType};

/// Paths starting with this prefix are served by `BuiltinLoader`.
pub const BUILTIN_PREFIX: &str = "builtin:";

pub const WHITE: &str = "builtin:textures/white";
pub const BLACK: &str = "builtin:textures/black";
pub const NORMAL: &str = "builtin:textures/normal";
pub const CHECKERBOARD: &str = "builtin:textures/checkerboard";
pub const QUAD: &str = "builtin:meshes/quad";
pub const CUBE: &str = "builtin:meshes/cube";
pub const SPHERE: &str = "builtin:meshes/sphere";
pub const UNLIT: &str = "builtin:shaders/unlit";
pub const DEFAULT_MATERIAL: &str = "builtin:materials/default";

/// Every builtin resource and its type.
pub const CATALOG: [(&str, ResourceType); 9] = [
    (WHITE, ResourceType::Texture),
    (BLACK, ResourceType::Texture),
    (NORMAL, ResourceType::Texture),
    (CHECKERBOARD, ResourceType::Texture),
    (QUAD, ResourceType::Mesh),
    (CUBE, ResourceType::Mesh),
    (SPHERE, ResourceType::Mesh),
    (UNLIT, ResourceType::Shader),
    (DEFAULT_MATERIAL, ResourceType::Material),
];

/// Sphere subdivisions beyond this would overflow 16-bit indices.
pub const MAX_SPHERE_SUBDIVISIONS: usize = 5;

#[inline]
pub fn is_builtin<T: AsRef<str>>(path: T) -> bool {
    path.as_ref().starts_with(BUILTIN_PREFIX)
}

/// Finds the type of a builtin resource in the catalog.
pub fn find<T: AsRef<str>>(path: T) -> Option<ResourceType> {
    let path = path.as_ref();
    CATALOG.iter().find(|v| v.0 == path).map(|v| v.1)
}

const UNLIT_VS: &str = "
#version 100
precision lowp float;
attribute vec3 Position;
attribute vec2 Texcoord0;
uniform mat4 u_MVPMatrix;
varying vec2 v_Texcoord;
void main() {
    gl_Position = u_MVPMatrix * vec4(Position, 1.0);
    v_Texcoord = Texcoord0;
}
";

const UNLIT_FS: &str = "
#version 100
precision lowp float;
uniform sampler2D u_MainTex;
uniform vec4 u_Color;
varying vec2 v_Texcoord;
void main() {
    gl_FragColor = texture2D(u_MainTex, v_Texcoord) * u_Color;
}
";

fn unlit() -> ShaderParams {
    let mut params = ShaderParams::default();
    params.attributes.push((Attribute::Position, 3));
    params.attributes.push((Attribute::Texcoord0, 2));
    params
        .uniforms
        .push(("u_MVPMatrix".into(), UniformVariableType::Matrix4f));
    params
        .uniforms
        .push(("u_MainTex".into(), UniformVariableType::Texture));
    params
        .uniforms
        .push(("u_Color".into(), UniformVariableType::Vector4f));
    params
}

fn default_material() -> Result<MaterialResource> {
    let mut textures = FastHashMap::default();
    textures.insert("u_MainTex".into(), FixedPath::new(WHITE)?);

    let mut colors = FastHashMap::default();
    colors.insert("u_Color".into(), [1.0, 1.0, 1.0, 1.0]);

    Ok(MaterialResource {
        shader: FixedPath::new(UNLIT)?,
        textures,
        colors,
        scalars: FastHashMap::default(),
    })
}

/// Generates the content of builtin resources. Load params are honored where
/// they make sense: textures take the sampling hints and the sphere takes
/// `subdivisions` (2 by default).
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinLoader;

impl Loader for BuiltinLoader {
    fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
        let texture = |(mut params, bytes): (TextureParams, Vec<u8>)| {
            params.apply(ctx.params);
            TextureLoader::upload(ctx, params, &bytes)
        };

        let mesh = |(params, data): (MeshParams, MeshData)| MeshLoader::upload(ctx, params, &data);

        match ctx.path.as_str() {
            WHITE => texture(texture_builder::white()),
            BLACK => texture(texture_builder::black()),
            NORMAL => texture(texture_builder::normal()),
            CHECKERBOARD => texture(texture_builder::checkerboard()),
            QUAD => mesh(mesh_builder::quad()),
            CUBE => mesh(mesh_builder::cube()),
            SPHERE => {
                let n = ctx.params.get_parsed("subdivisions").unwrap_or(2);
                if n > MAX_SPHERE_SUBDIVISIONS {
                    warn!(
                        "[BuiltinLoader] clamps sphere subdivisions {} to {}.",
                        n, MAX_SPHERE_SUBDIVISIONS
                    );
                }

                mesh(mesh_builder::sphere(n.min(MAX_SPHERE_SUBDIVISIONS)))
            }
            UNLIT => ShaderLoader::upload(ctx, unlit(), UNLIT_VS, UNLIT_FS),
            DEFAULT_MATERIAL => Ok(ResourceData::Material(default_material()?)),
            v => Err(Error::NotFound(v.to_owned())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn catalog() {
        assert!(is_builtin(WHITE));
        assert!(!is_builtin("textures/white"));
        assert_eq!(find(CUBE), Some(ResourceType::Mesh));
        assert_eq!(find(DEFAULT_MATERIAL), Some(ResourceType::Material));
        assert_eq!(find("builtin:meshes/torus"), None);

        for &(path, _) in CATALOG.iter() {
            assert!(is_builtin(path));
            assert!(FixedPath::new(path).is_ok());
        }
    }

    #[test]
    fn unlit_shader() {
        assert!(unlit().validate(UNLIT_VS, UNLIT_FS).is_ok());
        let material = default_material().unwrap();
        assert_eq!(material.shader, UNLIT);
        assert_eq!(material.texture("u_MainTex").unwrap(), WHITE);
    }
}
