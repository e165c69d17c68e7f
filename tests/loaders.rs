extern crate rescache;

use std::sync::Arc;
use std::time::Duration;

use rescache::prelude::*;
use rescache::res::assets::{mesh_builder, texture_builder};

struct Testbed {
    manager: ResourceManager,
    memory: Arc<Memory>,
    backend: Arc<HeadlessBackend>,
}

impl Testbed {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut params = ManagerParams::default();
        params.workers = 0;
        params.builtins = false;
        params.notify = NotifyPolicy::Settled;

        let memory = Arc::new(Memory::new());
        let backend = Arc::new(HeadlessBackend::new());
        let manager = ResourceManager::with(params, memory.clone(), backend.clone()).unwrap();

        Testbed {
            manager,
            memory,
            backend,
        }
    }

    /// Registers and loads `bytes` as `path`, returning the slot index and
    /// the ref which keeps it resident.
    fn load(
        &mut self,
        kind: ResourceType,
        path: &str,
        bytes: Vec<u8>,
        params: Option<LoadParams>,
    ) -> (usize, Ref) {
        self.memory.insert(path, bytes);
        self.manager.add(kind, path, params).unwrap();

        let mut v = self.manager.make_ref(kind, path).unwrap();
        v.request().unwrap();
        for _ in 0..2 {
            self.manager.update(Duration::from_millis(16));
        }

        (v.index().unwrap(), v)
    }

    fn code(&self, index: usize) -> ErrorCode {
        self.manager.err_code(index).unwrap()
    }
}

#[test]
fn file() {
    let mut testbed = Testbed::new();
    let (index, _v) = testbed.load(ResourceType::File, "raw.bin", vec![9; 1024], None);

    let len = testbed.manager.resource(index, |v| v.as_file().unwrap().len());
    assert_eq!(len, Some(1024));
}

#[test]
fn texture() {
    let mut testbed = Testbed::new();
    let (params, bytes) = texture_builder::checkerboard();
    let file = TextureLoader::encode(&params, &bytes).unwrap();

    let hints = LoadParams::new().with("filter", "linear").with("mipmap", "yes");
    let (index, _v) = testbed.load(ResourceType::Texture, "checker.vtex", file, Some(hints));

    let loaded = testbed
        .manager
        .resource(index, |v| v.as_texture().unwrap().params)
        .unwrap();

    assert_eq!(loaded.dimensions, (64, 64));
    assert_eq!(loaded.filter, TextureFilter::Linear);
    assert!(loaded.mipmap);
    assert_eq!(testbed.backend.textures(), 1);
}

#[test]
fn texture_size_mismatch() {
    let mut testbed = Testbed::new();
    let (mut params, bytes) = texture_builder::white();
    params.dimensions = (4, 4);
    let file = TextureLoader::encode(&params, &bytes).unwrap();

    let (index, _v) = testbed.load(ResourceType::Texture, "white.vtex", file, None);
    assert_eq!(testbed.manager.status(index), Some(Status::Error));
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
    assert_eq!(testbed.backend.textures(), 0);
}

#[test]
fn texture_dimensions_overflow() {
    let mut testbed = Testbed::new();
    let (mut params, bytes) = texture_builder::white();
    params.dimensions = (::std::u32::MAX, ::std::u32::MAX);
    let file = TextureLoader::encode(&params, &bytes).unwrap();

    let (index, _v) = testbed.load(ResourceType::Texture, "huge.vtex", file, None);
    assert_eq!(testbed.manager.status(index), Some(Status::Error));
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
    assert_eq!(testbed.backend.textures(), 0);
}

#[test]
fn bad_magic() {
    let mut testbed = Testbed::new();
    let (params, bytes) = texture_builder::white();
    let mut file = TextureLoader::encode(&params, &bytes).unwrap();
    file[0] = b'X';

    let (index, _v) = testbed.load(ResourceType::Texture, "white.vtex", file, None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);

    let (index, _w) = testbed.load(ResourceType::Mesh, "short.vmsh", b"VMSH".to_vec(), None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
}

#[test]
fn truncated() {
    let mut testbed = Testbed::new();
    let (params, data) = mesh_builder::cube();
    let mut file = MeshLoader::encode(&params, &data).unwrap();
    let len = file.len();
    file.truncate(len - 10);

    let (index, _v) = testbed.load(ResourceType::Mesh, "cube.vmsh", file, None);
    assert_eq!(testbed.manager.status(index), Some(Status::Error));
    assert_eq!(testbed.code(index), ErrorCode::LoadingError);
}

#[test]
fn mesh() {
    let mut testbed = Testbed::new();
    let (params, data) = mesh_builder::sphere(1);
    let file = MeshLoader::encode(&params, &data).unwrap();

    let (index, _v) = testbed.load(ResourceType::Mesh, "sphere.vmsh", file, None);
    let loaded = testbed
        .manager
        .resource(index, |v| v.as_mesh().unwrap().params)
        .unwrap();

    assert_eq!(loaded.num_verts, 42);
    assert_eq!(loaded.num_idxes, 240);
    assert_eq!(loaded.primitive, MeshPrimitive::Triangles);
    assert_eq!(testbed.backend.meshes(), 1);
}

#[test]
fn mesh_index_out_of_range() {
    let mut testbed = Testbed::new();
    let (mut params, data) = mesh_builder::quad();
    params.num_verts = 2;
    let data = MeshData {
        vptr: data.vptr[..2 * Vertex::STRIDE].to_vec(),
        iptr: data.iptr,
    };

    let file = MeshLoader::encode(&params, &data).unwrap();
    let (index, _v) = testbed.load(ResourceType::Mesh, "quad.vmsh", file, None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
}

#[test]
fn mesh_vertices_overflow() {
    let mut testbed = Testbed::new();
    let (mut params, data) = mesh_builder::quad();
    params.num_verts = ::std::usize::MAX;
    let file = MeshLoader::encode(&params, &data).unwrap();

    let (index, _v) = testbed.load(ResourceType::Mesh, "huge.vmsh", file, None);
    assert_eq!(testbed.manager.status(index), Some(Status::Error));
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
    assert_eq!(testbed.backend.meshes(), 0);
}

#[test]
fn shader() {
    let mut testbed = Testbed::new();
    let mut params = ShaderParams::default();
    params.attributes.push((Attribute::Position, 3));
    params
        .uniforms
        .push(("u_Color".into(), UniformVariableType::Vector4f));

    let file = ShaderLoader::encode(&params, "void main() {}", "void main() {}").unwrap();
    let (index, _v) = testbed.load(ResourceType::Shader, "color.vshd", file, None);
    let loaded = testbed
        .manager
        .resource(index, |v| v.as_shader().unwrap().params.clone())
        .unwrap();

    assert_eq!(loaded, params);
    assert_eq!(testbed.backend.shaders(), 1);

    let file = ShaderLoader::encode(&params, "void main() {}", "").unwrap();
    let (index, _w) = testbed.load(ResourceType::Shader, "broken.vshd", file, None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
    assert_eq!(testbed.backend.shaders(), 1);
}

#[test]
fn material() {
    let mut testbed = Testbed::new();
    let json = r#"{
        "shader": "builtin:shaders/unlit",
        "textures": { "u_MainTex": "textures/crate.vtex" },
        "scalars": { "u_Alpha": 0.5 }
    }"#;

    let (index, _v) = testbed.load(ResourceType::Material, "crate.mat", json.into(), None);
    let (shader, texture, alpha) = testbed
        .manager
        .resource(index, |v| {
            let m = v.as_material().unwrap();
            (
                m.shader,
                *m.texture("u_MainTex").unwrap(),
                m.scalars["u_Alpha"],
            )
        })
        .unwrap();

    assert_eq!(shader, "builtin:shaders/unlit");
    assert_eq!(texture, "textures/crate.vtex");
    assert_eq!(alpha, 0.5);
}

#[test]
fn material_garbled() {
    let mut testbed = Testbed::new();
    let (index, _v) = testbed.load(ResourceType::Material, "a.mat", b"{ shader".to_vec(), None);
    assert_eq!(testbed.code(index), ErrorCode::LoadingError);

    let (index, _w) = testbed.load(ResourceType::Material, "b.mat", b"{}".to_vec(), None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
}

#[test]
fn kind_mismatch() {
    let mut testbed = Testbed::new();
    let (params, bytes) = texture_builder::white();
    let file = TextureLoader::encode(&params, &bytes).unwrap();

    // A texture file registered as a mesh is decoded by the mesh loader.
    let (index, _v) = testbed.load(ResourceType::Mesh, "white.vtex", file, None);
    assert_eq!(testbed.code(index), ErrorCode::BadFormat);
}

#[test]
fn custom_loader() {
    struct Upper;

    impl Loader for Upper {
        fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
            let bytes = ctx.read()?.to_ascii_uppercase();
            Ok(ResourceData::File(FileResource { bytes }))
        }
    }

    let mut testbed = Testbed::new();
    testbed
        .manager
        .shared()
        .register_loader(ResourceType::File, Origin::File, Arc::new(Upper));

    let (index, _v) = testbed.load(ResourceType::File, "a.txt", b"abc".to_vec(), None);
    let bytes = testbed
        .manager
        .resource(index, |v| v.as_file().unwrap().bytes.clone());
    assert_eq!(bytes, Some(b"ABC".to_vec()));
}
