extern crate rescache;

use std::sync::Arc;
use std::time::Duration;

use rescache::prelude::*;
use rescache::res::builtin;

fn testbed(capacity: usize) -> (Result<ResourceManager>, Arc<HeadlessBackend>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut params = ManagerParams::default();
    params.capacity = capacity;
    params.workers = 0;

    let backend = Arc::new(HeadlessBackend::new());
    let manager = ResourceManager::with(params, Arc::new(Memory::new()), backend.clone());
    (manager, backend)
}

#[test]
fn catalog_is_resident() {
    let (manager, backend) = testbed(16);
    let mut manager = manager.unwrap();
    assert_eq!(manager.shared().len(), builtin::CATALOG.len());

    manager.update(Duration::from_millis(16));
    manager.update(Duration::from_millis(16));

    for &(path, kind) in builtin::CATALOG.iter() {
        let index = manager.index_of(path).unwrap();
        assert_eq!(manager.ref_count(path), 1);
        assert_eq!(manager.status(index), Some(Status::Loaded), "{}", path);
        assert_eq!(manager.resource(index, |v| v.kind()), Some(kind));
    }

    assert_eq!(backend.textures(), 4);
    assert_eq!(backend.meshes(), 3);
    assert_eq!(backend.shaders(), 1);

    let index = manager.index_of(builtin::SPHERE).unwrap();
    let idxes = manager.resource(index, |v| v.as_mesh().unwrap().params.num_idxes);
    assert_eq!(idxes, Some(960));

    let index = manager.index_of(builtin::DEFAULT_MATERIAL).unwrap();
    let shader = manager.resource(index, |v| v.as_material().unwrap().shader);
    assert_eq!(shader, Some(FixedPath::new(builtin::UNLIT).unwrap()));

    let err = manager
        .add(ResourceType::Texture, builtin::WHITE, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DuplicatePath);
}

#[test]
fn finalize_releases_catalog() {
    let (manager, backend) = testbed(16);
    let mut manager = manager.unwrap();
    manager.update(Duration::from_millis(16));
    manager.update(Duration::from_millis(16));
    assert_eq!(backend.textures(), 4);

    manager.finalize();
    assert_eq!(manager.ref_count(builtin::WHITE), 0);
    assert_eq!(backend.textures(), 0);
    assert_eq!(backend.meshes(), 0);
    assert_eq!(backend.shaders(), 0);
}

#[test]
fn drop_releases_catalog() {
    let (manager, backend) = testbed(16);
    {
        let mut manager = manager.unwrap();
        manager.update(Duration::from_millis(16));
    }

    assert_eq!(backend.textures(), 0);
    assert_eq!(backend.meshes(), 0);
}

#[test]
fn catalog_does_not_fit() {
    let (manager, _) = testbed(builtin::CATALOG.len() - 1);
    assert_eq!(manager.err().unwrap().code(), ErrorCode::Capacity);

    let (manager, _) = testbed(builtin::CATALOG.len());
    assert!(manager.is_ok());
}

#[test]
fn user_refs_on_builtins() {
    let (manager, _) = testbed(16);
    let mut manager = manager.unwrap();

    let mut v = manager.make_ref(ResourceType::Mesh, builtin::CUBE).unwrap();
    v.request().unwrap();
    assert_eq!(manager.ref_count(builtin::CUBE), 2);

    let mut w = manager.make_ref(ResourceType::Texture, builtin::CUBE).unwrap();
    assert_eq!(w.request().unwrap_err().code(), ErrorCode::UnknownResource);

    manager.finalize();
    assert_eq!(manager.ref_count(builtin::CUBE), 1);
}

#[test]
fn custom_builtins() {
    struct Red;

    impl Loader for Red {
        fn load(&self, ctx: &LoadContext) -> Result<ResourceData> {
            let mut params = TextureParams::default();
            params.dimensions = (1, 1);
            TextureLoader::upload(ctx, params, &[255, 0, 0, 255])
        }
    }

    let (manager, backend) = testbed(16);
    let mut manager = manager.unwrap();
    assert!(manager
        .add(ResourceType::Texture, "builtin:textures/red", None)
        .is_err());

    manager
        .shared()
        .register_loader(ResourceType::Texture, Origin::Builtin, Arc::new(Red));
    manager
        .add(ResourceType::Texture, "builtin:textures/red", None)
        .unwrap();

    let mut v = manager
        .make_ref(ResourceType::Texture, "builtin:textures/red")
        .unwrap();
    v.request().unwrap();
    manager.update(Duration::from_millis(16));
    manager.update(Duration::from_millis(16));

    let index = v.index().unwrap();
    let dimensions = manager.resource(index, |v| v.as_texture().unwrap().params.dimensions);
    assert_eq!(dimensions, Some((1, 1)));
    assert!(backend.textures() >= 1);
}
