//! Procedural meshes of the builtin catalog. All of them are centered at the
//! origin and fit into a unit cube.

use crate::utils::prelude::FastHashMap;

use super::mesh::*;

fn build(verts: &[Vertex], idxes: &[u16]) -> (MeshParams, MeshData) {
    let mut params = MeshParams::default();
    params.num_verts = verts.len();
    params.num_idxes = idxes.len();

    let data = MeshData {
        vptr: Vertex::encode(verts),
        iptr: IndexFormat::encode(idxes),
    };

    (params, data)
}

pub fn quad() -> (MeshParams, MeshData) {
    let verts: [Vertex; 4] = [
        Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
        Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
        Vertex::new([0.5, 0.5, 0.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
        Vertex::new([-0.5, 0.5, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
    ];

    let idxes: [u16; 6] = [0, 1, 2, 0, 2, 3];
    build(&verts, &idxes)
}

pub fn cube() -> (MeshParams, MeshData) {
    let texcoords = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let points = [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
    ];

    let normals = [
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    // Four corners per face, counter-clockwise seen from outside.
    let faces: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [1, 5, 6, 2],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ];

    let mut verts = Vec::with_capacity(24);
    let mut idxes = Vec::with_capacity(36);
    for (i, face) in faces.iter().enumerate() {
        let base = verts.len() as u16;
        for (j, &p) in face.iter().enumerate() {
            verts.push(Vertex::new(points[p], normals[i], texcoords[j]));
        }

        idxes.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    build(&verts, &idxes)
}

/// An icosphere of radius 0.5. Each subdivision splits every triangle into
/// four, so the index count grows as `60 * 4^n`.
pub fn sphere(subdivisions: usize) -> (MeshParams, MeshData) {
    use std::f32::consts::FRAC_1_PI;

    fn normalize(v: [f32; 3]) -> Vertex {
        let l = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        let n = [v[0] / l, v[1] / l, v[2] / l];
        let uv = [n[0].asin() * FRAC_1_PI + 0.5, n[1].asin() * FRAC_1_PI + 0.5];

        Vertex::new([n[0] * 0.5, n[1] * 0.5, n[2] * 0.5], n, uv)
    }

    let t = (1.0f32 + 5.0f32.sqrt()) / 2.0f32;
    let mut verts = vec![
        normalize([-1.0, t, 0.0]),
        normalize([1.0, t, 0.0]),
        normalize([-1.0, -t, 0.0]),
        normalize([1.0, -t, 0.0]),
        normalize([0.0, -1.0, t]),
        normalize([0.0, 1.0, t]),
        normalize([0.0, -1.0, -t]),
        normalize([0.0, 1.0, -t]),
        normalize([t, 0.0, -1.0]),
        normalize([t, 0.0, 1.0]),
        normalize([-t, 0.0, -1.0]),
        normalize([-t, 0.0, 1.0]),
    ];

    let mut faces: Vec<[u16; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    {
        let mut cache = FastHashMap::default();
        let mut mid = |p1: u16, p2: u16| {
            let k = (p1.min(p2), p1.max(p2));
            if let Some(&v) = cache.get(&k) {
                return v;
            }

            let (a, b) = (verts[p1 as usize].normal, verts[p2 as usize].normal);
            verts.push(normalize([
                (a[0] + b[0]) * 0.5,
                (a[1] + b[1]) * 0.5,
                (a[2] + b[2]) * 0.5,
            ]));

            let v = (verts.len() - 1) as u16;
            cache.insert(k, v);
            v
        };

        let mut buf = Vec::new();
        for _ in 0..subdivisions {
            buf.clear();
            for face in &faces {
                let a = mid(face[0], face[1]);
                let b = mid(face[1], face[2]);
                let c = mid(face[2], face[0]);

                buf.push([face[0], a, c]);
                buf.push([face[1], b, a]);
                buf.push([face[2], c, b]);
                buf.push([a, b, c]);
            }

            ::std::mem::swap(&mut faces, &mut buf);
        }
    }

    let idxes: Vec<u16> = faces.iter().flat_map(|v| v.iter().cloned()).collect();
    build(&verts, &idxes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builders() {
        let (params, data) = quad();
        assert_eq!((params.num_verts, params.num_idxes), (4, 6));
        assert!(params.validate(&data).is_ok());

        let (params, data) = cube();
        assert_eq!((params.num_verts, params.num_idxes), (24, 36));
        assert!(params.validate(&data).is_ok());

        let (params, data) = sphere(0);
        assert_eq!((params.num_verts, params.num_idxes), (12, 60));
        assert!(params.validate(&data).is_ok());

        let (params, data) = sphere(2);
        assert_eq!((params.num_verts, params.num_idxes), (162, 960));
        assert!(params.validate(&data).is_ok());
    }
}
