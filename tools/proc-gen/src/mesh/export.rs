//! Wavefront OBJ export with per-vertex colors
//!
//! Colors use the common `v x y z r g b` extension (channels in `0..=1`),
//! which Blender and MeshLab both read.

use std::path::Path;

use super::types::UnpackedMesh;

/// Render a mesh as OBJ text
pub fn to_obj_string(mesh: &UnpackedMesh, name: &str) -> String {
    let mut out = String::with_capacity(mesh.vertex_count() * 64 + mesh.indices.len() * 8);
    out.push_str(&format!(
        "# {} vertices, {} triangles\no {}\n",
        mesh.vertex_count(),
        mesh.triangle_count(),
        name
    ));

    for (i, p) in mesh.positions.iter().enumerate() {
        let [r, g, b, _] = mesh.colors.get(i).copied().unwrap_or([255; 4]);
        out.push_str(&format!(
            "v {:.6} {:.6} {:.6} {:.4} {:.4} {:.4}\n",
            p[0],
            p[1],
            p[2],
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0
        ));
    }

    for n in &mesh.normals {
        out.push_str(&format!("vn {:.6} {:.6} {:.6}\n", n[0], n[1], n[2]));
    }

    // OBJ indices are 1-based
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        out.push_str(&format!("f {a}//{a} {b}//{b} {c}//{c}\n"));
    }

    out
}

/// Write a mesh to an OBJ file
pub fn write_obj(mesh: &UnpackedMesh, path: &Path, name: &str) -> std::io::Result<()> {
    std::fs::write(path, to_obj_string(mesh, name))
}
