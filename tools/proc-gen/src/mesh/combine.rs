//! Mesh combining utilities
//!
//! Functions for merging multiple meshes into a single mesh.

use glam::Mat4;

use super::modifiers::{MeshModifier, Transform};
use super::types::UnpackedMesh;

/// Combine multiple meshes into one
///
/// Concatenates vertex attributes and offsets each mesh's indices.
///
/// # Example
/// ```no_run
/// use proc_gen::mesh::*;
///
/// let trunk: UnpackedMesh = generate_cylinder(0.3, 0.3, 3.0, 5);
/// let crown: UnpackedMesh = generate_sphere(2.5, 5, 4);
///
/// let combined = combine(&[&trunk, &crown]);
/// ```
pub fn combine(meshes: &[&UnpackedMesh]) -> UnpackedMesh {
    let mut result = UnpackedMesh::new();

    let total_vertices: usize = meshes.iter().map(|m| m.positions.len()).sum();
    let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();
    result.positions.reserve(total_vertices);
    result.normals.reserve(total_vertices);
    result.colors.reserve(total_vertices);
    result.indices.reserve(total_indices);

    for mesh in meshes {
        if mesh.positions.is_empty() {
            continue;
        }

        let vertex_offset = result.positions.len() as u32;

        result.positions.extend_from_slice(&mesh.positions);
        result.normals.extend_from_slice(&mesh.normals);
        result.colors.extend_from_slice(&mesh.colors);
        result
            .indices
            .extend(mesh.indices.iter().map(|&idx| vertex_offset + idx));
    }

    result
}

/// Combine multiple meshes with per-mesh transforms
///
/// Applies a transformation matrix to each mesh before combining them.
pub fn combine_transformed(meshes: &[(&UnpackedMesh, Mat4)]) -> UnpackedMesh {
    let transformed_meshes: Vec<UnpackedMesh> = meshes
        .iter()
        .map(|(mesh, matrix)| {
            let mut transformed = (*mesh).clone();
            Transform::from_matrix(*matrix).apply(&mut transformed);
            transformed
        })
        .collect();

    let mesh_refs: Vec<&UnpackedMesh> = transformed_meshes.iter().collect();
    combine(&mesh_refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshApply, Paint, generate_cone, generate_cylinder, generate_sphere};
    use diorama_core::Color;

    #[test]
    fn test_combine_empty() {
        let result = combine(&[]);
        assert!(result.is_empty());
        assert!(result.indices.is_empty());
    }

    #[test]
    fn test_combine_index_offset() {
        let mesh1: UnpackedMesh = generate_cylinder(1.0, 1.0, 1.0, 5);
        let mesh2: UnpackedMesh = generate_sphere(0.5, 5, 4);

        let combined = combine(&[&mesh1, &mesh2]);

        assert_eq!(
            combined.vertex_count(),
            mesh1.vertex_count() + mesh2.vertex_count()
        );
        assert_eq!(
            combined.indices.len(),
            mesh1.indices.len() + mesh2.indices.len()
        );
        for &idx in &combined.indices {
            assert!((idx as usize) < combined.vertex_count());
        }
        // Second mesh's first triangle is shifted past the first mesh
        let offset = mesh1.vertex_count() as u32;
        assert_eq!(combined.indices[mesh1.indices.len()], mesh2.indices[0] + offset);
    }

    #[test]
    fn test_combine_keeps_colors() {
        let mut leaves: UnpackedMesh = generate_cone(1.0, 2.0, 5);
        leaves.apply(Paint(Color(0x008022)));
        let mut trunk: UnpackedMesh = generate_cylinder(0.2, 0.2, 2.0, 5);
        trunk.apply(Paint(Color(0x604011)));

        let combined = combine(&[&leaves, &trunk]);
        assert_eq!(combined.colors.len(), combined.vertex_count());
        assert_eq!(combined.colors[0], [0x00, 0x80, 0x22, 255]);
        assert_eq!(combined.colors[combined.vertex_count() - 1], [0x60, 0x40, 0x11, 255]);
    }

    #[test]
    fn test_combine_transformed() {
        let mesh: UnpackedMesh = generate_sphere(1.0, 5, 4);

        let combined = combine_transformed(&[
            (&mesh, Mat4::from_translation([3.0, 0.0, 0.0].into())),
            (&mesh, Mat4::from_translation([-3.0, 0.0, 0.0].into())),
        ]);

        assert_eq!(combined.vertex_count(), mesh.vertex_count() * 2);
        let (mesh_min, mesh_max) = mesh.bounds().unwrap();
        let (min, max) = combined.bounds().unwrap();
        assert!((min.x - (mesh_min.x - 3.0)).abs() < 1e-5);
        assert!((max.x - (mesh_max.x + 3.0)).abs() < 1e-5);
    }
}
