//! Mesh modifiers for procedural geometry
//!
//! # Fluent API
//!
//! Use the `MeshApply` extension trait for method chaining:
//! ```no_run
//! use proc_gen::mesh::*;
//! use diorama_core::Color;
//!
//! let mut mesh: UnpackedMesh = generate_cone(1.4, 2.0, 5);
//! mesh.apply(Transform::rotate_y(0.5))
//!     .apply(Transform::translate(0.0, 3.2, 0.0))
//!     .apply(Paint(Color(0x008022)))
//!     .apply(RecomputeNormals);
//! ```

use std::collections::HashMap;

use diorama_core::{Color, RandomEngine};
use glam::{Mat4, Vec3};

use super::types::UnpackedMesh;

/// Trait for mesh modifiers
///
/// Implement this trait to create custom mesh modifiers that can be applied
/// to `UnpackedMesh` instances.
pub trait MeshModifier {
    /// Apply this modifier to a mesh, modifying it in place
    fn apply(&self, mesh: &mut UnpackedMesh);
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for UnpackedMesh {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Transform mesh vertices and normals using a 4x4 matrix
///
/// Normals are transformed using the inverse-transpose to handle non-uniform
/// scaling correctly. Rotations take radians.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_translation(Vec3::new(x, y, z)),
        }
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            matrix: Mat4::from_scale(Vec3::new(x, y, z)),
        }
    }

    pub fn scale_uniform(s: f32) -> Self {
        Self::scale(s, s, s)
    }

    pub fn rotate_x(radians: f32) -> Self {
        Self {
            matrix: Mat4::from_rotation_x(radians),
        }
    }

    pub fn rotate_y(radians: f32) -> Self {
        Self {
            matrix: Mat4::from_rotation_y(radians),
        }
    }

    pub fn rotate_z(radians: f32) -> Self {
        Self {
            matrix: Mat4::from_rotation_z(radians),
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// `other` applied after `self`
    pub fn then(self, other: Transform) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }
}

impl MeshModifier for Transform {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let normal_matrix = self.matrix.inverse().transpose();

        for pos in &mut mesh.positions {
            *pos = self.matrix.transform_point3(Vec3::from(*pos)).to_array();
        }

        // Degenerate scales leave zero normals; RecomputeNormals repairs them
        for norm in &mut mesh.normals {
            *norm = normal_matrix
                .transform_vector3(Vec3::from(*norm))
                .normalize_or_zero()
                .to_array();
        }
    }
}

/// Set every vertex to one color
#[derive(Debug, Clone, Copy)]
pub struct Paint(pub Color);

impl MeshModifier for Paint {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let rgba = self.0.to_rgba8();
        mesh.colors.clear();
        mesh.colors.resize(mesh.positions.len(), rgba);
    }
}

/// Flatten everything below `y` onto that plane
#[derive(Debug, Clone, Copy)]
pub struct MushBottom {
    pub y: f32,
}

impl MeshModifier for MushBottom {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        for pos in &mut mesh.positions {
            pos[1] = pos[1].max(self.y);
        }
    }
}

/// Area-weighted smooth normals per vertex
///
/// Vertices are not welded, so edges built from split vertices (cylinder caps)
/// stay hard.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecomputeNormals;

impl MeshModifier for RecomputeNormals {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let mut accumulated = vec![Vec3::ZERO; mesh.positions.len()];

        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.positions[i as usize]));
            // Cross product length is twice the triangle area
            let face = (b - a).cross(c - a);
            for &i in tri {
                accumulated[i as usize] += face;
            }
        }

        mesh.normals = accumulated
            .into_iter()
            .map(|n| n.normalize_or(Vec3::Y).to_array())
            .collect();
    }
}

/// Displace every vertex by up to `max_distance` on each axis
///
/// Coincident vertices move together, so split seams stay closed. Draws three
/// uniform values per distinct position, in first-seen order.
pub fn jitter_vertices(mesh: &mut UnpackedMesh, max_distance: f32, rng: &mut RandomEngine) {
    let max = f64::from(max_distance);
    let mut offsets: HashMap<[u32; 3], [f32; 3]> = HashMap::new();

    for pos in &mut mesh.positions {
        let key = pos.map(f32::to_bits);
        let offset = *offsets.entry(key).or_insert_with(|| {
            [
                rng.uniform(-max, max) as f32,
                rng.uniform(-max, max) as f32,
                rng.uniform(-max, max) as f32,
            ]
        });
        for (p, o) in pos.iter_mut().zip(offset) {
            *p += o;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{generate_cylinder, generate_sphere};

    #[test]
    fn test_transform_translate() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 5, 4);
        Transform::translate(0.0, 4.5, 0.0).apply(&mut mesh);
        let (min, max) = mesh.bounds().unwrap();
        assert!((min.y - 3.5).abs() < 1e-5);
        assert!((max.y - 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_transform_rotate_radians() {
        let mut mesh = UnpackedMesh::new();
        mesh.positions.push([1.0, 0.0, 0.0]);
        mesh.normals.push([1.0, 0.0, 0.0]);
        mesh.colors.push([255; 4]);

        Transform::rotate_z(std::f32::consts::FRAC_PI_2).apply(&mut mesh);
        let p = Vec3::from(mesh.positions[0]);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6), "{p}");
        assert!(Vec3::from(mesh.normals[0]).abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_transform_then_order() {
        let combined = Transform::translate(1.0, 0.0, 0.0).then(Transform::scale_uniform(2.0));
        let p = combined.matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_scale_keeps_normals_unit_length() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 6, 4);
        mesh.apply(Transform::scale(2.0, 0.3, 1.0));
        for n in &mesh.normals {
            assert!((Vec3::from(*n).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_paint() {
        let mut mesh: UnpackedMesh = generate_cylinder(0.2, 0.2, 1.0, 5);
        mesh.apply(Paint(Color(0x604011)));
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        assert!(mesh.colors.iter().all(|c| *c == [0x60, 0x40, 0x11, 255]));
    }

    #[test]
    fn test_mush_bottom() {
        let mut mesh: UnpackedMesh = generate_sphere(1.5, 7, 8);
        mesh.apply(MushBottom { y: -0.3 });
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min.y, -0.3);
        assert!((max.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_recompute_normals_point_outward() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 8, 6);
        mesh.normals.iter_mut().for_each(|n| *n = [0.0; 3]);
        mesh.apply(RecomputeNormals);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let (p, n) = (Vec3::from(*p), Vec3::from(*n));
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(p.dot(n) > 0.8, "normal {n} not outward at {p}");
        }
    }

    #[test]
    fn test_jitter_bounded_and_seam_safe() {
        let original: UnpackedMesh = generate_cylinder(0.5, 0.5, 1.0, 6);
        let mut mesh = original.clone();
        jitter_vertices(&mut mesh, 0.1, &mut RandomEngine::new(5u64));

        for (before, after) in original.positions.iter().zip(&mesh.positions) {
            for axis in 0..3 {
                assert!((after[axis] - before[axis]).abs() <= 0.1 + 1e-6);
            }
        }

        // Vertices that started together end together
        for i in 0..original.vertex_count() {
            for j in (i + 1)..original.vertex_count() {
                if original.positions[i] == original.positions[j] {
                    assert_eq!(mesh.positions[i], mesh.positions[j]);
                }
            }
        }
    }

    #[test]
    fn test_jitter_deterministic() {
        let base: UnpackedMesh = generate_sphere(1.0, 5, 4);
        let mut a = base.clone();
        let mut b = base.clone();
        jitter_vertices(&mut a, 0.2, &mut RandomEngine::new("jitter"));
        jitter_vertices(&mut b, 0.2, &mut RandomEngine::new("jitter"));
        assert_eq!(a, b);
        assert_ne!(a, base);
    }
}
