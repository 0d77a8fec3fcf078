//! Procedural mesh types

use glam::Vec3;

/// Opaque white, the color every new vertex starts with
pub(crate) const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Trait for mesh construction, so primitives stay generic over the output type
pub trait MeshBuilder: Default {
    /// Add a vertex with position and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32;

    /// Add a triangle using three vertex indices (CCW seen from outside)
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);
}

/// Vertex-colored triangle mesh in plain f32 arrays
///
/// `positions`, `normals` and `colors` are always the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnpackedMesh {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors as [r, g, b, a]
    pub colors: Vec<[u8; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl UnpackedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl MeshBuilder for UnpackedMesh {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.colors.push(DEFAULT_COLOR);
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_attributes_parallel() {
        let mut mesh = UnpackedMesh::new();
        let a = mesh.add_vertex(Vec3::ZERO, Vec3::Y);
        let b = mesh.add_vertex(Vec3::X, Vec3::Y);
        let c = mesh.add_vertex(Vec3::Z, Vec3::Y);
        mesh.add_triangle(a, c, b);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.normals.len(), 3);
        assert_eq!(mesh.colors, vec![DEFAULT_COLOR; 3]);
        assert_eq!(mesh.indices, vec![0, 2, 1]);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_bounds() {
        assert!(UnpackedMesh::new().bounds().is_none());

        let mut mesh = UnpackedMesh::new();
        mesh.add_vertex(Vec3::new(-1.0, 2.0, 0.5), Vec3::Y);
        mesh.add_vertex(Vec3::new(3.0, -4.0, 0.0), Vec3::Y);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(3.0, 2.0, 0.5));
    }
}
