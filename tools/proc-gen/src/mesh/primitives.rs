//! Procedural mesh primitives
//!
//! All primitives are centered on the origin with +Y up. Invalid dimensions
//! are clamped with a warning rather than rejected.

use glam::Vec3;
use std::f32::consts::PI;
use tracing::warn;

use super::types::MeshBuilder;

/// Generate a cylinder or cone mesh
///
/// # Arguments
/// * `radius_bottom` - Bottom radius (>= 0.0)
/// * `radius_top` - Top radius (>= 0.0)
/// * `height` - Cylinder height
/// * `segments` - Number of radial divisions (min 3, max 256)
///
/// # Returns
/// Mesh with body and caps (if radii > 0)
pub fn generate_cylinder<M: MeshBuilder>(
    radius_bottom: f32,
    radius_top: f32,
    height: f32,
    segments: u32,
) -> M {
    let radius_bottom = if radius_bottom < 0.0 {
        warn!("generate_cylinder: radius_bottom must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius_bottom
    };

    let radius_top = if radius_top < 0.0 {
        warn!("generate_cylinder: radius_top must be >= 0.0, clamping to 0.0");
        0.0
    } else {
        radius_top
    };

    let height = if height <= 0.0 {
        warn!("generate_cylinder: height must be > 0.0, clamping to 0.001");
        0.001
    } else {
        height
    };

    let segments = segments.clamp(3, 256);

    let mut mesh = M::default();
    let half_height = height * 0.5;
    let ring_point = |radius: f32, i: u32, y: f32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    };

    // Body: one bottom/top vertex pair per segment
    let mut body_indices = Vec::with_capacity((segments * 2) as usize);
    let slope = Vec3::new(0.0, radius_bottom - radius_top, 0.0);
    for i in 0..segments {
        let bottom_pos = ring_point(radius_bottom, i, -half_height);
        let top_pos = ring_point(radius_top, i, half_height);

        // Cone normals tilt with the slope
        let outward = ring_point(1.0, i, 0.0);
        let normal = (outward + slope.normalize_or_zero()).normalize();

        body_indices.push(mesh.add_vertex(bottom_pos, normal));
        body_indices.push(mesh.add_vertex(top_pos, normal));
    }

    for i in 0..segments {
        let next_i = (i + 1) % segments;

        let i0 = body_indices[(i * 2) as usize];
        let i1 = body_indices[(i * 2 + 1) as usize];
        let i2 = body_indices[(next_i * 2) as usize];
        let i3 = body_indices[(next_i * 2 + 1) as usize];

        // i0=bottom, i1=top (seg i), i2=bottom, i3=top (seg i+1)
        if radius_top > 0.0 {
            mesh.add_triangle(i0, i1, i3);
        }
        if radius_bottom > 0.0 {
            mesh.add_triangle(i0, i3, i2);
        }
    }

    if radius_bottom > 0.0 {
        let down = Vec3::NEG_Y;
        let center = mesh.add_vertex(Vec3::new(0.0, -half_height, 0.0), down);
        let ring: Vec<u32> = (0..segments)
            .map(|i| mesh.add_vertex(ring_point(radius_bottom, i, -half_height), down))
            .collect();
        for i in 0..segments as usize {
            mesh.add_triangle(center, ring[i], ring[(i + 1) % ring.len()]);
        }
    }

    if radius_top > 0.0 {
        let up = Vec3::Y;
        let center = mesh.add_vertex(Vec3::new(0.0, half_height, 0.0), up);
        let ring: Vec<u32> = (0..segments)
            .map(|i| mesh.add_vertex(ring_point(radius_top, i, half_height), up))
            .collect();
        for i in 0..segments as usize {
            mesh.add_triangle(center, ring[(i + 1) % ring.len()], ring[i]);
        }
    }

    mesh
}

/// Generate a cone pointing up (+Y)
pub fn generate_cone<M: MeshBuilder>(radius: f32, height: f32, segments: u32) -> M {
    generate_cylinder(radius, 0.0, height, segments)
}

/// Generate a UV-sphere with shared pole and seam vertices
///
/// Every position appears exactly once, so displacing vertices never opens
/// cracks in the surface.
///
/// # Arguments
/// * `radius` - Sphere radius (> 0.0)
/// * `segments` - Longitudinal divisions (min 3, max 256)
/// * `rings` - Latitudinal divisions (min 2, max 128)
pub fn generate_sphere<M: MeshBuilder>(radius: f32, segments: u32, rings: u32) -> M {
    let radius = if radius <= 0.0 {
        warn!("generate_sphere: radius must be > 0.0, clamping to 0.001");
        0.001
    } else {
        radius
    };
    let segments = segments.clamp(3, 256);
    let rings = rings.clamp(2, 128);

    let mut mesh = M::default();
    let north = mesh.add_vertex(Vec3::new(0.0, radius, 0.0), Vec3::Y);

    // Interior latitude rings, top to bottom
    let mut ring_starts = Vec::with_capacity((rings - 1) as usize);
    for ring in 1..rings {
        let phi = (ring as f32 / rings as f32) * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for seg in 0..segments {
            let theta = (seg as f32 / segments as f32) * 2.0 * PI;
            let normal = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            let index = mesh.add_vertex(normal * radius, normal);
            if seg == 0 {
                ring_starts.push(index);
            }
        }
    }

    let south = mesh.add_vertex(Vec3::new(0.0, -radius, 0.0), Vec3::NEG_Y);
    let at = |start: u32, seg: u32| start + seg % segments;

    if let Some(&first) = ring_starts.first() {
        for seg in 0..segments {
            mesh.add_triangle(at(first, seg), north, at(first, seg + 1));
        }
    }

    for pair in ring_starts.windows(2) {
        let (upper, lower) = (pair[0], pair[1]);
        for seg in 0..segments {
            let i0 = at(lower, seg);
            let i1 = at(upper, seg);
            let i2 = at(lower, seg + 1);
            let i3 = at(upper, seg + 1);
            mesh.add_triangle(i0, i1, i3);
            mesh.add_triangle(i0, i3, i2);
        }
    }

    if let Some(&last) = ring_starts.last() {
        for seg in 0..segments {
            mesh.add_triangle(south, at(last, seg), at(last, seg + 1));
        }
    }

    mesh
}
