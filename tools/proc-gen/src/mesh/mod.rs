//! Mesh generation and modification

mod types;

pub mod combine;
pub mod export;
pub mod modifiers;
pub mod primitives;

pub use types::{MeshBuilder, UnpackedMesh};

pub use primitives::{generate_cone, generate_cylinder, generate_sphere};

pub use export::{to_obj_string, write_obj};

// Convenience re-exports
pub use combine::{combine, combine_transformed};
pub use modifiers::{
    MeshApply, MeshModifier, MushBottom, Paint, RecomputeNormals, Transform, jitter_vertices,
};
