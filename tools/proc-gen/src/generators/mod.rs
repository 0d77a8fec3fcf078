//! Built-in prop generators
//!
//! Every generator is a [`MeshGenerator`] over [`UnpackedMesh`]. Schemas carry
//! a `seed` slot so each artifact can be rebuilt from its provenance.

mod clouds;
mod ground;
mod terrain;
mod trees;

pub use clouds::cumulus_cloud;
pub use ground::{flower_bunch, rock, stalk_clump, stick};
pub use terrain::ground_plane;
pub use trees::{conifer, dead_tree, lollipop_tree, tree_stump};

use diorama_core::math::RADIANS_FOR_360_DEGREES;
use diorama_core::{GenerationError, MeshGenerator, RandomEngine, ResolvedParams};
use glam::Vec3;

use crate::mesh::{MeshApply, RecomputeNormals, Transform, UnpackedMesh, combine};

/// Generator producing vertex-colored meshes
pub type PropGenerator = MeshGenerator<UnpackedMesh>;

/// Every built-in generator, trees first
pub fn catalogue() -> Vec<PropGenerator> {
    vec![
        conifer(),
        dead_tree(),
        tree_stump(),
        lollipop_tree(),
        cumulus_cloud(),
        flower_bunch(),
        stalk_clump(),
        stick(),
        rock(),
        ground_plane(),
    ]
}

/// A float param that must be strictly positive
pub(crate) fn positive(params: &ResolvedParams, name: &str) -> Result<f32, GenerationError> {
    let value = params.float(name)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(GenerationError::Degenerate {
            reason: format!("`{name}` must be > 0 (got {value})"),
        })
    }
}

/// Upper bound on repeated parts (sprouts, branches, segments) in one prop
pub(crate) const MAX_PARTS: usize = 256;

/// A count param no larger than `max`
pub(crate) fn bounded_count(params: &ResolvedParams, name: &str, max: usize) -> Result<usize, GenerationError> {
    let count = params.count(name)?;
    if count <= max {
        Ok(count)
    } else {
        Err(GenerationError::Degenerate {
            reason: format!("`{name}` must be at most {max} (got {count})"),
        })
    }
}

/// A `[min, max]` param drawn from once
pub(crate) fn draw(params: &ResolvedParams, name: &str, rng: &mut RandomEngine) -> Result<f32, GenerationError> {
    Ok(rng.uniform_from(params.range(name)?) as f32)
}

/// Merge finished parts into one mesh
pub(crate) fn merge(parts: &[UnpackedMesh]) -> UnpackedMesh {
    let refs: Vec<&UnpackedMesh> = parts.iter().collect();
    combine(&refs)
}

/// Smooth normals over the final shape
pub(crate) fn finalize(mut mesh: UnpackedMesh) -> UnpackedMesh {
    mesh.apply(RecomputeNormals);
    mesh
}

/// Layout of a clump of small sprouts
pub(crate) struct Clump {
    pub count: usize,
    /// Distance between consecutive sprouts
    pub separation: [f64; 2],
    /// Lean away from vertical, radians
    pub tilt: [f64; 2],
}

/// Spawn `count` sprouts, each stepping a random distance from the last
///
/// Per sprout draw order: whatever `spawn` draws, then step distance and
/// angle, then tilt, then facing.
pub(crate) fn sprout_clump(
    clump: &Clump,
    rng: &mut RandomEngine,
    mut spawn: impl FnMut(usize, &mut RandomEngine) -> Result<UnpackedMesh, GenerationError>,
) -> Result<UnpackedMesh, GenerationError> {
    let mut sprouts = Vec::new();
    let mut base = Vec3::ZERO;

    for i in 0..clump.count {
        let mut sprout = spawn(i, rng)?;
        let step = rng.random_distance_vector(clump.separation[0], clump.separation[1]);
        base += Vec3::new(step.x as f32, 0.0, step.y as f32);

        sprout
            .apply(Transform::rotate_x(rng.uniform_from(clump.tilt) as f32))
            .apply(Transform::rotate_y(rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32))
            .apply(Transform::translate(base.x, 0.0, base.z));
        sprouts.push(sprout);
    }

    Ok(merge(&sprouts))
}
