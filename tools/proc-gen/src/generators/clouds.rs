//! Puffy clouds built from a row of squashed spheres

use diorama_core::{GenerationError, MeshGenerator, ParamSpec, RandomEngine, ResolvedParams, Schema};

use super::{PropGenerator, draw, finalize, merge, positive};
use crate::mesh::{MeshApply, MushBottom, Paint, Transform, UnpackedMesh, generate_sphere, jitter_vertices};

pub fn cumulus_cloud() -> PropGenerator {
    MeshGenerator::new(
        "cumulus_cloud",
        Schema::new()
            .with("tuft_radii", ParamSpec::fixed(vec![1.5, 1.5, 2.0]))
            .with("tuft_offsets", ParamSpec::fixed(vec![-2.0, 2.0, 0.0]))
            .with("offset_scale", ParamSpec::fixed_range(0.75, 1.0))
            .with("y_variation", ParamSpec::fixed_range(-0.25, 0.1))
            .with("z_variation", ParamSpec::fixed_range(-0.125, 0.125))
            .with("bottom_mush", ParamSpec::fixed_range(-0.55, -0.1))
            .with("jitter", ParamSpec::fixed(0.2))
            .with("scale", ParamSpec::range(0.7, 1.0))
            .with("color", ParamSpec::color_options([0xFFFFFF]))
            .with("seed", ParamSpec::seed()),
        build_cumulus_cloud,
    )
}

fn build_cumulus_cloud(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let radii = params.numbers("tuft_radii")?;
    let offsets = params.numbers("tuft_offsets")?;
    if radii.is_empty() || radii.len() != offsets.len() {
        return Err(GenerationError::Degenerate {
            reason: format!("{} tuft radii for {} tuft offsets", radii.len(), offsets.len()),
        });
    }
    let jitter = params.float("jitter")?;

    let mut tufts = Vec::with_capacity(radii.len());
    for (radius, offset) in radii.iter().zip(&offsets) {
        if *radius <= 0.0 {
            return Err(GenerationError::Degenerate {
                reason: format!("tuft radius must be > 0 (got {radius})"),
            });
        }

        let mut tuft: UnpackedMesh = generate_sphere(*radius as f32, 7, 8);
        let x = *offset as f32 * draw(params, "offset_scale", rng)?;
        let y = draw(params, "y_variation", rng)?;
        let z = draw(params, "z_variation", rng)?;
        tuft.apply(Transform::translate(x, y, z));
        jitter_vertices(&mut tuft, jitter, rng);
        tuft.apply(MushBottom {
            y: draw(params, "bottom_mush", rng)?,
        });
        tufts.push(tuft);
    }

    let mut cloud = merge(&tufts);
    cloud
        .apply(Transform::scale_uniform(positive(params, "scale")?))
        .apply(Paint(params.color("color")?));

    Ok(finalize(cloud))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diorama_core::Color;

    #[test]
    fn test_cloud_has_flat_bottom() {
        let generator = cumulus_cloud();
        let mut rng = RandomEngine::new("clouds");
        for _ in 0..10 {
            let mesh = generator.make_random_mesh(&mut rng).unwrap().mesh;
            let (min, max) = mesh.bounds().unwrap();
            assert!(min.y >= -0.55 - 1e-5, "bottom below mush plane: {}", min.y);
            assert!(max.y > 1.0);
            assert!(max.x - min.x > max.y - min.y, "clouds are wider than tall");
        }
    }

    #[test]
    fn test_cloud_is_white() {
        let mesh = cumulus_cloud().make_random_mesh(&mut RandomEngine::new(5u64)).unwrap().mesh;
        let white = Color::WHITE.to_rgba8();
        assert!(mesh.colors.iter().all(|c| *c == white));
    }

    #[test]
    fn test_tuft_count_follows_params() {
        let generator = cumulus_cloud();
        let tuft: UnpackedMesh = generate_sphere(1.0, 7, 8);

        let mut params = generator.random_params(&mut RandomEngine::new(3u64));
        params.insert("tuft_radii", vec![1.0, 1.2]);
        params.insert("tuft_offsets", vec![-1.0, 1.0]);
        let mesh = generator.make_mesh(&params, &mut RandomEngine::new(3u64)).unwrap().mesh;
        assert_eq!(mesh.vertex_count(), tuft.vertex_count() * 2);
    }

    #[test]
    fn test_mismatched_tufts_are_degenerate() {
        let generator = cumulus_cloud();
        let mut params = generator.random_params(&mut RandomEngine::new(3u64));
        params.insert("tuft_offsets", vec![0.0]);
        assert!(matches!(
            generator.make_mesh(&params, &mut RandomEngine::new(3u64)),
            Err(GenerationError::Degenerate { .. })
        ));
    }
}
