//! Ground cover: flowers, grass stalks, sticks and rocks

use diorama_core::math::{RADIANS_FOR_1_DEGREE, RADIANS_FOR_180_DEGREES, RADIANS_FOR_360_DEGREES};
use diorama_core::{GenerationError, MeshGenerator, ParamSpec, RandomEngine, ResolvedParams, Schema};

use super::{
    Clump, MAX_PARTS, PropGenerator, bounded_count, draw, finalize, merge, positive, sprout_clump,
};
use crate::mesh::{
    MeshApply, Paint, Transform, UnpackedMesh, generate_cone, generate_cylinder, generate_sphere,
    jitter_vertices,
};

/// A few thin stems, each topped with an upside-down cone
pub fn flower_bunch() -> PropGenerator {
    MeshGenerator::new(
        "flower_bunch",
        Schema::new()
            .with("count", ParamSpec::int_range(2, 5))
            .with("separation", ParamSpec::fixed_range(0.18, 0.4))
            .with(
                "tilt",
                ParamSpec::fixed_range(-12.0 * RADIANS_FOR_1_DEGREE, 12.0 * RADIANS_FOR_1_DEGREE),
            )
            .with("stem_height", ParamSpec::fixed_range(0.25, 0.5))
            .with("stem_width", ParamSpec::fixed(0.02))
            .with("stem_taper", ParamSpec::fixed(0.55))
            .with("bloom_width", ParamSpec::fixed_range(0.064, 0.125))
            .with("bloom_height", ParamSpec::fixed_range(0.05, 0.06))
            .with("stem_color", ParamSpec::color_options([0x00C980]))
            .with(
                "bloom_color",
                ParamSpec::color_options([0xFFFFFF, 0xFFDD00, 0x0000D0, 0xFF7700, 0xFF0088]),
            )
            .with("seed", ParamSpec::seed()),
        build_flower_bunch,
    )
}

fn build_flower_bunch(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let clump = Clump {
        count: bounded_count(params, "count", MAX_PARTS)?,
        separation: params.range("separation")?,
        tilt: params.range("tilt")?,
    };
    let stem_width = positive(params, "stem_width")?;
    let stem_taper = params.float("stem_taper")?;
    let stem = Paint(params.color("stem_color")?);
    let bloom = Paint(params.color("bloom_color")?);

    sprout_clump(&clump, rng, |_, rng| {
        let bloom_width = draw(params, "bloom_width", rng)?;
        let bloom_height = draw(params, "bloom_height", rng)?;
        let stem_height = draw(params, "stem_height", rng)?;

        // Flipped so the wide end faces up
        let mut head: UnpackedMesh = generate_cone(bloom_width, bloom_height, 3);
        head.apply(Transform::rotate_x(RADIANS_FOR_180_DEGREES as f32))
            .apply(Transform::rotate_y(rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32))
            .apply(Transform::translate(0.0, stem_height + bloom_height * 0.5 - 0.03, 0.0))
            .apply(bloom);

        let mut body: UnpackedMesh = generate_cylinder(stem_width, stem_width * stem_taper, stem_height, 3);
        body.apply(Transform::translate(0.0, stem_height * 0.5, 0.0))
            .apply(stem);

        Ok(merge(&[body, head]))
    })
    .map(finalize)
}

/// Tufts of tapered grass blades
pub fn stalk_clump() -> PropGenerator {
    MeshGenerator::new(
        "stalk_clump",
        Schema::new()
            .with("count", ParamSpec::int_range(1, 5))
            .with("width", ParamSpec::fixed_range(0.02, 0.04))
            .with("height", ParamSpec::fixed_range(0.15, 0.7))
            .with("taper", ParamSpec::fixed_range(0.25, 0.6))
            .with("separation", ParamSpec::fixed_range(0.2, 0.4))
            .with(
                "tilt",
                ParamSpec::fixed_range(-24.0 * RADIANS_FOR_1_DEGREE, 24.0 * RADIANS_FOR_1_DEGREE),
            )
            .with("colors", ParamSpec::color_palette([0x118840, 0x337540]))
            .with("seed", ParamSpec::seed()),
        build_stalk_clump,
    )
}

fn build_stalk_clump(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let clump = Clump {
        count: bounded_count(params, "count", MAX_PARTS)?,
        separation: params.range("separation")?,
        tilt: params.range("tilt")?,
    };
    let colors = params.colors("colors")?;

    let mut stalks = sprout_clump(&clump, rng, |_, rng| {
        let color = *rng.pick_one(&colors)?;
        let width = draw(params, "width", rng)?;
        let height = draw(params, "height", rng)?;
        let taper = draw(params, "taper", rng)?;

        let mut stalk: UnpackedMesh = generate_cylinder(width, width * taper, height, 3);
        stalk
            .apply(Transform::translate(0.0, height * 0.5, 0.0))
            .apply(Transform::rotate_y(rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32))
            .apply(Paint(color));
        Ok(stalk)
    })?;

    // Tilted bases poke out of the ground otherwise
    stalks.apply(Transform::translate(0.0, -0.015, 0.0));
    Ok(finalize(stalks))
}

/// A fallen twig lying almost flat
pub fn stick() -> PropGenerator {
    MeshGenerator::new(
        "stick",
        Schema::new()
            .with("color", ParamSpec::color_options([0x5F4030]))
            .with("length", ParamSpec::range(0.24, 1.05))
            .with("width", ParamSpec::range(0.03, 0.07))
            .with("taper", ParamSpec::range(0.25, 0.95))
            .with("jitter", ParamSpec::fixed(0.023))
            .with(
                "angle",
                ParamSpec::range(70.0 * RADIANS_FOR_1_DEGREE, 100.0 * RADIANS_FOR_1_DEGREE),
            )
            .with("seed", ParamSpec::seed()),
        build_stick,
    )
}

fn build_stick(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let length = positive(params, "length")?;
    let width = positive(params, "width")?;
    let facing = rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32;

    let mut stick: UnpackedMesh = generate_cylinder(width, width * params.float("taper")?, length, 5);
    jitter_vertices(&mut stick, params.float("jitter")?, rng);
    stick
        .apply(Transform::translate(0.0, length * 0.5, 0.0))
        .apply(Transform::rotate_x(params.float("angle")?))
        .apply(Transform::rotate_y(facing))
        .apply(Paint(params.color("color")?));

    Ok(finalize(stick))
}

/// Lumpy squashed sphere
pub fn rock() -> PropGenerator {
    MeshGenerator::new(
        "rock",
        Schema::new()
            .with("size", ParamSpec::range(0.25, 0.9))
            .with("width_segments", ParamSpec::int_range(5, 7))
            .with("height_segments", ParamSpec::int_range(5, 7))
            .with("jitter", ParamSpec::fixed(0.075))
            .with(
                "color",
                ParamSpec::color_options([0x888888, 0x777777, 0x897252, 0x6F786F]),
            )
            .with("height_scale", ParamSpec::range(0.3, 1.1))
            .with("width_scale", ParamSpec::range(0.45, 1.0))
            .with(
                "tilt",
                ParamSpec::range(-10.0 * RADIANS_FOR_1_DEGREE, 10.0 * RADIANS_FOR_1_DEGREE),
            )
            .with("seed", ParamSpec::seed()),
        build_rock,
    )
}

fn build_rock(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let size = positive(params, "size")?;
    let width_segments = bounded_count(params, "width_segments", MAX_PARTS)?.max(3) as u32;
    let height_segments = bounded_count(params, "height_segments", MAX_PARTS)?.max(2) as u32;

    let mut rock: UnpackedMesh = generate_sphere(size, width_segments, height_segments);
    let facing = rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32;
    jitter_vertices(&mut rock, params.float("jitter")?, rng);
    rock.apply(Transform::scale(
        positive(params, "width_scale")?,
        positive(params, "height_scale")?,
        1.0,
    ))
    .apply(Transform::rotate_z(params.float("tilt")?))
    .apply(Transform::rotate_y(facing))
    .apply(Paint(params.color("color")?));

    Ok(finalize(rock))
}
