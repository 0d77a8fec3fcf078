//! Trees: conifers, dead trees, stumps and lollipop trees

use diorama_core::math::{
    RADIANS_FOR_1_DEGREE, RADIANS_FOR_90_DEGREES, RADIANS_FOR_180_DEGREES,
    RADIANS_FOR_360_DEGREES, polar_offset, remap,
};
use diorama_core::{GenerationError, MeshGenerator, ParamSpec, RandomEngine, ResolvedParams, Schema};

use super::{MAX_PARTS, PropGenerator, bounded_count, draw, finalize, merge, positive};
use crate::mesh::{
    MeshApply, Paint, Transform, UnpackedMesh, generate_cone, generate_cylinder, generate_sphere,
    jitter_vertices,
};

const BARK: u32 = 0x604011;
const TRUNK_WIDTH: (f64, f64) = (0.2, 0.35);
const FINAL_SCALE: (f64, f64) = (0.5, 1.05);

/// Stacked cone tiers on a short trunk
pub fn conifer() -> PropGenerator {
    MeshGenerator::new(
        "conifer",
        Schema::new()
            .with("tier_widths", ParamSpec::fixed(vec![1.4, 2.0, 2.6]))
            .with("tier_y_offsets", ParamSpec::fixed(vec![2.2, 1.1, 0.0]))
            .with("tier_height", ParamSpec::fixed(2.0))
            .with("width_scale", ParamSpec::range(0.5, 1.0))
            .with("leaf_bottom", ParamSpec::range(1.25, 2.0))
            .with("tier_y_variation", ParamSpec::fixed_range(0.0, 0.25))
            .with("tier_width_variation", ParamSpec::fixed_range(-0.125, 0.125))
            .with("trunk_width", ParamSpec::range(TRUNK_WIDTH.0, TRUNK_WIDTH.1))
            .with("trunk_height", ParamSpec::fixed(2.0))
            .with("scale", ParamSpec::range(FINAL_SCALE.0, FINAL_SCALE.1))
            .with("tilt", ParamSpec::fixed_range(-0.04, 0.04))
            .with("leaf_color", ParamSpec::color_options([0x008022]))
            .with("bark_color", ParamSpec::color_options([BARK]))
            .with("segments", ParamSpec::fixed(5).hidden())
            .with("seed", ParamSpec::seed()),
        build_conifer,
    )
}

fn build_conifer(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let widths = params.numbers("tier_widths")?;
    let offsets = params.numbers("tier_y_offsets")?;
    if widths.len() != offsets.len() {
        return Err(GenerationError::Degenerate {
            reason: format!(
                "{} tier widths but {} tier offsets",
                widths.len(),
                offsets.len()
            ),
        });
    }

    let tier_height = positive(params, "tier_height")?;
    let width_scale = params.float("width_scale")?;
    let leaf_bottom = params.float("leaf_bottom")?;
    let width_variation = params.range("tier_width_variation")?;
    let segments = bounded_count(params, "segments", MAX_PARTS)? as u32;
    let leaf = Paint(params.color("leaf_color")?);

    let mut parts = Vec::with_capacity(widths.len() + 1);
    for (width, offset) in widths.iter().zip(&offsets) {
        let tier_width = *width as f32 * width_scale + rng.uniform_from(width_variation) as f32;
        // Tiers sit on top of each other regardless of the width jitter
        let tier_y = leaf_bottom
            + *offset as f32
            + draw(params, "tier_y_variation", rng)?
            + tier_height * 0.5
            - width_variation[1] as f32;

        let mut tier: UnpackedMesh = generate_cone(tier_width, tier_height, segments);
        tier.apply(Transform::rotate_y(rng.uniform(0.0, 1.0) as f32))
            .apply(Transform::translate(0.0, tier_y, 0.0))
            .apply(leaf);
        parts.push(tier);
    }

    let trunk_width = positive(params, "trunk_width")?;
    let trunk_height = positive(params, "trunk_height")?;
    let mut trunk: UnpackedMesh = generate_cylinder(trunk_width, trunk_width, trunk_height, segments);
    trunk
        .apply(Transform::translate(0.0, trunk_height * 0.5 - 0.1, 0.0))
        .apply(Transform::rotate_y(rng.uniform(0.0, 1.0) as f32))
        .apply(Paint(params.color("bark_color")?));
    parts.push(trunk);

    let mut tree = merge(&parts);
    tree.apply(Transform::scale_uniform(positive(params, "scale")?))
        .apply(Transform::rotate_z(draw(params, "tilt", rng)?))
        .apply(Transform::rotate_x(draw(params, "tilt", rng)?));

    Ok(finalize(tree))
}

/// Bare tapered trunk with branches spiralling up
pub fn dead_tree() -> PropGenerator {
    MeshGenerator::new(
        "dead_tree",
        Schema::new()
            .with("trunk_width", ParamSpec::range(TRUNK_WIDTH.0 * 0.7, TRUNK_WIDTH.1 * 0.7))
            .with("trunk_height", ParamSpec::range(3.0, 5.0))
            .with("trunk_taper", ParamSpec::fixed(0.5))
            .with("branch_count", ParamSpec::int_range(4, 9))
            .with("branch_length", ParamSpec::fixed_range(0.4, 0.7))
            .with("branch_taper", ParamSpec::fixed_range(0.35, 0.85))
            // Branches shrink by 1 / (i * falloff + 1) going up
            .with("branch_falloff", ParamSpec::fixed(0.25))
            .with("branch_margin", ParamSpec::fixed(0.75))
            .with("scale", ParamSpec::range(FINAL_SCALE.0, FINAL_SCALE.1))
            .with("lean", ParamSpec::range(0.0, 15.0 * RADIANS_FOR_1_DEGREE))
            .with("bark_color", ParamSpec::color_options([BARK]))
            .with("segments", ParamSpec::fixed(5).hidden())
            .with("seed", ParamSpec::seed()),
        build_dead_tree,
    )
}

fn build_dead_tree(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let trunk_width = positive(params, "trunk_width")?;
    let trunk_height = positive(params, "trunk_height")?;
    let segments = bounded_count(params, "segments", MAX_PARTS)? as u32;
    let bark = Paint(params.color("bark_color")?);

    let mut trunk: UnpackedMesh = generate_cylinder(
        trunk_width,
        trunk_width * params.float("trunk_taper")?,
        trunk_height,
        segments,
    );
    trunk
        .apply(Transform::translate(0.0, trunk_height * 0.5, 0.0))
        .apply(bark);

    let branch_count = bounded_count(params, "branch_count", MAX_PARTS)?;
    let falloff = params.float("branch_falloff")?;
    let margin = f64::from(params.float("branch_margin")?);
    let branch_width = trunk_width * 0.5;

    let mut parts = Vec::with_capacity(branch_count + 1);
    parts.push(trunk);

    let mut last_orientation = 0.0;
    for i in 0..branch_count {
        let length = draw(params, "branch_length", rng)? / (i as f32 * falloff + 1.0);
        let taper = draw(params, "branch_taper", rng)?;
        let orientation = last_orientation + rng.uniform(RADIANS_FOR_90_DEGREES, RADIANS_FOR_180_DEGREES);

        // Push the branch base just outside the trunk surface
        let reach = f64::from(length * 0.5 + trunk_width * 0.25 - 0.05);
        let offset = polar_offset(reach, -orientation);
        let height = remap(
            i as f64,
            0.0,
            branch_count.saturating_sub(1) as f64,
            margin,
            f64::from(trunk_height) - margin,
        );

        let mut branch: UnpackedMesh = generate_cylinder(branch_width * taper, branch_width, length, segments);
        branch
            .apply(Transform::rotate_z(RADIANS_FOR_90_DEGREES as f32))
            .apply(Transform::rotate_y(orientation as f32))
            .apply(Transform::translate(offset.x as f32, height as f32, offset.y as f32))
            .apply(bark);
        parts.push(branch);

        last_orientation = orientation;
    }

    let mut tree = merge(&parts);
    tree.apply(Transform::scale_uniform(positive(params, "scale")?))
        .apply(Transform::rotate_x(params.float("lean")?))
        .apply(Transform::rotate_y(rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32));

    Ok(finalize(tree))
}

/// Short, slightly tapered trunk
pub fn tree_stump() -> PropGenerator {
    MeshGenerator::new(
        "tree_stump",
        Schema::new()
            .with("trunk_width", ParamSpec::range(TRUNK_WIDTH.0, TRUNK_WIDTH.1))
            .with("taper", ParamSpec::range(0.85, 1.0))
            .with("height", ParamSpec::range(0.5, 1.0))
            .with("bark_color", ParamSpec::color_options([BARK]))
            .with("segments", ParamSpec::fixed(7).hidden())
            .with("seed", ParamSpec::seed()),
        build_tree_stump,
    )
}

fn build_tree_stump(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let width = positive(params, "trunk_width")?;
    let height = positive(params, "height")?;

    let mut stump: UnpackedMesh = generate_cylinder(
        width,
        width * params.float("taper")?,
        height,
        bounded_count(params, "segments", MAX_PARTS)? as u32,
    );
    // Sunk slightly into the ground
    stump
        .apply(Transform::translate(0.0, height * 0.45, 0.0))
        .apply(Transform::rotate_y(rng.uniform(0.0, RADIANS_FOR_360_DEGREES) as f32))
        .apply(Paint(params.color("bark_color")?));

    Ok(finalize(stump))
}

/// Round leaf ball on a straight trunk
pub fn lollipop_tree() -> PropGenerator {
    MeshGenerator::new(
        "lollipop_tree",
        Schema::new()
            .with("crown_radius", ParamSpec::fixed(2.5))
            .with("crown_height", ParamSpec::fixed(4.5))
            .with("trunk_width", ParamSpec::range(TRUNK_WIDTH.0, TRUNK_WIDTH.1))
            .with("trunk_height", ParamSpec::fixed(3.0))
            .with("jitter", ParamSpec::fixed(0.1))
            .with("scale", ParamSpec::range(FINAL_SCALE.0, FINAL_SCALE.1))
            .with("leaf_color", ParamSpec::color_options([0x009922]))
            .with("bark_color", ParamSpec::color_options([BARK]))
            .with("seed", ParamSpec::seed()),
        build_lollipop_tree,
    )
}

fn build_lollipop_tree(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let mut crown: UnpackedMesh = generate_sphere(positive(params, "crown_radius")?, 5, 4);
    crown
        .apply(Transform::translate(0.0, params.float("crown_height")?, 0.0))
        .apply(Transform::rotate_y(rng.uniform(0.0, 1.0) as f32))
        .apply(Paint(params.color("leaf_color")?));
    jitter_vertices(&mut crown, params.float("jitter")?, rng);

    let trunk_width = positive(params, "trunk_width")?;
    let trunk_height = positive(params, "trunk_height")?;
    let mut trunk: UnpackedMesh = generate_cylinder(trunk_width, trunk_width, trunk_height, 5);
    trunk
        .apply(Transform::translate(0.0, trunk_height * 0.5, 0.0))
        .apply(Transform::rotate_y(rng.uniform(0.0, 1.0) as f32))
        .apply(Paint(params.color("bark_color")?));

    let mut tree = merge(&[crown, trunk]);
    tree.apply(Transform::scale_uniform(positive(params, "scale")?));

    Ok(finalize(tree))
}
