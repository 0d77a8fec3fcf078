//! Terrain: the seeded ground plane every diorama sits on
//!
//! Heights come from octave simplex noise on a `(width + 1) x (depth + 1)`
//! vertex grid, then lakes are pressed into it and islands raised inside the
//! big ones. Vertex colors follow a ramp indexed by height.

use diorama_core::math::{RADIANS_FOR_1_DEGREE, RADIANS_FOR_180_DEGREES, remap, remap_from_ranges};
use diorama_core::{Color, GenerationError, MeshGenerator, ParamSpec, RandomEngine, ResolvedParams, Schema};
use glam::{DVec2, Vec3};
use noise::{NoiseFn, Simplex};

use super::{PropGenerator, bounded_count, finalize};
use crate::mesh::{MeshBuilder, UnpackedMesh};

/// Largest grid side, in cells
const MAX_GRID_SIZE: usize = 512;
const MAX_OCTAVES: usize = 32;
const MAX_LAKES: usize = 16;

const SMALL_LAKE_RADIUS: [f64; 2] = [1.0, 5.0];
const SMALL_LAKE_FILL: f64 = 0.85;
const SMALL_LAKE_RIM: Rim = Rim {
    thickness: 2.5,
    alpha: 0.275,
};

const BIG_LAKE_RADIUS: [f64; 2] = [5.0, 20.0];
const BIG_LAKE_MAX_ASPECT: f64 = 2.5;
const BIG_LAKE_FILL: f64 = 0.8;
const BIG_LAKE_RIM: Rim = Rim {
    thickness: 3.0,
    alpha: 0.125,
};

const ISLAND_COUNT: [i64; 2] = [0, 3];
const ISLAND_MAX_RADIUS: f64 = 6.0;
/// Island heights on the 0..=255 heightmap scale
const ISLAND_HEIGHT: [i64; 2] = [30, 150];
const ISLAND_RIM_THICKNESS: [f64; 2] = [0.0, 4.0];
const ISLAND_RIM_ALPHA: f64 = 0.3;
const ISLAND_FILL: f64 = 0.85;
const ISLAND_MAX_TURN: f64 = 20.0 * RADIANS_FOR_1_DEGREE;

/// Rolling low-poly ground with lakes, colored by height
pub fn ground_plane() -> PropGenerator {
    MeshGenerator::new(
        "ground_plane",
        Schema::new()
            .with("width", ParamSpec::fixed(45))
            .with("depth", ParamSpec::fixed(45))
            .with("octaves", ParamSpec::fixed(16).hidden())
            .with("height_range", ParamSpec::fixed_range(-0.5, 6.5))
            .with("big_lakes", ParamSpec::int_range(0, 1))
            .with("small_lakes", ParamSpec::int_range(0, 4))
            .with(
                "colors",
                ParamSpec::color_palette([
                    0x463914, 0x003911, 0x004511, 0x004911, 0x005212, 0x006014, 0x007020,
                ]),
            )
            .with("seed", ParamSpec::seed()),
        build_ground_plane,
    )
}

fn grid_size(params: &ResolvedParams, name: &str) -> Result<usize, GenerationError> {
    let size = bounded_count(params, name, MAX_GRID_SIZE)?;
    if size == 0 {
        return Err(GenerationError::Degenerate {
            reason: format!("`{name}` must be at least 1"),
        });
    }
    Ok(size)
}

fn build_ground_plane(params: &ResolvedParams, rng: &mut RandomEngine) -> Result<UnpackedMesh, GenerationError> {
    let width = grid_size(params, "width")?;
    let depth = grid_size(params, "depth")?;
    let octaves = bounded_count(params, "octaves", MAX_OCTAVES)?;
    let height_range = params.range("height_range")?;
    let small_lakes = bounded_count(params, "small_lakes", MAX_LAKES)?;
    let big_lakes = bounded_count(params, "big_lakes", MAX_LAKES)?;
    let colors = params.colors("colors")?;
    if colors.is_empty() {
        return Err(GenerationError::Degenerate {
            reason: "`colors` needs at least one entry".to_string(),
        });
    }

    // Noise seed is the first draw, lake shapes follow
    let simplex = Simplex::new(rng.new_seed_value() as u32);
    let mut heightmap = Heightmap::from_noise(width, depth, octaves, &simplex);
    for _ in 0..small_lakes {
        heightmap.add_small_lake(rng);
    }
    for _ in 0..big_lakes {
        heightmap.add_big_lake(rng)?;
    }

    let mut mesh = UnpackedMesh::new();
    let half = DVec2::new(width as f64, depth as f64) * 0.5;
    for z in 0..=depth {
        for x in 0..=width {
            let height = remap_from_ranges(heightmap.get(x, z), [0.0, 1.0], height_range);
            let position = Vec3::new((x as f64 - half.x) as f32, height as f32, (z as f64 - half.y) as f32);
            let index = mesh.add_vertex(position, Vec3::Y);
            mesh.colors[index as usize] = color_for_height(&colors, height).to_rgba8();
        }
    }

    let row = (width + 1) as u32;
    for z in 0..depth as u32 {
        for x in 0..width as u32 {
            let a = z * row + x;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            mesh.add_triangle(a, c, b);
            mesh.add_triangle(b, c, d);
        }
    }

    Ok(finalize(mesh))
}

/// Ramp color at `height`, where palette entry `i` sits at height `i`
fn color_for_height(colors: &[Color], height: f64) -> Color {
    let top = colors.len().saturating_sub(1);
    let height = height.clamp(0.0, top as f64);
    let below = height.floor() as usize;
    let above = height.ceil() as usize;
    colors[below].lerp(colors[above], (height - below as f64) as f32)
}

/// Octave noise in `[0, 1]`: frequency doubles and strength halves per octave
fn octave_noise(simplex: &Simplex, x: f64, z: f64, octaves: usize) -> f64 {
    let mut value = 0.0;
    let mut frequency = 1.0;
    let mut strength = 1.0;
    let mut total_strength = 0.0;

    for _ in 0..octaves {
        let sample = remap(simplex.get([x * frequency, z * frequency]), -1.0, 1.0, 0.0, 1.0);
        value += sample * strength;
        total_strength += strength;
        strength /= 2.0;
        frequency *= 2.0;
    }

    if total_strength > 0.0 {
        (value / total_strength).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rotated ellipse in grid coordinates
#[derive(Debug, Clone, Copy)]
struct Ellipse {
    center: DVec2,
    radius: DVec2,
    angle: f64,
}

impl Ellipse {
    /// `(normalized radius, distance to the outline)` of a grid point
    ///
    /// Normalized radius is 1 on the outline. The distance is measured along
    /// the ray from the center.
    fn locate(&self, point: DVec2) -> (f64, f64) {
        let offset = DVec2::from_angle(-self.angle).rotate(point - self.center);
        let r = (offset / self.radius).length();
        let outline_distance = if r > 0.0 {
            offset.length() * (1.0 - 1.0 / r).abs()
        } else {
            self.radius.min_element()
        };
        (r, outline_distance)
    }
}

#[derive(Debug, Clone, Copy)]
struct Rim {
    thickness: f64,
    alpha: f64,
}

/// Per-vertex heights in `[0, 1]`, row-major by `z`
struct Heightmap {
    width: usize,
    depth: usize,
    values: Vec<f64>,
}

impl Heightmap {
    fn from_noise(width: usize, depth: usize, octaves: usize, simplex: &Simplex) -> Self {
        let mut values = Vec::with_capacity((width + 1) * (depth + 1));
        for z in 0..=depth {
            for x in 0..=width {
                values.push(octave_noise(
                    simplex,
                    x as f64 / width as f64,
                    z as f64 / depth as f64,
                    octaves,
                ));
            }
        }
        Self { width, depth, values }
    }

    fn get(&self, x: usize, z: usize) -> f64 {
        self.values[z * (self.width + 1) + x]
    }

    fn blend_where(&mut self, target: f64, alpha: f64, mut inside: impl FnMut(DVec2) -> bool) {
        let row = self.width + 1;
        for (i, value) in self.values.iter_mut().enumerate() {
            let point = DVec2::new((i % row) as f64, (i / row) as f64);
            if inside(point) {
                *value += (target - *value) * alpha;
            }
        }
    }

    fn fill(&mut self, ellipse: &Ellipse, target: f64, alpha: f64) {
        self.blend_where(target, alpha, |p| ellipse.locate(p).0 <= 1.0);
    }

    fn stroke(&mut self, ellipse: &Ellipse, target: f64, rim: Rim) {
        let half = rim.thickness * 0.5;
        self.blend_where(target, rim.alpha, |p| ellipse.locate(p).1 <= half);
    }

    fn random_center(&self, rng: &mut RandomEngine) -> DVec2 {
        DVec2::new(rng.uniform(0.0, self.width as f64), rng.uniform(0.0, self.depth as f64))
    }

    fn add_small_lake(&mut self, rng: &mut RandomEngine) {
        let radius = DVec2::new(rng.uniform_from(SMALL_LAKE_RADIUS), rng.uniform_from(SMALL_LAKE_RADIUS));
        let angle = rng.uniform(0.0, RADIANS_FOR_180_DEGREES);
        let lake = Ellipse {
            center: self.random_center(rng),
            radius,
            angle,
        };
        self.fill(&lake, 0.0, SMALL_LAKE_FILL);
        self.stroke(&lake, 0.0, SMALL_LAKE_RIM);
    }

    fn add_big_lake(&mut self, rng: &mut RandomEngine) -> Result<(), GenerationError> {
        let [min_radius, max_radius] = BIG_LAKE_RADIUS;
        let radius_x = rng.uniform_from(BIG_LAKE_RADIUS);
        let radius_z = rng.uniform(
            min_radius.max(radius_x / BIG_LAKE_MAX_ASPECT),
            max_radius.min(radius_x * BIG_LAKE_MAX_ASPECT),
        );
        let angle = rng.uniform(0.0, RADIANS_FOR_180_DEGREES);
        let lake = Ellipse {
            center: self.random_center(rng),
            radius: DVec2::new(radius_x, radius_z),
            angle,
        };
        let min_axis = lake.radius.min_element();
        let islands = rng.uniform_int(ISLAND_COUNT[0], ISLAND_COUNT[1])?;

        self.fill(&lake, 0.0, BIG_LAKE_FILL);
        self.stroke(&lake, 0.0, BIG_LAKE_RIM);

        // Islands stay within the lake's shorter axis
        let island_radius = [1.0, ISLAND_MAX_RADIUS.min(min_axis - 2.0)];
        let reach = min_axis - 1.0;
        for _ in 0..islands {
            let radius = DVec2::new(rng.uniform_from(island_radius), rng.uniform_from(island_radius));
            let center = DVec2::new(
                rng.uniform(lake.center.x - reach, lake.center.x + reach),
                rng.uniform(lake.center.y - reach, lake.center.y + reach),
            );
            let angle = rng.uniform(angle - ISLAND_MAX_TURN, angle + ISLAND_MAX_TURN);
            let height = rng.uniform_int(ISLAND_HEIGHT[0], ISLAND_HEIGHT[1])? as f64 / 255.0;
            let rim = Rim {
                thickness: rng.uniform_from(ISLAND_RIM_THICKNESS),
                alpha: ISLAND_RIM_ALPHA,
            };

            let island = Ellipse { center, radius, angle };
            self.stroke(&island, height, rim);
            self.fill(&island, height, ISLAND_FILL);
        }
        Ok(())
    }
}
