//! Small numeric helpers shared by generators

use std::f64::consts::PI;

use glam::DVec2;

pub const RADIANS_FOR_1_DEGREE: f64 = PI / 180.0;
pub const RADIANS_FOR_90_DEGREES: f64 = PI / 2.0;
pub const RADIANS_FOR_180_DEGREES: f64 = PI;
pub const RADIANS_FOR_360_DEGREES: f64 = PI * 2.0;

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// Not clamped. A zero-width input range maps everything to `out_min`.
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let in_range = in_max - in_min;
    if in_range == 0.0 {
        return out_min;
    }
    (out_max - out_min) * ((value - in_min) / in_range) + out_min
}

/// [`remap`] with `[min, max]` pairs
pub fn remap_from_ranges(value: f64, from: [f64; 2], to: [f64; 2]) -> f64 {
    remap(value, from[0], from[1], to[0], to[1])
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Planar offset `distance` away along `angle` (radians from +x)
pub fn polar_offset(distance: f64, angle: f64) -> DVec2 {
    DVec2::from_angle(angle) * distance
}
