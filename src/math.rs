//! Scalar helpers shared by the force models and the autopilot.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Minimum denominator used before dividing by a length or a speed.
pub const MIN_DENOM: f32 = 1e-4;

/// Shortest signed difference `target − current`, wrapped to `[−π, π]`.
pub fn angle_diff(current: f32, target: f32) -> f32 {
    let mut diff = target - current;
    if diff > PI {
        diff -= TAU;
    }
    if diff < -PI {
        diff += TAU;
    }
    diff
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a < 0.0 {
        a += TAU;
    }
    a
}

/// Unit vector for a heading angle.
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Minimum distance from `point` to the segment `start..end`.
///
/// A zero-length segment degenerates to point-to-point distance rather than
/// dividing by zero.
pub fn segment_point_distance(start: Vec2, end: Vec2, point: Vec2) -> f32 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq < MIN_DENOM * MIN_DENOM {
        return point.distance(start);
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(start + seg * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn angle_diff_wraps_across_the_seam() {
        assert_relative_eq!(angle_diff(0.1, TAU - 0.1), -0.2, epsilon = 1e-5);
        assert_relative_eq!(angle_diff(TAU - 0.1, 0.1), 0.2, epsilon = 1e-5);
        assert_relative_eq!(angle_diff(1.0, 1.5), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for raw in [-7.0_f32, -0.1, 0.0, 3.0, 6.5, 100.0] {
            let wrapped = wrap_angle(raw);
            assert!((0.0..TAU).contains(&wrapped), "{raw} wrapped to {wrapped}");
        }
    }

    #[test]
    fn segment_distance_projects_onto_interior() {
        let d = segment_point_distance(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 3.0));
        assert_relative_eq!(d, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let d = segment_point_distance(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(14.0, 3.0));
        assert_relative_eq!(d, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn segment_distance_handles_zero_length() {
        let p = Vec2::new(2.0, 2.0);
        let d = segment_point_distance(p, p, Vec2::new(5.0, 6.0));
        assert_relative_eq!(d, 5.0, epsilon = 1e-5);
    }
}
