use glam::DVec3;

use super::coordinates::{AngleUnit, SphericalCoord};

/// Great-circle distance between two points on a sphere of `radius`
///
/// Haversine form, written in terms of the polar angle rather than latitude:
/// `d = 2r·asin(sqrt((1 - cos Δφ)/2 + sin φ1·sin φ2·(1 - cos Δθ)/2))`.
/// Each `(1 - cos x)/2` is evaluated as `sin²(x/2)`, which keeps its
/// precision for nearly coincident points. The argument of `asin` is clamped
/// to `[0, 1]` so rounding can never produce NaN.
pub fn haversine_distance(a: DVec3, b: DVec3, radius: f64) -> f64 {
    let a = SphericalCoord::from_cartesian(a, AngleUnit::Radians);
    let b = SphericalCoord::from_cartesian(b, AngleUnit::Radians);

    let polar_term = half_versine(b.phi - a.phi);
    let azimuth_term = a.phi.sin() * b.phi.sin() * half_versine(b.theta - a.theta);
    let h = (polar_term + azimuth_term).clamp(0.0, 1.0);

    2.0 * radius * h.sqrt().asin()
}

/// `(1 - cos x) / 2`
fn half_versine(x: f64) -> f64 {
    let s = (x / 2.0).sin();
    s * s
}
