//! Surface area of a convex spherical polygon.
//!
//! The polygon is fan-triangulated from its first vertex and the spherical
//! excess of every triangle is taken from its three side lengths with
//! L'Huilier's theorem. Work happens on the unit sphere; the real radius is
//! applied once at the end.

use glam::DVec3;

use super::coordinates::{AngleUnit, to_cartesian, to_spherical};
use super::haversine::haversine_distance;
use crate::constants::{DEGENERATE_POLYGON_AREA, DEGENERATE_VERTEX_DISTANCE};

/// Why a polygon fell back to the sentinel area
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegenerateReason {
    /// Fewer than three vertices
    TooFewVertices(usize),
    /// Two vertices closer than [`DEGENERATE_VERTEX_DISTANCE`] on the unit sphere
    CoincidentVertices { min_distance: f64 },
    /// The L'Huilier product went negative (or non-finite) for fan triangle `triangle`
    ExcessDomain { triangle: usize },
}

/// Outcome of an area computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolygonArea {
    Computed(f64),
    Degenerate(DegenerateReason),
}

impl PolygonArea {
    /// Area in squared radius units; the sentinel for degenerate polygons
    pub fn area(&self) -> f64 {
        match self {
            PolygonArea::Computed(area) => *area,
            PolygonArea::Degenerate(_) => DEGENERATE_POLYGON_AREA,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, PolygonArea::Degenerate(_))
    }
}

/// Surface area of a spherical polygon whose ordered `vertices` lie on a
/// sphere of `radius`
///
/// Degenerate input never fails: it yields [`DEGENERATE_POLYGON_AREA`] and a
/// warning is logged.
pub fn spherical_polygon_area(vertices: &[DVec3], radius: f64) -> f64 {
    polygon_area_outcome(vertices, radius).area()
}

/// Same as [`spherical_polygon_area`] but reports whether the sentinel was used
pub fn polygon_area_outcome(vertices: &[DVec3], radius: f64) -> PolygonArea {
    if vertices.len() < 3 {
        return degenerate(DegenerateReason::TooFewVertices(vertices.len()));
    }

    let unit_vertices = normalize_to_unit_sphere(vertices);

    let min_distance = min_pairwise_distance(&unit_vertices);
    if min_distance < DEGENERATE_VERTEX_DISTANCE {
        return degenerate(DegenerateReason::CoincidentVertices { min_distance });
    }

    let root = unit_vertices[0];
    let mut total_excess = 0.0;
    let mut b_point = unit_vertices[1];
    let mut root_b = haversine_distance(root, b_point, 1.0);

    for (triangle, &next) in unit_vertices[2..].iter().enumerate() {
        let a_point = b_point;
        b_point = next;
        let root_a = root_b;
        root_b = haversine_distance(root, b_point, 1.0);
        let a_b = haversine_distance(a_point, b_point, 1.0);

        match lhuilier_excess(root_a, root_b, a_b) {
            Some(excess) => total_excess += excess,
            None => return degenerate(DegenerateReason::ExcessDomain { triangle }),
        }
    }

    PolygonArea::Computed(total_excess * radius * radius)
}

/// Spherical excess of a triangle with unit-sphere side lengths `a`, `b`, `c`
///
/// `None` when the product under the square root is negative or the result
/// is not finite.
pub fn lhuilier_excess(a: f64, b: f64, c: f64) -> Option<f64> {
    let s = (a + b + c) / 2.0;
    let product =
        (0.5 * s).tan() * (0.5 * (s - a)).tan() * (0.5 * (s - b)).tan() * (0.5 * (s - c)).tan();

    if product.is_nan() || product < 0.0 {
        return None;
    }

    let excess = 4.0 * product.sqrt().atan();
    excess.is_finite().then_some(excess)
}

fn normalize_to_unit_sphere(vertices: &[DVec3]) -> Vec<DVec3> {
    let unit: Vec<_> = to_spherical(vertices, AngleUnit::Radians)
        .into_iter()
        .map(|c| c.on_unit_sphere())
        .collect();
    to_cartesian(&unit, AngleUnit::Radians)
}

fn min_pairwise_distance(points: &[DVec3]) -> f64 {
    let mut min = f64::INFINITY;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    min
}

fn degenerate(reason: DegenerateReason) -> PolygonArea {
    tracing::warn!(?reason, "problematic spherical polygon area calculation");
    PolygonArea::Degenerate(reason)
}
