//! Spherical Voronoi engines.
//!
//! The analysis code only sees [`SphericalVoronoiEngine`]. For points on a
//! sphere centred at the origin, the convex hull facets form the Delaunay
//! triangulation, and the outward facet normals are the Voronoi vertices.
//! Both engines here are built on that duality and differ only in how the
//! hull is constructed. Cocircular generators give several facets with the
//! same circumcentre; those are merged into one Voronoi vertex.

pub mod engines;
pub mod hull;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::VERTEX_MERGE_DISTANCE;

pub use engines::{ChullEngine, EngineKind, QhullEngine};
pub use hull::{ConvexHull, HullFacet};

/// Errors raised by an engine for input it cannot partition
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("at least {required} generators are required, got {actual}")]
    TooFewGenerators { required: usize, actual: usize },
    #[error("generator {index} duplicates generator {original}")]
    DuplicateGenerator { index: usize, original: usize },
    #[error("generator {index} is not finite")]
    NonFinite { index: usize },
    #[error("degenerate generator set: {0}")]
    Degenerate(String),
}

/// What an engine's output can be relied upon for
///
/// Runs check these up front instead of inspecting a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineCapabilities {
    /// Produces one region per generator
    pub partition: bool,
    /// Supports ordering region vertices into polygon order
    pub region_sorting: bool,
    /// Regions cover the sphere exactly once, so areas can be summed
    pub exact_coverage: bool,
}

impl EngineCapabilities {
    pub fn all() -> Self {
        Self {
            partition: true,
            region_sorting: true,
            exact_coverage: true,
        }
    }

    /// Capabilities required by `self` that `offered` lacks
    pub fn missing_from(&self, offered: &EngineCapabilities) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.partition && !offered.partition {
            missing.push("partition");
        }
        if self.region_sorting && !offered.region_sorting {
            missing.push("region_sorting");
        }
        if self.exact_coverage && !offered.exact_coverage {
            missing.push("exact_coverage");
        }
        missing
    }
}

/// An implementation that partitions a sphere into Voronoi regions
pub trait SphericalVoronoiEngine {
    /// Name used in records and reports
    fn name(&self) -> &str;

    fn capabilities(&self) -> EngineCapabilities;

    /// Partition the sphere of `radius` (centred at the origin) around `generators`
    fn compute(&self, generators: &[DVec3], radius: f64) -> Result<VoronoiDiagram, EngineError>;
}

/// A spherical Voronoi diagram
#[derive(Debug, Clone)]
pub struct VoronoiDiagram {
    pub generators: Vec<DVec3>,
    /// Voronoi vertices on the sphere, shared between regions
    pub vertices: Vec<DVec3>,
    /// Indices into `vertices`, one region per generator
    pub regions: Vec<Vec<usize>>,
    pub radius: f64,
    regions_sorted: bool,
}

impl VoronoiDiagram {
    pub fn new(generators: Vec<DVec3>, vertices: Vec<DVec3>, regions: Vec<Vec<usize>>, radius: f64) -> Self {
        Self {
            generators,
            vertices,
            regions,
            radius,
            regions_sorted: false,
        }
    }

    /// Build the diagram dual to a convex hull of `generators`
    ///
    /// Facet circumcentres closer than [`VERTEX_MERGE_DISTANCE`] on the unit
    /// sphere become one vertex, and each region lists a vertex once.
    pub fn from_hull(generators: &[DVec3], hull: &ConvexHull, radius: f64) -> Self {
        let normals = hull.facet_normals(generators);
        let (representatives, vertex_of_facet) = merge_close_points(&normals, VERTEX_MERGE_DISTANCE);
        let vertices: Vec<DVec3> = representatives
            .iter()
            .map(|&facet_idx| normals[facet_idx] * radius)
            .collect();

        let mut regions: Vec<Vec<usize>> = vec![Vec::new(); generators.len()];
        for (facet_idx, facet) in hull.facets.iter().enumerate() {
            let vertex = vertex_of_facet[facet_idx];
            for &point_idx in &facet.indices {
                let region = &mut regions[point_idx];
                if !region.contains(&vertex) {
                    region.push(vertex);
                }
            }
        }

        Self::new(generators.to_vec(), vertices, regions, radius)
    }

    pub fn regions_sorted(&self) -> bool {
        self.regions_sorted
    }

    /// Order every region's vertices counter-clockwise as seen from outside
    pub fn sort_vertices_of_regions(&mut self) {
        for (generator, region) in self.generators.iter().zip(self.regions.iter_mut()) {
            sort_region_ccw(*generator, region, &self.vertices);
        }
        self.regions_sorted = true;
    }

    /// Vertex positions of region `index`, in the region's current order
    pub fn region_polygon(&self, index: usize) -> Vec<DVec3> {
        self.regions[index].iter().map(|&v| self.vertices[v]).collect()
    }
}

/// Index pairs `(i, j)` with `i < j` and `|points[i] - points[j]| < tolerance`
///
/// Points are swept in x order, so only pairs whose x coordinates differ by
/// less than `tolerance` are measured.
pub(crate) fn close_pairs(points: &[DVec3], tolerance: f64) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));

    let mut pairs = Vec::new();
    for (position, &i) in order.iter().enumerate() {
        for &j in &order[position + 1..] {
            if points[j].x - points[i].x >= tolerance {
                break;
            }
            if points[i].distance(points[j]) < tolerance {
                pairs.push((i.min(j), i.max(j)));
            }
        }
    }
    pairs
}

/// Group points closer than `tolerance` (transitively)
///
/// Returns the lowest index of every group, in index order, and for each
/// point the position of its group in that list.
fn merge_close_points(points: &[DVec3], tolerance: f64) -> (Vec<usize>, Vec<usize>) {
    let mut parent: Vec<usize> = (0..points.len()).collect();
    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for (a, b) in close_pairs(points, tolerance) {
        let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
        if ra != rb {
            parent[ra.max(rb)] = ra.min(rb);
        }
    }

    let mut representatives = Vec::new();
    let mut group_of_root = vec![usize::MAX; points.len()];
    let mut group = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let r = root(&mut parent, i);
        if group_of_root[r] == usize::MAX {
            group_of_root[r] = representatives.len();
            representatives.push(r);
        }
        group.push(group_of_root[r]);
    }
    (representatives, group)
}

fn sort_region_ccw(generator: DVec3, region: &mut [usize], vertices: &[DVec3]) {
    if region.len() <= 2 {
        return;
    }

    let g = generator.normalize();
    let up = if g.y.abs() < 0.9 { DVec3::Y } else { DVec3::X };
    let tangent_x = g.cross(up).normalize();
    let tangent_y = g.cross(tangent_x);

    region.sort_by(|&a, &b| {
        let angle_a = tangent_angle(vertices[a], g, tangent_x, tangent_y);
        let angle_b = tangent_angle(vertices[b], g, tangent_x, tangent_y);
        angle_a.total_cmp(&angle_b)
    });
}

fn tangent_angle(point: DVec3, normal: DVec3, tangent_x: DVec3, tangent_y: DVec3) -> f64 {
    let projected = point - normal * normal.dot(point);
    projected.dot(tangent_y).atan2(projected.dot(tangent_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_capabilities() {
        let required = EngineCapabilities::all();
        let offered = EngineCapabilities {
            partition: true,
            ..Default::default()
        };
        assert_eq!(required.missing_from(&offered), vec!["region_sorting", "exact_coverage"]);
        assert!(required.missing_from(&EngineCapabilities::all()).is_empty());
        assert!(EngineCapabilities::default().missing_from(&offered).is_empty());
    }

    #[test]
    fn test_close_pairs_sweep_past_points_between_in_x() {
        let a = DVec3::new(0.6, 0.8, 0.0);
        let b = a + DVec3::new(1e-11, 0.0, 1.25e-11);
        let between = DVec3::new(0.6 + 5e-12, -0.8, 0.0);
        let points = [DVec3::NEG_X, a, between, DVec3::Z, b];
        assert_eq!(close_pairs(&points, 1e-10), vec![(1, 4)]);
    }

    #[test]
    fn test_merge_close_points_is_transitive() {
        let points = [
            DVec3::X,
            DVec3::Y,
            DVec3::X + DVec3::new(0.0, 6e-11, 0.0),
            DVec3::X + DVec3::new(0.0, 1.2e-10, 0.0),
            DVec3::Z,
        ];
        let (representatives, group) = merge_close_points(&points, 1e-10);
        assert_eq!(representatives, vec![0, 1, 4]);
        assert_eq!(group, vec![0, 1, 0, 0, 2]);
    }

    #[test]
    fn test_sort_region_is_counter_clockwise_from_outside() {
        // square of vertices around +Z given in scrambled order
        let vertices = vec![
            DVec3::new(0.1, 0.0, 1.0),
            DVec3::new(-0.1, 0.0, 1.0),
            DVec3::new(0.0, 0.1, 1.0),
            DVec3::new(0.0, -0.1, 1.0),
        ];
        let mut diagram = VoronoiDiagram::new(vec![DVec3::Z], vertices, vec![vec![0, 1, 2, 3]], 1.0);
        assert!(!diagram.regions_sorted());

        diagram.sort_vertices_of_regions();
        assert!(diagram.regions_sorted());

        let polygon = diagram.region_polygon(0);
        for i in 0..polygon.len() {
            let a = polygon[i];
            let b = polygon[(i + 1) % polygon.len()];
            // consecutive turns keep the outward normal on the +Z side
            assert!(a.cross(b).z > 0.0, "edge {i} turns clockwise");
        }
    }
}
