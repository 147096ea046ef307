//! Convex hulls of generator sets.
//!
//! Two backends produce the same facet description: qhull, which merges
//! coplanar triangles into a single facet, and chull, which runs quickhull
//! on exact big-integer coordinates and always returns triangles.

use chull::ConvexHullWrapper;
use glam::DVec3;
use qhull_enhanced::Qh;

use super::EngineError;

/// A hull facet with indices into the original point array
///
/// Facets from qhull may carry more than three vertices when neighbouring
/// triangles are coplanar. Vertex order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HullFacet {
    pub indices: Vec<usize>,
}

impl HullFacet {
    /// Unit normal pointing away from `interior`
    pub fn outward_normal(&self, points: &[DVec3], interior: DVec3) -> DVec3 {
        let a = points[self.indices[0]];
        let mut widest = DVec3::ZERO;
        for (i, &b) in self.indices.iter().enumerate().skip(1) {
            for &c in &self.indices[i + 1..] {
                let candidate = (points[b] - a).cross(points[c] - a);
                if candidate.length_squared() > widest.length_squared() {
                    widest = candidate;
                }
            }
        }

        let normal = widest.normalize();
        if normal.dot(a - interior) < 0.0 { -normal } else { normal }
    }
}

/// Result of computing a 3D convex hull
#[derive(Debug, Clone)]
pub struct ConvexHull {
    pub facets: Vec<HullFacet>,
    /// A point strictly inside the hull, used to orient facet normals
    pub interior: DVec3,
}

impl ConvexHull {
    /// Hull from qhull with coplanar facets merged
    pub fn qhull(points: &[DVec3]) -> Result<Self, EngineError> {
        let coords: Vec<[f64; 3]> = points.iter().map(|p| p.to_array()).collect();

        // sphere points: nothing is inside and the distribution is not narrow
        let qh = Qh::builder()
            .compute(true)
            .triangulate(false)
            .no_near_inside(true)
            .no_narrow(true)
            .build_from_iter(coords)
            .map_err(|err| EngineError::Degenerate(err.to_string()))?;

        let mut facets = Vec::with_capacity(qh.num_facets());
        for facet in qh.facets() {
            let vertices = facet
                .vertices()
                .ok_or_else(|| EngineError::Degenerate("qhull facet has no vertices".to_string()))?;
            let indices = vertices
                .iter()
                .map(|v| {
                    v.index(&qh)
                        .ok_or_else(|| EngineError::Degenerate("qhull vertex is not an input point".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            facets.push(HullFacet { indices });
        }

        Self::from_facets(points, facets)
    }

    /// Triangulated hull from chull's exact arithmetic
    pub fn chull(points: &[DVec3]) -> Result<Self, EngineError> {
        let coords: Vec<Vec<f64>> = points.iter().map(|p| p.to_array().to_vec()).collect();
        let hull = ConvexHullWrapper::try_new(&coords, None)
            .map_err(|err| EngineError::Degenerate(err.to_string()))?;

        // chull renumbers the points it kept, preserving input order
        let (kept, triangles) = hull.vertices_indices();
        let original = match_kept_points(points, &kept)?;

        let facets = triangles
            .chunks_exact(3)
            .map(|triangle| HullFacet {
                indices: triangle.iter().map(|&i| original[i]).collect(),
            })
            .collect();

        Self::from_facets(points, facets)
    }

    fn from_facets(points: &[DVec3], facets: Vec<HullFacet>) -> Result<Self, EngineError> {
        check_all_on_hull(points.len(), &facets)?;
        let interior = points.iter().copied().sum::<DVec3>() / points.len() as f64;
        Ok(Self { facets, interior })
    }

    /// Outward unit normal of every facet
    pub fn facet_normals(&self, points: &[DVec3]) -> Vec<DVec3> {
        self.facets
            .iter()
            .map(|facet| facet.outward_normal(points, self.interior))
            .collect()
    }
}

/// Map points returned by chull back to input indices
///
/// Coordinates pass through a fixed-point conversion, so they are matched
/// within a few ulps rather than bit for bit.
fn match_kept_points(points: &[DVec3], kept: &[Vec<f64>]) -> Result<Vec<usize>, EngineError> {
    let mut cursor = 0;
    let mut original = Vec::with_capacity(kept.len());
    for coords in kept {
        let [x, y, z] = coords.as_slice() else {
            return Err(EngineError::Degenerate("chull returned a non-3D point".to_string()));
        };
        let target = DVec3::new(*x, *y, *z);

        let found = points[cursor..].iter().position(|p| {
            let tolerance = 4.0 * f64::EPSILON * p.abs().max_element().max(1.0);
            p.abs_diff_eq(target, tolerance)
        });
        let Some(offset) = found else {
            return Err(EngineError::Degenerate(format!("chull returned unknown point {target}")));
        };
        original.push(cursor + offset);
        cursor += offset + 1;
    }
    Ok(original)
}

fn check_all_on_hull(point_count: usize, facets: &[HullFacet]) -> Result<(), EngineError> {
    let mut on_hull = vec![false; point_count];
    for facet in facets {
        for &i in &facet.indices {
            on_hull[i] = true;
        }
    }
    match on_hull.iter().position(|&v| !v) {
        Some(index) => Err(EngineError::Degenerate(format!(
            "generator {index} is not a hull vertex"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_generator::generate_seeded;

    fn tetrahedron() -> Vec<DVec3> {
        let s = 1.0 / 3f64.sqrt();
        vec![
            DVec3::new(s, s, s),
            DVec3::new(s, -s, -s),
            DVec3::new(-s, s, -s),
            DVec3::new(-s, -s, s),
        ]
    }

    fn cube() -> Vec<DVec3> {
        let s = 1.0 / 3f64.sqrt();
        let mut corners = Vec::new();
        for x in [-s, s] {
            for y in [-s, s] {
                for z in [-s, s] {
                    corners.push(DVec3::new(x, y, z));
                }
            }
        }
        corners
    }

    fn backends(points: &[DVec3]) -> Vec<(&'static str, ConvexHull)> {
        vec![
            ("qhull", ConvexHull::qhull(points).unwrap()),
            ("chull", ConvexHull::chull(points).unwrap()),
        ]
    }

    /// Every facet is a supporting plane: all points lie on or below it
    fn assert_supporting_and_closed(points: &[DVec3], name: &str, hull: &ConvexHull) {
        // a closed hull with V vertices triangulates into 2V - 4 triangles
        let triangles: usize = hull.facets.iter().map(|f| f.indices.len() - 2).sum();
        assert_eq!(triangles, 2 * points.len() - 4, "{name}");

        for (facet, normal) in hull.facets.iter().zip(hull.facet_normals(points)) {
            let offset = normal.dot(points[facet.indices[0]]);
            assert!(offset > 0.0, "{name}: facet {:?} faces inward", facet.indices);
            for p in points {
                assert!(normal.dot(*p) <= offset + 1e-12, "{name}: point above facet {:?}", facet.indices);
            }
        }
    }

    #[test]
    fn test_hull_tetrahedron() {
        let points = tetrahedron();
        for (name, hull) in backends(&points) {
            assert_eq!(hull.facets.len(), 4, "{name}");
            assert_supporting_and_closed(&points, name, &hull);
        }
    }

    #[test]
    fn test_hull_random_sphere_points() {
        let points = generate_seeded(500);
        for (name, hull) in backends(&points) {
            assert_supporting_and_closed(&points, name, &hull);
        }
    }

    #[test]
    fn test_cube_faces_merged_by_qhull_only() {
        let points = cube();
        let qhull = ConvexHull::qhull(&points).unwrap();
        assert_eq!(qhull.facets.len(), 6);
        assert!(qhull.facets.iter().all(|f| f.indices.len() == 4));
        assert_supporting_and_closed(&points, "qhull", &qhull);

        let chull = ConvexHull::chull(&points).unwrap();
        assert_eq!(chull.facets.len(), 12);
        assert_supporting_and_closed(&points, "chull", &chull);
    }

    #[test]
    fn test_chull_indices_follow_input_order() {
        // scaled points go through chull's fixed-point conversion
        let points: Vec<DVec3> = generate_seeded(40).into_iter().map(|p| p * 7.5).collect();
        let hull = ConvexHull::chull(&points).unwrap();
        let mut seen: Vec<usize> = hull.facets.iter().flat_map(|f| f.indices.clone()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_coplanar_points_are_rejected() {
        let points = vec![DVec3::X, DVec3::Y, DVec3::NEG_X, DVec3::NEG_Y, DVec3::new(0.6, 0.8, 0.0)];
        assert!(matches!(ConvexHull::qhull(&points), Err(EngineError::Degenerate(_))));
        assert!(matches!(ConvexHull::chull(&points), Err(EngineError::Degenerate(_))));
    }

    #[test]
    fn test_interior_point_is_reported() {
        let mut points = tetrahedron();
        points.push(DVec3::ZERO);
        let err = ConvexHull::chull(&points).unwrap_err();
        assert_eq!(err, EngineError::Degenerate("generator 4 is not a hull vertex".to_string()));
    }
}
