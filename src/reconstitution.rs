//! How much of the sphere's surface a Voronoi diagram accounts for.
//!
//! Summing the areas of every region of an exact partition should give back
//! `4πr²`; the shortfall or excess measures the engine's precision.

use crate::constants::UNIT_SPHERE_AREA;
use crate::point_generator::generate_seeded;
use crate::records::{ReconstitutionEntry, ReconstitutionRecord, save_record};
use crate::run_config::{ReconstitutionConfig, RunError, check_capabilities};
use crate::sphere_geometry::polygon_area_outcome;
use crate::voronoi::{EngineCapabilities, SphericalVoronoiEngine, VoronoiDiagram};

/// Summed region areas of one diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconstitution {
    pub total_area: f64,
    /// `total_area` as a percentage of `4πr²`
    pub percent: f64,
    pub degenerate_polygons: usize,
}

/// Sum the region areas of `diagram`; regions must already be in polygon order
pub fn reconstitute(diagram: &VoronoiDiagram) -> Reconstitution {
    let mut total_area = 0.0;
    let mut degenerate_polygons = 0;
    for i in 0..diagram.regions.len() {
        let outcome = polygon_area_outcome(&diagram.region_polygon(i), diagram.radius);
        if outcome.is_degenerate() {
            degenerate_polygons += 1;
        }
        total_area += outcome.area();
    }

    let theoretical = UNIT_SPHERE_AREA * diagram.radius * diagram.radius;
    Reconstitution {
        total_area,
        percent: total_area / theoretical * 100.0,
        degenerate_polygons,
    }
}

/// Percentage of the sphere's area recovered from `diagram`
pub fn reconstitution_percentage(diagram: &VoronoiDiagram) -> f64 {
    reconstitute(diagram).percent
}

/// Capabilities an engine needs for its areas to be summed
pub fn required_capabilities() -> EngineCapabilities {
    EngineCapabilities::all()
}

/// Reconstituted area percentage across a log-spaced sweep of generator counts
pub fn percent_surface_area_analysis(
    engine: &dyn SphericalVoronoiEngine,
    config: &ReconstitutionConfig,
) -> Result<ReconstitutionRecord, RunError> {
    check_capabilities(engine, required_capabilities())?;

    let counts = config.generator_counts();
    if counts.is_empty() {
        return Err(RunError::EmptySweep {
            max_generators: config.max_generators,
            num_tests: config.num_tests,
        });
    }

    let mut entries = Vec::with_capacity(counts.len());
    for generator_count in counts {
        tracing::info!(generator_count, engine = engine.name(), "running surface area reconstitution");

        let generators: Vec<_> = generate_seeded(generator_count)
            .into_iter()
            .map(|p| p * config.radius)
            .collect();
        let mut diagram = engine.compute(&generators, config.radius)?;
        diagram.sort_vertices_of_regions();

        let result = reconstitute(&diagram);
        tracing::debug!(
            generator_count,
            percent = result.percent,
            degenerate = result.degenerate_polygons,
            "reconstitution trial done"
        );

        entries.push(ReconstitutionEntry {
            generator_count,
            percent_reconstituted: result.percent,
            degenerate_polygons: result.degenerate_polygons,
        });
    }

    Ok(ReconstitutionRecord::new(engine.name(), config.radius, entries))
}

/// Run the analysis and write the record to `config.output_path`
///
/// Nothing is written when the engine is rejected or a trial fails.
pub fn run_reconstitution(
    engine: &dyn SphericalVoronoiEngine,
    config: &ReconstitutionConfig,
) -> Result<ReconstitutionRecord, RunError> {
    let record = percent_surface_area_analysis(engine, config)?;
    save_record(&record, &config.output_path)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::QhullEngine;
    use approx::assert_abs_diff_eq;
    use glam::DVec3;
    use std::f64::consts::PI;

    #[test]
    fn test_cube_generators_cover_sphere() {
        let generators: Vec<DVec3> = [
            DVec3::X,
            DVec3::NEG_X,
            DVec3::Y,
            DVec3::NEG_Y,
            DVec3::Z,
            DVec3::NEG_Z,
        ]
        .to_vec();
        let mut diagram = QhullEngine.compute(&generators, 1.0).unwrap();
        diagram.sort_vertices_of_regions();

        let result = reconstitute(&diagram);
        assert_abs_diff_eq!(result.total_area, 4.0 * PI, epsilon = 1e-9);
        assert_abs_diff_eq!(result.percent, 100.0, epsilon = 1e-7);
        assert_eq!(result.degenerate_polygons, 0);
    }

    #[test]
    fn test_analysis_sweep_on_larger_sphere() {
        let config = ReconstitutionConfig {
            max_generators: 1000,
            num_tests: 3,
            radius: 2.0,
            ..Default::default()
        };
        let record = percent_surface_area_analysis(&QhullEngine, &config).unwrap();

        assert_eq!(record.engine(), "qhull");
        assert_eq!(record.radius(), 2.0);
        assert_eq!(record.generator_counts(), vec![10, 100, 1000]);
        for entry in record.entries() {
            assert_abs_diff_eq!(entry.percent_reconstituted, 100.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_empty_sweep_is_an_error() {
        let config = ReconstitutionConfig {
            num_tests: 0,
            ..Default::default()
        };
        let err = percent_surface_area_analysis(&QhullEngine, &config).unwrap_err();
        assert!(matches!(err, RunError::EmptySweep { .. }));
    }
}
