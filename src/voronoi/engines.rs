use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{ConvexHull, EngineCapabilities, EngineError, SphericalVoronoiEngine, VoronoiDiagram, close_pairs};
use crate::constants::{DUPLICATE_GENERATOR_DISTANCE, MIN_GENERATORS};

/// Engines selectable from a run configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Exact-arithmetic hull from chull (the older implementation)
    Chull,
    /// Floating-point hull from qhull (the current implementation)
    Qhull,
}

impl EngineKind {
    pub fn build(self) -> Box<dyn SphericalVoronoiEngine> {
        match self {
            EngineKind::Chull => Box::new(ChullEngine),
            EngineKind::Qhull => Box::new(QhullEngine),
        }
    }
}

/// Voronoi regions from chull's big-integer quickhull
#[derive(Debug, Clone, Copy, Default)]
pub struct ChullEngine;

impl SphericalVoronoiEngine for ChullEngine {
    fn name(&self) -> &str {
        "chull"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::all()
    }

    fn compute(&self, generators: &[DVec3], radius: f64) -> Result<VoronoiDiagram, EngineError> {
        validate_generators(generators)?;
        let hull = ConvexHull::chull(generators)?;
        Ok(VoronoiDiagram::from_hull(generators, &hull, radius))
    }
}

/// Voronoi regions from qhull
#[derive(Debug, Clone, Copy, Default)]
pub struct QhullEngine;

impl SphericalVoronoiEngine for QhullEngine {
    fn name(&self) -> &str {
        "qhull"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::all()
    }

    fn compute(&self, generators: &[DVec3], radius: f64) -> Result<VoronoiDiagram, EngineError> {
        validate_generators(generators)?;
        let hull = ConvexHull::qhull(generators)?;
        Ok(VoronoiDiagram::from_hull(generators, &hull, radius))
    }
}

fn validate_generators(generators: &[DVec3]) -> Result<(), EngineError> {
    if generators.len() < MIN_GENERATORS {
        return Err(EngineError::TooFewGenerators {
            required: MIN_GENERATORS,
            actual: generators.len(),
        });
    }

    if let Some(index) = generators.iter().position(|p| !p.is_finite()) {
        return Err(EngineError::NonFinite { index });
    }

    // report the duplicate that appears earliest in the input
    let duplicate = close_pairs(generators, DUPLICATE_GENERATOR_DISTANCE)
        .into_iter()
        .min_by_key(|&(original, index)| (index, original));
    match duplicate {
        Some((original, index)) => Err(EngineError::DuplicateGenerator { index, original }),
        None => Ok(()),
    }
}
