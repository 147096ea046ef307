//! Run configuration for the benchmark, reconstitution and fitting scripts.
//!
//! Every config has a preset matching the published runs; a JSON file can
//! override any subset of fields.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BENCH_NUM_TESTS, BENCH_REPEATS, CURRENT_BENCH_FILE, CURRENT_BENCH_MAX_GENERATORS, FIT_EXTRAPOLATE_BY,
    FIT_SAMPLE_COUNT, LEGACY_BENCH_FILE, LEGACY_BENCH_MAX_GENERATORS, MIN_GENERATOR_COUNT,
    RECONSTITUTION_FILE, RECONSTITUTION_MAX_GENERATORS, RECONSTITUTION_NUM_TESTS, TIME_COMPLEXITY_FILE,
};
use crate::least_squares::FitError;
use crate::math_utils::{linspace, logspace};
use crate::records::{RecordError, load_record};
use crate::voronoi::{EngineCapabilities, EngineError, EngineKind, SphericalVoronoiEngine};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("engine {engine} does not support: {}", missing.join(", "))]
    UnsupportedEngine { engine: String, missing: Vec<&'static str> },
    #[error("generator sweep is empty (max {max_generators}, {num_tests} tests)")]
    EmptySweep { max_generators: usize, num_tests: usize },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// How generator counts are spread between the minimum and maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    #[default]
    Log,
    Linear,
}

/// `num` generator counts from `min` to `max`, truncated to integers,
/// ascending and without repeats
pub fn generator_counts(spacing: Spacing, min: usize, max: usize, num: usize) -> Vec<usize> {
    if num == 0 || max < min {
        return Vec::new();
    }

    let values = match spacing {
        Spacing::Log => logspace((min as f64).log10(), (max as f64).log10(), num),
        Spacing::Linear => linspace(min as f64, max as f64, num),
    };

    // 10^log10(n) can land a hair below n
    let mut counts: Vec<usize> = values.into_iter().map(|v| (v * (1.0 + 1e-12)) as usize).collect();
    counts.sort_unstable();
    counts.dedup();
    counts
}

/// A timing sweep of one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub engine: EngineKind,
    pub max_generators: usize,
    pub num_tests: usize,
    pub repeats: usize,
    pub spacing: Spacing,
    pub output_path: PathBuf,
}

impl BenchmarkConfig {
    /// Sweep of the quadratic engine, kept small
    pub fn legacy() -> Self {
        Self {
            engine: EngineKind::Chull,
            max_generators: LEGACY_BENCH_MAX_GENERATORS,
            num_tests: BENCH_NUM_TESTS,
            repeats: BENCH_REPEATS,
            spacing: Spacing::Log,
            output_path: PathBuf::from(LEGACY_BENCH_FILE),
        }
    }

    pub fn current() -> Self {
        Self {
            engine: EngineKind::Qhull,
            max_generators: CURRENT_BENCH_MAX_GENERATORS,
            output_path: PathBuf::from(CURRENT_BENCH_FILE),
            ..Self::legacy()
        }
    }

    pub fn generator_counts(&self) -> Vec<usize> {
        generator_counts(self.spacing, MIN_GENERATOR_COUNT, self.max_generators, self.num_tests)
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::current()
    }
}

/// The set of sweeps run by one benchmark invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkPlan {
    pub runs: Vec<BenchmarkConfig>,
}

impl Default for BenchmarkPlan {
    fn default() -> Self {
        Self {
            runs: vec![BenchmarkConfig::legacy(), BenchmarkConfig::current()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstitutionConfig {
    pub engine: EngineKind,
    pub max_generators: usize,
    pub num_tests: usize,
    pub radius: f64,
    pub output_path: PathBuf,
}

impl ReconstitutionConfig {
    pub fn generator_counts(&self) -> Vec<usize> {
        generator_counts(Spacing::Log, MIN_GENERATOR_COUNT, self.max_generators, self.num_tests)
    }
}

impl Default for ReconstitutionConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Qhull,
            max_generators: RECONSTITUTION_MAX_GENERATORS,
            num_tests: RECONSTITUTION_NUM_TESTS,
            radius: 1.0,
            output_path: PathBuf::from(RECONSTITUTION_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Benchmark record to fit
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub sample_count: usize,
    pub extrapolate_by: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(CURRENT_BENCH_FILE),
            output_path: PathBuf::from(TIME_COMPLEXITY_FILE),
            sample_count: FIT_SAMPLE_COUNT,
            extrapolate_by: FIT_EXTRAPOLATE_BY,
        }
    }
}

/// Read a config from JSON; missing fields take their preset values
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, RecordError> {
    load_record(path)
}

/// Load the config at `path`, or the preset when no path is given
pub fn config_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, RecordError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(T::default()),
    }
}

/// Fail unless `engine` offers every capability in `required`
pub fn check_capabilities(engine: &dyn SphericalVoronoiEngine, required: EngineCapabilities) -> Result<(), RunError> {
    let missing = required.missing_from(&engine.capabilities());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RunError::UnsupportedEngine {
            engine: engine.name().to_string(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::{QhullEngine, VoronoiDiagram};
    use glam::DVec3;

    #[test]
    fn test_log_counts() {
        assert_eq!(generator_counts(Spacing::Log, 10, 1000, 3), vec![10, 100, 1000]);
        assert_eq!(generator_counts(Spacing::Log, 10, 1_000_000, 6), vec![10, 100, 1000, 10_000, 100_000, 1_000_000]);
    }

    #[test]
    fn test_log_counts_drop_repeats() {
        // 40 log-spaced values between 10 and 30 collapse to far fewer integers
        let counts = generator_counts(Spacing::Log, 10, 30, 40);
        assert_eq!(counts.first(), Some(&10));
        assert_eq!(counts.last(), Some(&30));
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
        assert!(counts.len() <= 21);
    }

    #[test]
    fn test_linear_counts() {
        assert_eq!(generator_counts(Spacing::Linear, 10, 50, 5), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_empty_sweeps() {
        assert!(generator_counts(Spacing::Log, 10, 1000, 0).is_empty());
        assert!(generator_counts(Spacing::Linear, 10, 5, 3).is_empty());
    }

    #[test]
    fn test_presets() {
        let legacy = BenchmarkConfig::legacy();
        assert_eq!(legacy.engine, EngineKind::Chull);
        assert_eq!(legacy.max_generators, 90_000);
        assert_eq!(legacy.generator_counts().last(), Some(&90_000));

        let current = BenchmarkConfig::current();
        assert_eq!(current.engine, EngineKind::Qhull);
        assert_eq!(current.generator_counts(), vec![10, 177, 3162, 56_234, 1_000_000]);

        assert_eq!(BenchmarkPlan::default().runs.len(), 2);
        assert_eq!(ReconstitutionConfig::default().num_tests, 40);
        assert_eq!(FitConfig::default().sample_count, 250);
    }

    #[test]
    fn test_partial_config_file_keeps_presets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reconstitution.json");
        std::fs::write(&path, r#"{"max_generators": 500, "radius": 2.5}"#).unwrap();

        let config: ReconstitutionConfig = config_or_default(Some(&path)).unwrap();
        assert_eq!(config.max_generators, 500);
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.num_tests, RECONSTITUTION_NUM_TESTS);
        assert_eq!(config.engine, EngineKind::Qhull);

        let plan: BenchmarkPlan = config_or_default(None).unwrap();
        assert_eq!(plan, BenchmarkPlan::default());
    }

    struct PartitionOnly;

    impl SphericalVoronoiEngine for PartitionOnly {
        fn name(&self) -> &str {
            "partition-only"
        }

        fn capabilities(&self) -> EngineCapabilities {
            EngineCapabilities {
                partition: true,
                ..Default::default()
            }
        }

        fn compute(&self, generators: &[DVec3], radius: f64) -> Result<VoronoiDiagram, EngineError> {
            QhullEngine.compute(generators, radius)
        }
    }

    #[test]
    fn test_capability_check() {
        assert!(check_capabilities(&QhullEngine, EngineCapabilities::all()).is_ok());

        let err = check_capabilities(&PartitionOnly, EngineCapabilities::all()).unwrap_err();
        match err {
            RunError::UnsupportedEngine { engine, missing } => {
                assert_eq!(engine, "partition-only");
                assert_eq!(missing, vec!["region_sorting", "exact_coverage"]);
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
