use std::time::Instant;

use crate::math_utils::{mean, population_std};
use crate::point_generator::generate_seeded;
use crate::records::{BenchmarkRecord, TimingEntry, save_record};
use crate::run_config::{BenchmarkConfig, RunError, check_capabilities};
use crate::voronoi::{EngineCapabilities, SphericalVoronoiEngine};

/// Time diagram construction over the configured sweep of generator counts.
///
/// Points are generated once per count and reused for every repeat; only
/// `compute` is timed. Repeats run one after another.
pub fn benchmark_engine(engine: &dyn SphericalVoronoiEngine, config: &BenchmarkConfig) -> Result<BenchmarkRecord, RunError> {
    let required = EngineCapabilities {
        partition: true,
        ..Default::default()
    };
    check_capabilities(engine, required)?;

    let counts = config.generator_counts();
    if counts.is_empty() || config.repeats == 0 {
        return Err(RunError::EmptySweep {
            max_generators: config.max_generators,
            num_tests: config.num_tests,
        });
    }

    let mut entries = Vec::with_capacity(counts.len());
    for generator_count in counts {
        tracing::info!(generator_count, engine = engine.name(), "running benchmark");
        let generators = generate_seeded(generator_count);

        let mut seconds = Vec::with_capacity(config.repeats);
        for trial in 0..config.repeats {
            let start = Instant::now();
            engine.compute(&generators, 1.0)?;
            let elapsed = start.elapsed().as_secs_f64();
            tracing::debug!(generator_count, trial, elapsed, "trial timed");
            seconds.push(elapsed);
        }

        entries.push(TimingEntry {
            generator_count,
            mean_seconds: mean(&seconds),
            std_seconds: population_std(&seconds),
            repeats: config.repeats,
        });
    }

    Ok(BenchmarkRecord::new(engine.name(), entries))
}

/// Benchmark and write the record to `config.output_path`
pub fn run_benchmark(engine: &dyn SphericalVoronoiEngine, config: &BenchmarkConfig) -> Result<BenchmarkRecord, RunError> {
    let record = benchmark_engine(engine, config)?;
    save_record(&record, &config.output_path)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_config::Spacing;
    use crate::voronoi::EngineKind;
    use more_asserts::{assert_ge, assert_gt};

    fn small_config(engine: EngineKind, spacing: Spacing) -> BenchmarkConfig {
        BenchmarkConfig {
            engine,
            max_generators: 200,
            num_tests: 3,
            repeats: 2,
            spacing,
            output_path: "unused.json".into(),
        }
    }

    #[test]
    fn test_log_sweep_entries() {
        let config = small_config(EngineKind::Qhull, Spacing::Log);
        let record = benchmark_engine(EngineKind::Qhull.build().as_ref(), &config).unwrap();

        assert_eq!(record.engine(), "qhull");
        assert_eq!(record.generator_counts(), vec![10.0, 44.0, 200.0]);
        for entry in record.entries() {
            assert_eq!(entry.repeats, 2);
            assert_gt!(entry.mean_seconds, 0.0);
            assert_ge!(entry.std_seconds, 0.0);
        }
    }

    #[test]
    fn test_linear_sweep_with_chull_engine() {
        let config = small_config(EngineKind::Chull, Spacing::Linear);
        let record = benchmark_engine(EngineKind::Chull.build().as_ref(), &config).unwrap();
        assert_eq!(record.generator_counts(), vec![10.0, 105.0, 200.0]);
    }

    #[test]
    fn test_zero_repeats_is_an_error() {
        let config = BenchmarkConfig {
            repeats: 0,
            ..small_config(EngineKind::Qhull, Spacing::Log)
        };
        let err = benchmark_engine(EngineKind::Qhull.build().as_ref(), &config).unwrap_err();
        assert!(matches!(err, RunError::EmptySweep { .. }));
    }
}
