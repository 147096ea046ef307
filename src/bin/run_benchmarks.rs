//! Time every configured engine over its generator sweep and write one
//! benchmark record per engine.
//!
//! Usage: `run_benchmarks [plan.json]`

use std::path::PathBuf;

use sv_bench::logging::init_tracing;
use sv_bench::records::BenchmarkRecord;
use sv_bench::report::{print_benchmark, print_comparison};
use sv_bench::run_config::{BenchmarkPlan, RunError, config_or_default};
use sv_bench::timing_benchmark::run_benchmark;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let plan: BenchmarkPlan = config_or_default(config_path.as_deref())?;

    let mut records: Vec<BenchmarkRecord> = Vec::new();
    for config in &plan.runs {
        let engine = config.engine.build();
        println!(
            "Benchmarking {} up to {} generators ({} counts, {} repeats)",
            engine.name(),
            config.max_generators,
            config.num_tests,
            config.repeats
        );

        match run_benchmark(engine.as_ref(), config) {
            Ok(record) => {
                print_benchmark(&record);
                println!("Wrote {}", config.output_path.display());
                records.push(record);
            }
            Err(RunError::UnsupportedEngine { engine, missing }) => {
                println!("Skipping {engine}: missing {}", missing.join(", "));
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let [baseline, candidate] = records.as_slice() {
        print_comparison(baseline, candidate);
    }

    Ok(())
}
