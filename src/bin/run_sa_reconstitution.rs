//! Percentage of the sphere's surface recovered by summing Voronoi region
//! areas, over a log-spaced sweep of generator counts.
//!
//! Usage: `run_sa_reconstitution [config.json]`

use std::path::PathBuf;

use sv_bench::logging::init_tracing;
use sv_bench::reconstitution::run_reconstitution;
use sv_bench::report::print_reconstitution;
use sv_bench::run_config::{ReconstitutionConfig, RunError, config_or_default};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config: ReconstitutionConfig = config_or_default(config_path.as_deref())?;
    let engine = config.engine.build();

    match run_reconstitution(engine.as_ref(), &config) {
        Ok(record) => {
            print_reconstitution(&record);
            println!("Wrote {}", config.output_path.display());
            Ok(())
        }
        Err(RunError::UnsupportedEngine { engine, missing }) => {
            println!("Engine {engine} cannot be used for the surface area analysis: missing {}", missing.join(", "));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
