//! Fit n log n, linear and quadratic scaling laws to a benchmark record.
//!
//! Usage: `run_time_complexity [config.json]`

use std::path::PathBuf;

use sv_bench::logging::init_tracing;
use sv_bench::report::print_fit;
use sv_bench::run_config::{FitConfig, config_or_default};
use sv_bench::scaling_fit::run_time_complexity;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config: FitConfig = config_or_default(config_path.as_deref())?;

    println!("Fitting {}", config.input_path.display());
    let record = run_time_complexity(&config)?;
    print_fit(&record);
    println!("Wrote {}", config.output_path.display());
    Ok(())
}
