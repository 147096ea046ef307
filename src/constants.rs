use std::f64::consts::PI;

// Point generation
pub const DEFAULT_POINT_SEED: u64 = 123;

// Spherical polygon area
pub const DEGENERATE_VERTEX_DISTANCE: f64 = 1e-7; // min pairwise distance on the unit sphere
pub const DEGENERATE_POLYGON_AREA: f64 = 1e-8; // sentinel area for degenerate polygons
pub const UNIT_SPHERE_AREA: f64 = 4.0 * PI;

// Voronoi engines
pub const MIN_GENERATORS: usize = 4;
pub const DUPLICATE_GENERATOR_DISTANCE: f64 = 1e-10;
pub const VERTEX_MERGE_DISTANCE: f64 = 1e-10; // unit-sphere distance at which circumcentres are one vertex

// Generator count sweeps (log10 of the first count, as in 10^1)
pub const MIN_GENERATOR_COUNT: usize = 10;

// Scaling-law fitting
pub const FIT_SAMPLE_COUNT: usize = 250;
pub const FIT_EXTRAPOLATE_BY: f64 = 1e7;

// Run presets
pub const LEGACY_BENCH_MAX_GENERATORS: usize = 90_000;
pub const CURRENT_BENCH_MAX_GENERATORS: usize = 1_000_000;
pub const BENCH_NUM_TESTS: usize = 5;
pub const BENCH_REPEATS: usize = 5;
pub const RECONSTITUTION_MAX_GENERATORS: usize = 10_000_000;
pub const RECONSTITUTION_NUM_TESTS: usize = 40;

pub const LEGACY_BENCH_FILE: &str = "bench_legacy.json";
pub const CURRENT_BENCH_FILE: &str = "bench_current.json";
pub const RECONSTITUTION_FILE: &str = "area_current.json";
pub const TIME_COMPLEXITY_FILE: &str = "time_complexity.json";
