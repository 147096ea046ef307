pub mod constants;
pub mod logging;
pub mod math_utils;
pub mod sphere_geometry;
pub mod point_generator;
pub mod voronoi;
pub mod least_squares;
pub mod scaling_fit;
pub mod records;
pub mod run_config;
pub mod reconstitution;
pub mod timing_benchmark;
pub mod report;
