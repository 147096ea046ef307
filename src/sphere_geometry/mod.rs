//! Geometry on the surface of a sphere: coordinate conversion, great-circle
//! distance, and spherical polygon area.

pub mod coordinates;
pub mod haversine;
pub mod polygon_area;

pub use coordinates::{AngleUnit, SphericalCoord, to_cartesian, to_spherical};
pub use haversine::haversine_distance;
pub use polygon_area::{DegenerateReason, PolygonArea, polygon_area_outcome, spherical_polygon_area};
