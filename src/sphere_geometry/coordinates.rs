use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Unit used for the two angular components of a [`SphericalCoord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// Spherical polar coordinates of a single point
///
/// `theta` is the azimuth measured in the x-y plane from +x,
/// `phi` is the polar angle measured from +z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalCoord {
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
}

impl SphericalCoord {
    pub fn new(r: f64, theta: f64, phi: f64) -> Self {
        Self { r, theta, phi }
    }

    /// Convert a Cartesian point; the polar angle is NaN for the origin
    pub fn from_cartesian(point: DVec3, unit: AngleUnit) -> Self {
        let xy = point.x * point.x + point.y * point.y;
        let r = (xy + point.z * point.z).sqrt();
        let theta = point.y.atan2(point.x);
        let phi = (point.z / r).acos();

        match unit {
            AngleUnit::Radians => Self { r, theta, phi },
            AngleUnit::Degrees => Self {
                r,
                theta: theta.to_degrees(),
                phi: phi.to_degrees(),
            },
        }
    }

    /// Convert back to Cartesian, reading the angles in `unit`
    pub fn to_cartesian(&self, unit: AngleUnit) -> DVec3 {
        let (theta, phi) = match unit {
            AngleUnit::Radians => (self.theta, self.phi),
            AngleUnit::Degrees => (self.theta.to_radians(), self.phi.to_radians()),
        };
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();

        DVec3::new(
            self.r * cos_theta * sin_phi,
            self.r * sin_theta * sin_phi,
            self.r * cos_phi,
        )
    }

    /// Same direction, radius forced to 1.0
    pub fn on_unit_sphere(self) -> Self {
        Self { r: 1.0, ..self }
    }
}

/// Convert a set of Cartesian points to spherical coordinates, element-wise
pub fn to_spherical(points: &[DVec3], unit: AngleUnit) -> Vec<SphericalCoord> {
    points
        .iter()
        .map(|&p| SphericalCoord::from_cartesian(p, unit))
        .collect()
}

/// Convert a set of spherical coordinates to Cartesian points, element-wise
pub fn to_cartesian(coords: &[SphericalCoord], unit: AngleUnit) -> Vec<DVec3> {
    coords.iter().map(|c| c.to_cartesian(unit)).collect()
}
