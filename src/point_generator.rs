//! Deterministic uniform sampling of points on the unit sphere.
//!
//! Samples from an isotropic 3D standard normal are normalized to unit
//! length; rotational symmetry of the normal makes the result uniform on the
//! sphere. The RNG is always passed in (or created fresh from a seed), so
//! repeated runs produce identical generator sets.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::constants::DEFAULT_POINT_SEED;

/// Fresh RNG for one generation call
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generate `n` uniformly distributed points on the unit sphere using `rng`
pub fn generate_spherical_points<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<DVec3> {
    (0..n).map(|_| sample_unit_vector(rng)).collect()
}

/// Generate `n` points with the fixed default seed
///
/// Two calls with the same `n` return bit-identical point sets.
pub fn generate_seeded(n: usize) -> Vec<DVec3> {
    generate_spherical_points(n, &mut seeded_rng(DEFAULT_POINT_SEED))
}

fn sample_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    loop {
        let v = DVec3::new(
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        );
        let length = v.length();
        // zero-length samples cannot be normalized; redraw
        if length > 0.0 && length.is_finite() {
            return v / length;
        }
    }
}
