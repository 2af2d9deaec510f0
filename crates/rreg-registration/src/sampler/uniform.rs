//! Seeded uniform random sampler.

use super::trait_::Sampler;
use crate::error::{RegistrationError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rreg_core::domain::BoxDomain;
use rreg_core::spatial::Point;

/// Draws independent uniform points from the domain's bounding box.
///
/// The random source is an explicit seed, not ambient state: every call to
/// [`Sampler::samples`] re-seeds and therefore returns the same point set,
/// which keeps a metric's value and derivative consistent with each other.
/// Every sample carries the uniform weight `1/N`.
#[derive(Debug, Clone, Copy)]
pub struct UniformSampler {
    count: usize,
    seed: u64,
}

impl UniformSampler {
    /// Create a uniform sampler drawing `count` points from the given seed.
    ///
    /// Fails if `count` is zero.
    pub fn new(count: usize, seed: u64) -> Result<Self> {
        if count == 0 {
            return Err(RegistrationError::InvalidSampleCount(count));
        }
        Ok(Self { count, seed })
    }
}

impl<const D: usize> Sampler<D> for UniformSampler {
    fn samples(&self, domain: &BoxDomain<D>) -> Result<Vec<(Point<D>, f64)>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let weight = 1.0 / self.count as f64;
        let origin = domain.origin();
        let extent = domain.extent();

        let samples = (0..self.count)
            .map(|_| {
                let mut point = origin;
                for k in 0..D {
                    point[k] = origin[k] + rng.gen::<f64>() * extent[k];
                }
                (point, weight)
            })
            .collect();
        Ok(samples)
    }
}
