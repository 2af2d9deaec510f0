//! Sampler trait for selecting metric evaluation points.

use crate::error::Result;
use rreg_core::domain::BoxDomain;
use rreg_core::spatial::Point;

/// A strategy for selecting evaluation points over a spatial domain.
///
/// Samplers produce an ordered sequence of `(point, weight)` pairs used by
/// metrics to approximate integrals over the domain. Weights sum to one.
/// A sampler instance is deterministic: repeated calls return the same
/// point set, so a metric's `value` and `derivative` see one sample
/// population.
pub trait Sampler<const D: usize> {
    /// Produce the sample points and weights for a domain.
    fn samples(&self, domain: &BoxDomain<D>) -> Result<Vec<(Point<D>, f64)>>;
}
