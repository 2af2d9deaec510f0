//! Deterministic grid sampler.

use super::trait_::Sampler;
use crate::error::{RegistrationError, Result};
use rreg_core::domain::BoxDomain;
use rreg_core::spatial::Point;

/// Samples the cross-product of evenly spaced coordinates along each axis.
///
/// Endpoints are included; an axis with a single requested point samples
/// the axis center. Every sample carries the uniform weight `1/N`.
#[derive(Debug, Clone, Copy)]
pub struct GridSampler<const D: usize> {
    points_per_axis: [usize; D],
}

impl<const D: usize> GridSampler<D> {
    /// Create a grid sampler with the given per-axis point counts.
    ///
    /// Fails if any axis count is zero.
    pub fn new(points_per_axis: [usize; D]) -> Result<Self> {
        for &n in &points_per_axis {
            if n == 0 {
                return Err(RegistrationError::InvalidSampleCount(n));
            }
        }
        Ok(Self { points_per_axis })
    }
}

impl<const D: usize> Sampler<D> for GridSampler<D> {
    fn samples(&self, domain: &BoxDomain<D>) -> Result<Vec<(Point<D>, f64)>> {
        let total: usize = self.points_per_axis.iter().product();
        let weight = 1.0 / total as f64;
        let origin = domain.origin();
        let extent = domain.extent();

        let mut samples = Vec::with_capacity(total);
        for flat in 0..total {
            let mut remainder = flat;
            let mut point = origin;
            for k in 0..D {
                let n = self.points_per_axis[k];
                let i = remainder % n;
                remainder /= n;
                point[k] = if n == 1 {
                    origin[k] + extent[k] * 0.5
                } else {
                    origin[k] + extent[k] * i as f64 / (n - 1) as f64
                };
            }
            samples.push((point, weight));
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rreg_core::spatial::{Point2, Vector2};

    #[test]
    fn test_grid_count_and_weights() {
        let domain = BoxDomain::new(Point2::origin(), Vector2::new([10.0, 10.0]));
        let sampler = GridSampler::new([3, 5]).unwrap();
        let samples = sampler.samples(&domain).unwrap();
        assert_eq!(samples.len(), 15);
        let total_weight: f64 = samples.iter().map(|(_, w)| w).sum();
        assert!((total_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_covers_endpoints() {
        let domain = BoxDomain::new(Point2::new([1.0, 2.0]), Vector2::new([4.0, 6.0]));
        let sampler = GridSampler::new([2, 2]).unwrap();
        let samples = sampler.samples(&domain).unwrap();
        let points: Vec<_> = samples.iter().map(|(p, _)| *p).collect();
        assert!(points.contains(&Point2::new([1.0, 2.0])));
        assert!(points.contains(&Point2::new([5.0, 8.0])));
    }

    #[test]
    fn test_single_point_axis_samples_center() {
        let domain = BoxDomain::new(Point2::origin(), Vector2::new([10.0, 4.0]));
        let sampler = GridSampler::new([1, 1]).unwrap();
        let samples = sampler.samples(&domain).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].0, Point2::new([5.0, 2.0]));
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert!(matches!(
            GridSampler::<2>::new([0, 3]),
            Err(RegistrationError::InvalidSampleCount(0))
        ));
    }
}
