//! Mean Huber-loss metric.

use super::trait_::{utils, Metric};
use crate::error::Result;
use crate::sampler::Sampler;
use nalgebra::DVector;
use rreg_core::domain::BoxDomain;
use rreg_core::field::{DifferentiableField, Field};
use rreg_core::transform::TransformationSpace;

/// Mean Huber-loss metric.
///
/// Applies the Huber loss to the per-sample intensity difference:
/// quadratic (`r^2 / 2`) within `delta` of zero, linear
/// (`delta * (|r| - delta/2)`) beyond. Large sparse intensity
/// discrepancies therefore contribute linearly instead of quadratically,
/// making the metric robust to outliers. The derivative clips the residual
/// to `[-delta, delta]`.
pub struct HuberMetric<F, M, S, Sa, const D: usize> {
    fixed: F,
    moving: M,
    domain: BoxDomain<D>,
    space: S,
    sampler: Sa,
    delta: f64,
}

impl<F, M, S, Sa, const D: usize> HuberMetric<F, M, S, Sa, D>
where
    F: Field<D> + Sync,
    M: DifferentiableField<D> + Sync,
    S: TransformationSpace<D> + Sync,
    S::Transform: Sync,
    Sa: Sampler<D>,
{
    /// Create a new Huber metric with the given outlier threshold.
    pub fn new(fixed: F, moving: M, domain: BoxDomain<D>, space: S, sampler: Sa, delta: f64) -> Self {
        assert!(delta > 0.0, "Huber threshold must be positive");
        Self {
            fixed,
            moving,
            domain,
            space,
            sampler,
            delta,
        }
    }

    /// The outlier threshold.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    fn loss(&self, residual: f64) -> f64 {
        if residual.abs() <= self.delta {
            0.5 * residual * residual
        } else {
            self.delta * (residual.abs() - 0.5 * self.delta)
        }
    }

    fn loss_derivative(&self, residual: f64) -> f64 {
        residual.clamp(-self.delta, self.delta)
    }
}

impl<F, M, S, Sa, const D: usize> Metric for HuberMetric<F, M, S, Sa, D>
where
    F: Field<D> + Sync,
    M: DifferentiableField<D> + Sync,
    S: TransformationSpace<D> + Sync,
    S::Transform: Sync,
    Sa: Sampler<D>,
{
    fn value(&self, parameters: &DVector<f64>) -> Result<f64> {
        let terms = utils::value_terms(
            &self.fixed,
            &self.moving,
            &self.domain,
            &self.space,
            &self.sampler,
            parameters,
        )?;
        let value = terms
            .iter()
            .map(|t| t.weight * self.loss(t.moving - t.fixed))
            .sum();
        Ok(value)
    }

    fn derivative(&self, parameters: &DVector<f64>) -> Result<DVector<f64>> {
        let terms = utils::gradient_terms(
            &self.fixed,
            &self.moving,
            &self.domain,
            &self.space,
            &self.sampler,
            parameters,
        )?;
        let mut gradient = DVector::zeros(parameters.len());
        for t in &terms {
            let slope = self.loss_derivative(t.moving - t.fixed);
            gradient.axpy(t.weight * slope, &t.moving_derivative, 1.0);
        }
        Ok(gradient)
    }

    fn name(&self) -> &'static str {
        "MeanHuberLoss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::GridSampler;
    use rreg_core::image::{DiscreteImage, LinearImage};
    use rreg_core::spatial::{Point2, Vector2};
    use rreg_core::transform::TranslationSpace;
    use rreg_core::BoxDomain;

    fn ramp_image(size: usize) -> LinearImage<2> {
        let mut data = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                data.push((2 * x) as f64 + y as f64);
            }
        }
        let image = DiscreteImage::new(
            data,
            [size, size],
            Point2::origin(),
            Vector2::new([1.0, 1.0]),
        )
        .unwrap();
        LinearImage::new(image)
    }

    fn interior_metric(
        delta: f64,
    ) -> HuberMetric<LinearImage<2>, LinearImage<2>, TranslationSpace<2>, GridSampler<2>, 2> {
        let fixed = ramp_image(10);
        let moving = ramp_image(10);
        let domain = BoxDomain::new(Point2::new([2.0, 2.0]), Vector2::new([5.0, 5.0]));
        HuberMetric::new(
            fixed,
            moving,
            domain,
            TranslationSpace::<2>::new(),
            GridSampler::new([6, 6]).unwrap(),
            delta,
        )
    }

    #[test]
    fn test_huber_zero_for_identical_images() {
        let metric = interior_metric(1.0);
        let value = metric.value(&DVector::zeros(2)).unwrap();
        assert!(value < 1e-12, "expected 0, got {}", value);
    }

    #[test]
    fn test_quadratic_region_matches_half_mean_squares() {
        // Residuals stay below delta, so the loss is exactly r^2 / 2.
        let metric = interior_metric(100.0);
        let p = DVector::from_vec(vec![0.4, -0.3]);
        let huber = metric.value(&p).unwrap();

        let mse_metric = crate::metric::MeanSquaresMetric::new(
            ramp_image(10),
            ramp_image(10),
            BoxDomain::new(Point2::new([2.0, 2.0]), Vector2::new([5.0, 5.0])),
            TranslationSpace::<2>::new(),
            GridSampler::new([6, 6]).unwrap(),
        );
        let mse = crate::metric::Metric::value(&mse_metric, &p).unwrap();
        assert!(
            (huber - 0.5 * mse).abs() < 1e-10,
            "huber {} vs mse/2 {}",
            huber,
            0.5 * mse
        );
    }

    #[test]
    fn test_linear_region_clips_derivative() {
        // With a tiny delta the residuals sit in the linear region and the
        // per-sample slope magnitude is capped at delta.
        let metric = interior_metric(0.05);
        let p = DVector::from_vec(vec![0.5, 0.5]);
        let big_delta = interior_metric(1000.0);
        let clipped = metric.derivative(&p).unwrap();
        let unclipped = big_delta.derivative(&p).unwrap();
        assert!(clipped.norm() < unclipped.norm());
    }

    #[test]
    fn test_derivative_matches_finite_differences() {
        let metric = interior_metric(1.0);
        let p = DVector::from_vec(vec![0.6, -0.4]);
        let analytic = metric.derivative(&p).unwrap();
        let h = 1e-6;
        for j in 0..2 {
            let mut fwd = p.clone();
            fwd[j] += h;
            let mut bwd = p.clone();
            bwd[j] -= h;
            let numeric = (metric.value(&fwd).unwrap() - metric.value(&bwd).unwrap()) / (2.0 * h);
            assert!(
                (analytic[j] - numeric).abs() < 1e-5,
                "axis {}: analytic {} vs numeric {}",
                j,
                analytic[j],
                numeric
            );
        }
    }
}
