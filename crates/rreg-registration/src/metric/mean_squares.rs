//! Mean squared intensity difference metric.

use super::trait_::{utils, Metric};
use crate::error::Result;
use crate::sampler::Sampler;
use nalgebra::DVector;
use rreg_core::domain::BoxDomain;
use rreg_core::field::{DifferentiableField, Field};
use rreg_core::transform::TransformationSpace;

/// Mean Squares Metric.
///
/// Computes the sampling-weighted mean of the squared intensity difference
/// between the fixed image and the transformed moving image:
/// `MS(p) = sum_k w_k * (M(T(x_k; p)) - F(x_k))^2`.
///
/// Non-negative for every parameter vector, zero exactly when the images
/// match pointwise at every sample.
pub struct MeanSquaresMetric<F, M, S, Sa, const D: usize> {
    fixed: F,
    moving: M,
    domain: BoxDomain<D>,
    space: S,
    sampler: Sa,
}

impl<F, M, S, Sa, const D: usize> MeanSquaresMetric<F, M, S, Sa, D>
where
    F: Field<D> + Sync,
    M: DifferentiableField<D> + Sync,
    S: TransformationSpace<D> + Sync,
    S::Transform: Sync,
    Sa: Sampler<D>,
{
    /// Create a new mean squares metric over the given domain.
    pub fn new(fixed: F, moving: M, domain: BoxDomain<D>, space: S, sampler: Sa) -> Self {
        Self {
            fixed,
            moving,
            domain,
            space,
            sampler,
        }
    }

    /// The transformation space this metric differentiates through.
    pub fn space(&self) -> &S {
        &self.space
    }
}

impl<F, M, S, Sa, const D: usize> Metric for MeanSquaresMetric<F, M, S, Sa, D>
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
            .map(|t| {
                let residual = t.moving - t.fixed;
                t.weight * residual * residual
            })
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
            let residual = t.moving - t.fixed;
            gradient.axpy(2.0 * t.weight * residual, &t.moving_derivative, 1.0);
        }
        Ok(gradient)
    }

    fn name(&self) -> &'static str {
        "MeanSquares"
    }
}
