//! Metric trait for image similarity measurement.
//!
//! Metrics compute a scalar dissimilarity between a fixed image and a
//! moving image composed with a candidate transformation, together with
//! the analytic gradient of that value with respect to the transformation
//! parameters. Lower values indicate better alignment.

use crate::error::Result;
use nalgebra::DVector;

/// A similarity metric over transformation parameters.
///
/// A metric is stateless given its constructor inputs (fixed field, moving
/// differentiable field, domain, transformation space, sampler);
/// `derivative` is the analytic gradient of `value`, consistent up to
/// linearization tolerance.
pub trait Metric {
    /// The dissimilarity value at a parameter vector.
    fn value(&self, parameters: &DVector<f64>) -> Result<f64>;

    /// The gradient of [`Metric::value`] with respect to the parameters.
    fn derivative(&self, parameters: &DVector<f64>) -> Result<DVector<f64>>;

    /// String identifier for the metric.
    fn name(&self) -> &'static str;
}

/// Shared sampling pipeline for point-wise metrics: transform the sample
/// points, evaluate both fields, and (for gradients) push the moving
/// image's spatial gradient through the transformation's parameter
/// Jacobian. Out-of-domain evaluations propagate as errors; substituting a
/// default intensity would bias the gradient.
pub(crate) mod utils {
    use crate::error::Result;
    use crate::sampler::Sampler;
    use nalgebra::DVector;
    use rayon::prelude::*;
    use rreg_core::domain::BoxDomain;
    use rreg_core::field::{DifferentiableField, Field};
    use rreg_core::transform::{Transform, TransformationSpace};

    /// Per-sample intensities.
    pub struct ValueTerm {
        pub weight: f64,
        pub fixed: f64,
        pub moving: f64,
    }

    /// Per-sample intensities plus the derivative of the warped moving
    /// intensity with respect to the transformation parameters.
    pub struct GradientTerm {
        pub weight: f64,
        pub fixed: f64,
        pub moving: f64,
        /// `d M(T(x; p)) / d p`, length = parameter count.
        pub moving_derivative: DVector<f64>,
    }

    pub fn value_terms<F, M, S, Sa, const D: usize>(
        fixed: &F,
        moving: &M,
        domain: &BoxDomain<D>,
        space: &S,
        sampler: &Sa,
        parameters: &DVector<f64>,
    ) -> Result<Vec<ValueTerm>>
    where
        F: Field<D> + Sync,
        M: Field<D> + Sync,
        S: TransformationSpace<D>,
        S::Transform: Sync,
        Sa: Sampler<D>,
    {
        let transform = space.transform_for_parameters(parameters)?;
        let samples = sampler.samples(domain)?;
        samples
            .into_par_iter()
            .map(|(point, weight)| {
                let mapped = transform.apply(point);
                Ok(ValueTerm {
                    weight,
                    fixed: fixed.value(&point)?,
                    moving: moving.value(&mapped)?,
                })
            })
            .collect()
    }

    pub fn gradient_terms<F, M, S, Sa, const D: usize>(
        fixed: &F,
        moving: &M,
        domain: &BoxDomain<D>,
        space: &S,
        sampler: &Sa,
        parameters: &DVector<f64>,
    ) -> Result<Vec<GradientTerm>>
    where
        F: Field<D> + Sync,
        M: DifferentiableField<D> + Sync,
        S: TransformationSpace<D> + Sync,
        S::Transform: Sync,
        Sa: Sampler<D>,
    {
        let transform = space.transform_for_parameters(parameters)?;
        let samples = sampler.samples(domain)?;
        samples
            .into_par_iter()
            .map(|(point, weight)| {
                let mapped = transform.apply(point);
                let jacobian = space.parameter_jacobian(parameters, point)?;
                let spatial_gradient = moving.gradient(&mapped)?;
                let moving_derivative =
                    jacobian.transpose() * DVector::from_column_slice(spatial_gradient.as_slice());
                Ok(GradientTerm {
                    weight,
                    fixed: fixed.value(&point)?,
                    moving: moving.value(&mapped)?,
                    moving_derivative,
                })
            })
            .collect()
    }
}
