//! Mutual information metric with Parzen-window density estimation.

use super::trait_::{utils, Metric};
use crate::error::Result;
use crate::sampler::Sampler;
use nalgebra::{DMatrix, DVector};
use rreg_core::domain::BoxDomain;
use rreg_core::field::{DifferentiableField, Field};
use rreg_core::transform::TransformationSpace;

const DENSITY_EPS: f64 = 1e-12;

/// Mutual information metric.
///
/// Estimates the joint and marginal intensity distributions of the fixed
/// and transformed-moving images over the sampled points with Gaussian
/// Parzen windows and computes `MI = H(F) + H(M) - H(F, M)`.
///
/// The reported `value` is the **negated** mutual information, so that
/// lower values mean more similar images and the metric minimizes like the
/// others. Histogram bin centers are fixed at construction (from the fixed
/// image's sampled range and the moving image's range over the same,
/// untransformed points), which keeps the value a smooth function of the
/// parameters and the analytic gradient exact across calls.
pub struct MutualInformationMetric<F, M, S, Sa, const D: usize> {
    fixed: F,
    moving: M,
    domain: BoxDomain<D>,
    space: S,
    sampler: Sa,
    fixed_bins: DVector<f64>,
    moving_bins: DVector<f64>,
    sigma: f64,
}

fn bin_centers(min: f64, max: f64, count: usize) -> DVector<f64> {
    // Guard against constant intensities.
    let (min, max) = if max - min < 1e-9 {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (max - min) / count as f64;
    DVector::from_fn(count, |i, _| min + (i as f64 + 0.5) * width)
}

/// Per-sample bin weights, normalized so each sample contributes unit mass.
fn parzen_weights(value: f64, bins: &DVector<f64>, sigma: f64) -> DVector<f64> {
    let mut weights = bins.map(|b| (-(value - b) * (value - b) / (2.0 * sigma * sigma)).exp());
    let sum = weights.sum();
    if sum > DENSITY_EPS {
        weights /= sum;
    }
    weights
}

/// Derivative of the normalized bin weights with respect to the intensity.
fn parzen_weight_derivatives(value: f64, bins: &DVector<f64>, sigma: f64) -> (DVector<f64>, DVector<f64>) {
    let weights = parzen_weights(value, bins, sigma);
    let inv_sigma2 = 1.0 / (sigma * sigma);
    let scores = bins.map(|b| (b - value) * inv_sigma2);
    let mean_score = weights.dot(&scores);
    let derivatives = weights.component_mul(&scores.add_scalar(-mean_score));
    (weights, derivatives)
}

impl<F, M, S, Sa, const D: usize> MutualInformationMetric<F, M, S, Sa, D>
where
    F: Field<D> + Sync,
    M: DifferentiableField<D> + Sync,
    S: TransformationSpace<D> + Sync,
    S::Transform: Sync,
    Sa: Sampler<D>,
{
    /// Create a new mutual information metric.
    ///
    /// Bin ranges are derived from the field values at the sampler's
    /// points, so construction fails if a sample point is outside either
    /// field's domain.
    pub fn new(
        fixed: F,
        moving: M,
        domain: BoxDomain<D>,
        space: S,
        sampler: Sa,
        num_bins: usize,
        sigma: f64,
    ) -> Result<Self> {
        assert!(num_bins >= 2, "need at least 2 histogram bins");
        assert!(sigma > 0.0, "Parzen kernel width must be positive");

        let samples = sampler.samples(&domain)?;
        let mut fixed_range = (f64::INFINITY, f64::NEG_INFINITY);
        let mut moving_range = (f64::INFINITY, f64::NEG_INFINITY);
        for (point, _) in &samples {
            let f = fixed.value(point)?;
            let m = moving.value(point)?;
            fixed_range = (fixed_range.0.min(f), fixed_range.1.max(f));
            moving_range = (moving_range.0.min(m), moving_range.1.max(m));
        }

        Ok(Self {
            fixed,
            moving,
            domain,
            space,
            sampler,
            fixed_bins: bin_centers(fixed_range.0, fixed_range.1, num_bins),
            moving_bins: bin_centers(moving_range.0, moving_range.1, num_bins),
            sigma,
        })
    }

    fn marginals(joint: &DMatrix<f64>) -> (DVector<f64>, DVector<f64>) {
        let (rows, cols) = joint.shape();
        let mut fixed_marginal = DVector::zeros(rows);
        let mut moving_marginal = DVector::zeros(cols);
        for i in 0..rows {
            for j in 0..cols {
                fixed_marginal[i] += joint[(i, j)];
                moving_marginal[j] += joint[(i, j)];
            }
        }
        (fixed_marginal, moving_marginal)
    }

    fn mutual_information(joint: &DMatrix<f64>) -> f64 {
        let (fixed_marginal, moving_marginal) = Self::marginals(joint);
        let (rows, cols) = joint.shape();
        let mut mi = 0.0;
        for i in 0..rows {
            for j in 0..cols {
                let p = joint[(i, j)];
                if p > DENSITY_EPS && fixed_marginal[i] > DENSITY_EPS && moving_marginal[j] > DENSITY_EPS {
                    mi += p * (p / (fixed_marginal[i] * moving_marginal[j])).ln();
                }
            }
        }
        mi
    }

    /// Pointwise log-ratio `ln(p_ij / (p_i q_j))`, the integrand the
    /// gradient weighs each density perturbation with.
    fn log_ratio(joint: &DMatrix<f64>) -> DMatrix<f64> {
        let (fixed_marginal, moving_marginal) = Self::marginals(joint);
        let (rows, cols) = joint.shape();
        DMatrix::from_fn(rows, cols, |i, j| {
            let p = joint[(i, j)];
            if p > DENSITY_EPS && fixed_marginal[i] > DENSITY_EPS && moving_marginal[j] > DENSITY_EPS {
                (p / (fixed_marginal[i] * moving_marginal[j])).ln()
            } else {
                0.0
            }
        })
    }
}

impl<F, M, S, Sa, const D: usize> Metric for MutualInformationMetric<F, M, S, Sa, D>
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

        let num_bins = self.fixed_bins.len();
        let mut joint = DMatrix::zeros(num_bins, num_bins);
        for t in &terms {
            let fixed_weights = parzen_weights(t.fixed, &self.fixed_bins, self.sigma);
            let moving_weights = parzen_weights(t.moving, &self.moving_bins, self.sigma);
            joint.ger(t.weight, &fixed_weights, &moving_weights, 1.0);
        }

        Ok(-Self::mutual_information(&joint))
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

        let num_bins = self.fixed_bins.len();
        let mut joint = DMatrix::zeros(num_bins, num_bins);
        let mut per_sample = Vec::with_capacity(terms.len());
        for t in &terms {
            let fixed_weights = parzen_weights(t.fixed, &self.fixed_bins, self.sigma);
            let (moving_weights, moving_weight_derivatives) =
                parzen_weight_derivatives(t.moving, &self.moving_bins, self.sigma);
            joint.ger(t.weight, &fixed_weights, &moving_weights, 1.0);
            per_sample.push((fixed_weights, moving_weight_derivatives));
        }

        let log_ratio_t = Self::log_ratio(&joint).transpose();
        let mut gradient = DVector::zeros(parameters.len());
        for (t, (fixed_weights, moving_weight_derivatives)) in terms.iter().zip(&per_sample) {
            // d(-MI)/dm_k = -w_k * <dW_m/dm, log_ratio^T W_f>
            let weighted_ratio = &log_ratio_t * fixed_weights;
            let dvalue_dm = -t.weight * moving_weight_derivatives.dot(&weighted_ratio);
            gradient.axpy(dvalue_dm, &t.moving_derivative, 1.0);
        }
        Ok(gradient)
    }

    fn name(&self) -> &'static str {
        "MutualInformation"
    }
}
