//! Objective-function trait for optimization.

use crate::error::Result;
use nalgebra::DVector;

/// An objective function to be minimized: a scalar value and its gradient
/// over a parameter vector.
///
/// `gradient` must be the analytic gradient of `value`. Both can fail
/// (e.g. a transformed sample point leaves an image's domain); failures
/// surface synchronously from the optimizer's iteration stream.
pub trait CostFunction {
    /// Function value f(p).
    fn value(&self, parameters: &DVector<f64>) -> Result<f64>;

    /// Gradient of f at p.
    fn gradient(&self, parameters: &DVector<f64>) -> Result<DVector<f64>>;
}

impl<C: CostFunction + ?Sized> CostFunction for &C {
    fn value(&self, parameters: &DVector<f64>) -> Result<f64> {
        (**self).value(parameters)
    }

    fn gradient(&self, parameters: &DVector<f64>) -> Result<DVector<f64>> {
        (**self).gradient(parameters)
    }
}
