//! Regularizer trait definition.

use nalgebra::DVector;

/// A penalty on the transformation parameters, independent of image
/// content.
///
/// The registration driver adds `weight * value` to the metric and
/// `weight * gradient` to its derivative.
pub trait Regularizer {
    /// The penalty value for a parameter vector.
    fn value(&self, parameters: &DVector<f64>) -> f64;

    /// The gradient of the penalty with respect to the parameters.
    fn gradient(&self, parameters: &DVector<f64>) -> DVector<f64>;
}
