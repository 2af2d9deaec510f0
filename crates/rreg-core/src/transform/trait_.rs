//! Transform and transformation-space traits.
//!
//! These are the core contracts for spatial coordinate transformations and
//! for the parametric families that construct them during registration.

use crate::error::{CoreError, Result};
use crate::spatial::Point;
use crate::transform::product::ProductSpace;
use nalgebra::{DMatrix, DVector};

/// A spatial coordinate transformation.
///
/// Maps points from one physical space to another. Transforms are pure and
/// immutable once constructed; composition is associative but not
/// commutative.
pub trait Transform<const D: usize> {
    /// Apply the transform to a point.
    fn apply(&self, point: Point<D>) -> Point<D>;
}

/// A parametric family of spatial transformations.
///
/// A space reports its parameter count, constructs a transform from a
/// parameter vector of exactly that length, and exposes the derivative of
/// the transformed point with respect to the parameters (the chain-rule
/// seam every metric gradient goes through).
pub trait TransformationSpace<const D: usize> {
    /// The transform type this space constructs.
    type Transform: Transform<D>;

    /// Number of parameters, invariant per instance.
    fn parameter_count(&self) -> usize;

    /// The parameter vector whose transform is the identity map.
    ///
    /// Used as the conventional optimizer start; the space itself does not
    /// enforce that convention.
    fn identity_parameters(&self) -> DVector<f64> {
        DVector::zeros(self.parameter_count())
    }

    /// Construct the transform for a parameter vector.
    ///
    /// Fails with [`CoreError::ParameterCountMismatch`] if the vector length
    /// does not match [`TransformationSpace::parameter_count`].
    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform>;

    /// Derivative of the transformed point with respect to the parameters.
    ///
    /// Returns a `D x parameter_count` matrix: column `j` is
    /// `d T(x; p) / d p_j` evaluated at `point`.
    fn parameter_jacobian(&self, parameters: &DVector<f64>, point: Point<D>) -> Result<DMatrix<f64>>;

    /// Combine with another space into a product space.
    ///
    /// The product's parameter vector is `[self-params | second-params]` in
    /// that order, and its transform applies `self` first, then `second`:
    /// `x -> second(self(x))`.
    fn product<S>(self, second: S) -> ProductSpace<Self, S, D>
    where
        Self: Sized,
        S: TransformationSpace<D>,
    {
        ProductSpace::new(self, second)
    }
}

/// Fail fast on a parameter vector of the wrong length.
pub(crate) fn check_parameter_count(expected: usize, parameters: &DVector<f64>) -> Result<()> {
    if parameters.len() != expected {
        return Err(CoreError::parameter_count(expected, parameters.len()));
    }
    Ok(())
}
