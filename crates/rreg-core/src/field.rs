//! Differentiable scalar fields over physical space.
//!
//! Fields are the continuous view of an image that metrics evaluate:
//! a domain-bounded scalar function, optionally with an analytic spatial
//! gradient. Interpolated images implement these traits; synthetic analytic
//! fields can implement them directly.

use crate::domain::BoxDomain;
use crate::error::Result;
use crate::spatial::{Point, Vector};

/// A scalar field over D-dimensional space.
///
/// Evaluation outside [`Field::domain`] is an error, never a silently
/// substituted value: registration metrics must see the failure, since a
/// substituted intensity would bias the gradient.
pub trait Field<const D: usize> {
    /// The region over which the field can be evaluated.
    fn domain(&self) -> &BoxDomain<D>;

    /// Evaluate the field at a point.
    fn value(&self, point: &Point<D>) -> Result<f64>;
}

/// A scalar field with an analytic spatial gradient.
pub trait DifferentiableField<const D: usize>: Field<D> {
    /// The spatial derivative of the field at a point.
    fn gradient(&self, point: &Point<D>) -> Result<Vector<D>>;
}

impl<const D: usize, F: Field<D> + ?Sized> Field<D> for &F {
    fn domain(&self) -> &BoxDomain<D> {
        (**self).domain()
    }

    fn value(&self, point: &Point<D>) -> Result<f64> {
        (**self).value(point)
    }
}

impl<const D: usize, F: DifferentiableField<D> + ?Sized> DifferentiableField<D> for &F {
    fn gradient(&self, point: &Point<D>) -> Result<Vector<D>> {
        (**self).gradient(point)
    }
}
