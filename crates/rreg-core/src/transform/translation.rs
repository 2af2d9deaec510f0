//! Translation transformation space.

use super::trait_::{check_parameter_count, Transform, TransformationSpace};
use crate::error::Result;
use crate::spatial::{Point, Vector};
use nalgebra::{DMatrix, DVector};

/// The space of pure translations in D dimensions.
///
/// One parameter per axis; the transform shifts every point by the
/// parameter vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslationSpace<const D: usize>;

impl<const D: usize> TranslationSpace<D> {
    /// Create a new translation space.
    pub fn new() -> Self {
        Self
    }
}

/// Translation by a fixed offset vector.
#[derive(Debug, Clone, Copy)]
pub struct TranslationTransform<const D: usize> {
    offset: Vector<D>,
}

impl<const D: usize> TranslationTransform<D> {
    /// Create a new translation transform.
    pub fn new(offset: Vector<D>) -> Self {
        Self { offset }
    }

    /// The translation vector.
    pub fn offset(&self) -> Vector<D> {
        self.offset
    }
}

impl<const D: usize> Transform<D> for TranslationTransform<D> {
    fn apply(&self, point: Point<D>) -> Point<D> {
        point + self.offset
    }
}

impl<const D: usize> TransformationSpace<D> for TranslationSpace<D> {
    type Transform = TranslationTransform<D>;

    fn parameter_count(&self) -> usize {
        D
    }

    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform> {
        check_parameter_count(D, parameters)?;
        let mut offset = Vector::zeros();
        for k in 0..D {
            offset[k] = parameters[k];
        }
        Ok(TranslationTransform::new(offset))
    }

    fn parameter_jacobian(&self, parameters: &DVector<f64>, _point: Point<D>) -> Result<DMatrix<f64>> {
        check_parameter_count(D, parameters)?;
        Ok(DMatrix::identity(D, D))
    }
}
