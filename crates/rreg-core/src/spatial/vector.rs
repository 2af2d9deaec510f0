//! Vector type for representing spatial displacements.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

/// A vector in D-dimensional space.
///
/// Vectors represent displacements and spatial gradients, as opposed to
/// positions (see [`Point`](super::Point)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector<const D: usize>(pub SVector<f64, D>);

impl<const D: usize> Vector<D> {
    /// Create a new vector from components.
    pub fn new(components: [f64; D]) -> Self {
        Self(SVector::from(components))
    }

    /// Create a zero vector.
    pub fn zeros() -> Self {
        Self(SVector::zeros())
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    /// Squared Euclidean norm.
    pub fn norm_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    /// Components as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }
}

impl<const D: usize> std::ops::Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Add for Vector<D> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 + other.0)
    }
}

impl<const D: usize> std::ops::Sub for Vector<D> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 - other.0)
    }
}

impl<const D: usize> std::ops::Mul<f64> for Vector<D> {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self(self.0 * scalar)
    }
}

impl<const D: usize> std::ops::Neg for Vector<D> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Vector2;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2::new([1.0, 2.0]);
        let b = Vector2::new([3.0, -1.0]);
        assert_eq!(a + b, Vector2::new([4.0, 1.0]));
        assert_eq!(a - b, Vector2::new([-2.0, 3.0]));
        assert_eq!(a * 2.0, Vector2::new([2.0, 4.0]));
        assert_eq!(-a, Vector2::new([-1.0, -2.0]));
    }

    #[test]
    fn test_vector_norm() {
        let v = Vector2::new([3.0, 4.0]);
        assert_eq!(v.norm(), 5.0);
        assert_eq!(v.norm_squared(), 25.0);
    }

    #[test]
    fn test_vector_dot() {
        let a = Vector2::new([1.0, 2.0]);
        let b = Vector2::new([3.0, -1.0]);
        assert_eq!(a.dot(&b), 1.0);
    }
}
