//! Point type for representing spatial coordinates.
//!
//! Points represent positions in physical space.

use super::Vector;
use nalgebra::Point as NaPoint;
use serde::{Deserialize, Serialize};

/// A point in D-dimensional space.
///
/// Points represent positions in physical coordinate systems. Used for
/// sample locations, rotation centers, and transformation inputs/outputs.
///
/// This is a thin wrapper around nalgebra's Point to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<const D: usize>(pub NaPoint<f64, D>);

impl<const D: usize> Point<D> {
    /// Create a new point from coordinates.
    pub fn new(coords: [f64; D]) -> Self {
        Self(NaPoint::from(coords))
    }

    /// Create a point at the origin (all coordinates zero).
    pub fn origin() -> Self {
        Self(NaPoint::origin())
    }

    /// Create a new point from a slice of coordinates.
    pub fn from_slice(coords: &[f64]) -> Self {
        assert!(coords.len() == D, "coordinate slice length must match dimension");
        let mut point = Self::origin();
        for i in 0..D {
            point.0.coords[i] = coords[i];
        }
        point
    }

    /// Coordinates as a slice.
    pub fn as_slice(&self) -> &[f64] {
        self.0.coords.as_slice()
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint<f64, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl<const D: usize> std::ops::Sub for Point<D> {
    type Output = Vector<D>;

    fn sub(self, other: Self) -> Self::Output {
        Vector(self.0.coords - other.0.coords)
    }
}

impl<const D: usize> std::ops::Add<Vector<D>> for Point<D> {
    type Output = Self;

    fn add(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 + vector.0)
    }
}

impl<const D: usize> std::ops::Sub<Vector<D>> for Point<D> {
    type Output = Self;

    fn sub(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 - vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point3, Vector3};

    #[test]
    fn test_point_creation() {
        let p = Point3::new([1.0, 2.0, 3.0]);
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 2.0);
        assert_eq!(p[2], 3.0);
    }

    #[test]
    fn test_point_origin() {
        let p = Point3::origin();
        assert_eq!(p.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_point_subtraction() {
        let p1 = Point3::new([5.0, 5.0, 5.0]);
        let p2 = Point3::new([2.0, 3.0, 4.0]);
        let diff = p1 - p2;
        assert_eq!(diff, Vector3::new([3.0, 2.0, 1.0]));
    }

    #[test]
    fn test_point_vector_addition() {
        let p = Point3::new([1.0, 2.0, 3.0]);
        let v = Vector3::new([4.0, 5.0, 6.0]);
        assert_eq!(p + v, Point3::new([5.0, 7.0, 9.0]));
        assert_eq!((p + v) - v, p);
    }
}
