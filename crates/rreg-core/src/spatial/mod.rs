//! Spatial primitives: points and vectors in D-dimensional physical space.

pub mod point;
pub mod vector;

pub use point::Point;
pub use vector::Vector;

/// A 2D point.
pub type Point2 = Point<2>;
/// A 3D point.
pub type Point3 = Point<3>;
/// A 2D vector.
pub type Vector2 = Vector<2>;
/// A 3D vector.
pub type Vector3 = Vector<3>;
