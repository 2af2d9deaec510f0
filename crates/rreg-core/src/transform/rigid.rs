//! Rigid transformation spaces (rotation followed by translation).
//!
//! Rigid motion is expressed as a product space rather than a dedicated
//! type: `T(x) = R(x - c) + c + t`, i.e. rotation about a fixed center
//! applied first, then translation. With the translation member second,
//! the product-space parameter Jacobian is exact.

use super::product::ProductSpace;
use super::rotation::{RotationSpace2d, RotationSpace3d};
use super::trait_::TransformationSpace;
use super::translation::TranslationSpace;
use crate::spatial::{Point2, Point3};

/// 2D rigid space: parameters `[angle, tx, ty]`.
pub type RigidSpace2d = ProductSpace<RotationSpace2d, TranslationSpace<2>, 2>;

/// 3D rigid space: parameters `[alpha, beta, gamma, tx, ty, tz]`.
pub type RigidSpace3d = ProductSpace<RotationSpace3d, TranslationSpace<3>, 3>;

/// Create a 2D rigid space about the given rotation center.
pub fn rigid_space_2d(center: Point2) -> RigidSpace2d {
    RotationSpace2d::new(center).product(TranslationSpace::new())
}

/// Create a 3D rigid space about the given rotation center.
pub fn rigid_space_3d(center: Point3) -> RigidSpace3d {
    RotationSpace3d::new(center).product(TranslationSpace::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use nalgebra::DVector;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rigid_2d_rotation_then_translation() {
        let space = rigid_space_2d(Point2::origin());
        let params = DVector::from_vec(vec![FRAC_PI_2, 1.0, 2.0]);
        let transform = space.transform_for_parameters(&params).unwrap();

        // (1, 0) rotates to (0, 1), then translates to (1, 3).
        let moved = transform.apply(Point2::new([1.0, 0.0]));
        assert!((moved[0] - 1.0).abs() < 1e-12);
        assert!((moved[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rigid_3d_parameter_count() {
        let space = rigid_space_3d(Point3::origin());
        assert_eq!(space.parameter_count(), 6);
    }
}
