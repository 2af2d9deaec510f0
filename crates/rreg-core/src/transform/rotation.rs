//! Rotation transformation spaces about a fixed center.
//!
//! 2D rotations carry one angle; 3D rotations carry three Euler angles in
//! the Z*Y*X convention: `R = Rz(gamma) * Ry(beta) * Rx(alpha)` with
//! parameters ordered `[alpha, beta, gamma]`.

use super::trait_::{check_parameter_count, Transform, TransformationSpace};
use crate::error::Result;
use crate::spatial::{Point, Point2, Point3};
use nalgebra::{DMatrix, DVector, Matrix2, Matrix3};

/// The space of 2D rotations about a fixed center (1 parameter).
#[derive(Debug, Clone, Copy)]
pub struct RotationSpace2d {
    center: Point2,
}

impl RotationSpace2d {
    /// Create a rotation space about the given center.
    pub fn new(center: Point2) -> Self {
        Self { center }
    }

    /// The fixed center of rotation.
    pub fn center(&self) -> Point2 {
        self.center
    }
}

/// Rotation about a fixed 2D center: `T(x) = R(x - c) + c`.
#[derive(Debug, Clone, Copy)]
pub struct Rotation2dTransform {
    matrix: Matrix2<f64>,
    center: Point2,
}

impl Transform<2> for Rotation2dTransform {
    fn apply(&self, point: Point<2>) -> Point<2> {
        let rotated = self.matrix * (point.0 - self.center.0);
        Point(self.center.0 + rotated)
    }
}

impl TransformationSpace<2> for RotationSpace2d {
    type Transform = Rotation2dTransform;

    fn parameter_count(&self) -> usize {
        1
    }

    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform> {
        check_parameter_count(1, parameters)?;
        let theta = parameters[0];
        let (s, c) = theta.sin_cos();
        Ok(Rotation2dTransform {
            matrix: Matrix2::new(c, -s, s, c),
            center: self.center,
        })
    }

    fn parameter_jacobian(&self, parameters: &DVector<f64>, point: Point<2>) -> Result<DMatrix<f64>> {
        check_parameter_count(1, parameters)?;
        let theta = parameters[0];
        let (s, c) = theta.sin_cos();
        let d_matrix = Matrix2::new(-s, -c, c, -s);
        let column = d_matrix * (point.0 - self.center.0);
        Ok(DMatrix::from_fn(2, 1, |r, _| column[r]))
    }
}

/// The space of 3D rotations about a fixed center (3 Euler angles).
#[derive(Debug, Clone, Copy)]
pub struct RotationSpace3d {
    center: Point3,
}

impl RotationSpace3d {
    /// Create a rotation space about the given center.
    pub fn new(center: Point3) -> Self {
        Self { center }
    }

    /// The fixed center of rotation.
    pub fn center(&self) -> Point3 {
        self.center
    }
}

/// Rotation about a fixed 3D center: `T(x) = R(x - c) + c`.
#[derive(Debug, Clone, Copy)]
pub struct Rotation3dTransform {
    matrix: Matrix3<f64>,
    center: Point3,
}

impl Transform<3> for Rotation3dTransform {
    fn apply(&self, point: Point<3>) -> Point<3> {
        let rotated = self.matrix * (point.0 - self.center.0);
        Point(self.center.0 + rotated)
    }
}

fn rotation_x(alpha: f64) -> Matrix3<f64> {
    let (s, c) = alpha.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

fn rotation_y(beta: f64) -> Matrix3<f64> {
    let (s, c) = beta.sin_cos();
    Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

fn rotation_z(gamma: f64) -> Matrix3<f64> {
    let (s, c) = gamma.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

fn d_rotation_x(alpha: f64) -> Matrix3<f64> {
    let (s, c) = alpha.sin_cos();
    Matrix3::new(0.0, 0.0, 0.0, 0.0, -s, -c, 0.0, c, -s)
}

fn d_rotation_y(beta: f64) -> Matrix3<f64> {
    let (s, c) = beta.sin_cos();
    Matrix3::new(-s, 0.0, c, 0.0, 0.0, 0.0, -c, 0.0, -s)
}

fn d_rotation_z(gamma: f64) -> Matrix3<f64> {
    let (s, c) = gamma.sin_cos();
    Matrix3::new(-s, -c, 0.0, c, -s, 0.0, 0.0, 0.0, 0.0)
}

impl TransformationSpace<3> for RotationSpace3d {
    type Transform = Rotation3dTransform;

    fn parameter_count(&self) -> usize {
        3
    }

    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform> {
        check_parameter_count(3, parameters)?;
        let matrix = rotation_z(parameters[2]) * rotation_y(parameters[1]) * rotation_x(parameters[0]);
        Ok(Rotation3dTransform {
            matrix,
            center: self.center,
        })
    }

    fn parameter_jacobian(&self, parameters: &DVector<f64>, point: Point<3>) -> Result<DMatrix<f64>> {
        check_parameter_count(3, parameters)?;
        let (alpha, beta, gamma) = (parameters[0], parameters[1], parameters[2]);
        let centered = point.0 - self.center.0;
        let d_alpha = rotation_z(gamma) * rotation_y(beta) * d_rotation_x(alpha) * centered;
        let d_beta = rotation_z(gamma) * d_rotation_y(beta) * rotation_x(alpha) * centered;
        let d_gamma = d_rotation_z(gamma) * rotation_y(beta) * rotation_x(alpha) * centered;
        let columns = [d_alpha, d_beta, d_gamma];
        Ok(DMatrix::from_fn(3, 3, |r, c| columns[c][r]))
    }
}
