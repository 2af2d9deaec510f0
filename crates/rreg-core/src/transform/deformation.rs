//! Low-rank parametric deformation fields.
//!
//! A deformation space displaces each point by a truncated basis expansion
//! `u(x) = mean(x) + sum_i c_i * phi_i(x)`; the coefficients `c` are the
//! transformation parameters. The basis itself (e.g. a low-rank
//! Gaussian-process approximation) is a collaborator: this module only
//! consumes its evaluation contract.

use super::trait_::{check_parameter_count, Transform, TransformationSpace};
use crate::error::Result;
use crate::spatial::{Point, Vector};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;

/// A truncated basis of displacement fields.
///
/// `basis(i, x)` is both the i-th basis field evaluated at `x` and, by
/// linearity, the derivative of the displacement with respect to
/// coefficient `i` at `x`.
pub trait DeformationBasis<const D: usize> {
    /// Number of basis fields (= number of coefficients).
    fn rank(&self) -> usize;

    /// Evaluate the i-th basis field at a point.
    fn basis(&self, i: usize, point: Point<D>) -> Vector<D>;

    /// The mean displacement field; zero unless the collaborator says
    /// otherwise.
    fn mean(&self, point: Point<D>) -> Vector<D> {
        let _ = point;
        Vector::zeros()
    }
}

/// Transformation space spanned by a low-rank deformation basis.
#[derive(Debug)]
pub struct LowRankDeformationSpace<K, const D: usize> {
    basis: Arc<K>,
}

impl<K, const D: usize> Clone for LowRankDeformationSpace<K, D> {
    fn clone(&self) -> Self {
        Self {
            basis: Arc::clone(&self.basis),
        }
    }
}

impl<K, const D: usize> LowRankDeformationSpace<K, D>
where
    K: DeformationBasis<D>,
{
    /// Create a deformation space over the given basis.
    pub fn new(basis: K) -> Self {
        Self {
            basis: Arc::new(basis),
        }
    }

    /// The underlying basis.
    pub fn basis(&self) -> &K {
        &self.basis
    }
}

/// Displacement of each point by an evaluated deformation field.
#[derive(Debug)]
pub struct DeformationTransform<K, const D: usize> {
    basis: Arc<K>,
    coefficients: DVector<f64>,
}

impl<K, const D: usize> DeformationTransform<K, D>
where
    K: DeformationBasis<D>,
{
    /// The displacement at a point for the stored coefficients.
    pub fn displacement(&self, point: Point<D>) -> Vector<D> {
        let mut displacement = self.basis.mean(point);
        for (i, &c) in self.coefficients.iter().enumerate() {
            displacement = displacement + self.basis.basis(i, point) * c;
        }
        displacement
    }
}

impl<K, const D: usize> Transform<D> for DeformationTransform<K, D>
where
    K: DeformationBasis<D>,
{
    fn apply(&self, point: Point<D>) -> Point<D> {
        point + self.displacement(point)
    }
}

impl<K, const D: usize> TransformationSpace<D> for LowRankDeformationSpace<K, D>
where
    K: DeformationBasis<D>,
{
    type Transform = DeformationTransform<K, D>;

    fn parameter_count(&self) -> usize {
        self.basis.rank()
    }

    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform> {
        check_parameter_count(self.basis.rank(), parameters)?;
        Ok(DeformationTransform {
            basis: Arc::clone(&self.basis),
            coefficients: parameters.clone(),
        })
    }

    fn parameter_jacobian(&self, parameters: &DVector<f64>, point: Point<D>) -> Result<DMatrix<f64>> {
        let rank = self.basis.rank();
        check_parameter_count(rank, parameters)?;
        let columns: Vec<Vector<D>> = (0..rank).map(|i| self.basis.basis(i, point)).collect();
        Ok(DMatrix::from_fn(D, rank, |r, c| columns[c][r]))
    }
}

/// Isotropic Gaussian bump basis.
///
/// For each center there are D basis fields, one per axis: field `i`
/// displaces along axis `i % D` with weight
/// `exp(-|x - c|^2 / (2 sigma^2))` around center `i / D`. Small and
/// explicit, but enough to express smooth local deformations; production
/// deployments would substitute a Gaussian-process low-rank basis here.
#[derive(Debug, Clone)]
pub struct GaussianBumpBasis<const D: usize> {
    centers: Vec<Point<D>>,
    sigma: f64,
}

impl<const D: usize> GaussianBumpBasis<D> {
    /// Create a bump basis from centers and a common bandwidth.
    pub fn new(centers: Vec<Point<D>>, sigma: f64) -> Self {
        assert!(sigma > 0.0, "bandwidth must be positive");
        assert!(!centers.is_empty(), "basis needs at least one center");
        Self { centers, sigma }
    }
}

impl<const D: usize> DeformationBasis<D> for GaussianBumpBasis<D> {
    fn rank(&self) -> usize {
        self.centers.len() * D
    }

    fn basis(&self, i: usize, point: Point<D>) -> Vector<D> {
        let center = self.centers[i / D];
        let axis = i % D;
        let weight = (-(point - center).norm_squared() / (2.0 * self.sigma * self.sigma)).exp();
        let mut field = Vector::zeros();
        field[axis] = weight;
        field
    }
}
