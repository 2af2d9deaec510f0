//! Product composition of transformation spaces.
//!
//! A product space concatenates the parameter vectors of two child spaces
//! (`[first-params | second-params]`) and composes their transforms
//! left-to-right: `T(x) = second(first(x))`. Order matters; call sites
//! should document which member is applied first.

use super::trait_::{check_parameter_count, Transform, TransformationSpace};
use crate::error::Result;
use crate::spatial::Point;
use nalgebra::{DMatrix, DVector};

/// Product of two transformation spaces.
///
/// Recursively nestable: a product member may itself be a product.
///
/// The parameter Jacobian concatenates the child Jacobians
/// `[J_first(x) | J_second(first(x))]`, taking the second transform's
/// spatial derivative as identity. This is exact whenever the second member
/// is a translation and is the standard small-deformation approximation
/// for smooth low-rank deformation members.
#[derive(Debug, Clone, Copy)]
pub struct ProductSpace<A, B, const D: usize> {
    first: A,
    second: B,
}

impl<A, B, const D: usize> ProductSpace<A, B, D>
where
    A: TransformationSpace<D>,
    B: TransformationSpace<D>,
{
    /// Create a new product space; `first` is applied before `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// The member applied first.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The member applied second.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Split a concatenated parameter vector into the two member vectors.
    pub fn split_parameters(&self, parameters: &DVector<f64>) -> Result<(DVector<f64>, DVector<f64>)> {
        let na = self.first.parameter_count();
        let nb = self.second.parameter_count();
        check_parameter_count(na + nb, parameters)?;
        let a = parameters.rows(0, na).clone_owned();
        let b = parameters.rows(na, nb).clone_owned();
        Ok((a, b))
    }
}

/// Chained application of two transforms: `x -> second(first(x))`.
#[derive(Debug, Clone, Copy)]
pub struct ProductTransform<T1, T2, const D: usize> {
    first: T1,
    second: T2,
}

impl<T1, T2, const D: usize> Transform<D> for ProductTransform<T1, T2, D>
where
    T1: Transform<D>,
    T2: Transform<D>,
{
    fn apply(&self, point: Point<D>) -> Point<D> {
        self.second.apply(self.first.apply(point))
    }
}

impl<A, B, const D: usize> TransformationSpace<D> for ProductSpace<A, B, D>
where
    A: TransformationSpace<D>,
    B: TransformationSpace<D>,
{
    type Transform = ProductTransform<A::Transform, B::Transform, D>;

    fn parameter_count(&self) -> usize {
        self.first.parameter_count() + self.second.parameter_count()
    }

    fn identity_parameters(&self) -> DVector<f64> {
        let mut parameters = DVector::zeros(self.parameter_count());
        let na = self.first.parameter_count();
        parameters
            .rows_mut(0, na)
            .copy_from(&self.first.identity_parameters());
        parameters
            .rows_mut(na, self.second.parameter_count())
            .copy_from(&self.second.identity_parameters());
        parameters
    }

    fn transform_for_parameters(&self, parameters: &DVector<f64>) -> Result<Self::Transform> {
        let (a, b) = self.split_parameters(parameters)?;
        Ok(ProductTransform {
            first: self.first.transform_for_parameters(&a)?,
            second: self.second.transform_for_parameters(&b)?,
        })
    }

    fn parameter_jacobian(&self, parameters: &DVector<f64>, point: Point<D>) -> Result<DMatrix<f64>> {
        let (a, b) = self.split_parameters(parameters)?;
        let na = a.len();
        let nb = b.len();

        let jac_first = self.first.parameter_jacobian(&a, point)?;
        let midpoint = self.first.transform_for_parameters(&a)?.apply(point);
        let jac_second = self.second.parameter_jacobian(&b, midpoint)?;

        let mut jacobian = DMatrix::zeros(D, na + nb);
        jacobian.view_mut((0, 0), (D, na)).copy_from(&jac_first);
        jacobian.view_mut((0, na), (D, nb)).copy_from(&jac_second);
        Ok(jacobian)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point2;
    use crate::transform::translation::TranslationSpace;

    #[test]
    fn test_product_composes_left_to_right() {
        let space = TranslationSpace::<2>::new().product(TranslationSpace::<2>::new());
        let params = DVector::from_vec(vec![1.0, 0.0, 0.0, 2.0]);
        let transform = space.transform_for_parameters(&params).unwrap();
        assert_eq!(transform.apply(Point2::origin()), Point2::new([1.0, 2.0]));
    }

    #[test]
    fn test_parameter_partition_order() {
        let space = TranslationSpace::<2>::new().product(TranslationSpace::<2>::new());
        let params = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let (a, b) = space.split_parameters(&params).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 2.0]);
        assert_eq!(b.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn test_parameter_count_is_sum() {
        let space = TranslationSpace::<2>::new().product(TranslationSpace::<2>::new());
        assert_eq!(space.parameter_count(), 4);
        assert!(space
            .transform_for_parameters(&DVector::zeros(3))
            .is_err());
    }

    #[test]
    fn test_jacobian_concatenates_members() {
        let space = TranslationSpace::<2>::new().product(TranslationSpace::<2>::new());
        let params = DVector::zeros(4);
        let jac = space
            .parameter_jacobian(&params, Point2::new([5.0, 6.0]))
            .unwrap();
        assert_eq!(jac.nrows(), 2);
        assert_eq!(jac.ncols(), 4);
        // Both members are translations, so both blocks are identities.
        for r in 0..2 {
            for c in 0..4 {
                let expected = if c % 2 == r { 1.0 } else { 0.0 };
                assert_eq!(jac[(r, c)], expected);
            }
        }
    }

    #[test]
    fn test_nested_product() {
        let space = TranslationSpace::<2>::new()
            .product(TranslationSpace::<2>::new())
            .product(TranslationSpace::<2>::new());
        assert_eq!(space.parameter_count(), 6);
        let params = DVector::from_vec(vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        let transform = space.transform_for_parameters(&params).unwrap();
        assert_eq!(transform.apply(Point2::origin()), Point2::new([6.0, 0.0]));
    }
}
