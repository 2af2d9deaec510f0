//! Product-space registration: translation composed with a low-rank
//! deformation field, recovering both members' ground-truth parameters.

use nalgebra::DVector;
use rreg_core::domain::BoxDomain;
use rreg_core::field::{DifferentiableField, Field};
use rreg_core::spatial::{Point2, Vector2};
use rreg_core::transform::{
    GaussianBumpBasis, LowRankDeformationSpace, Transform, TransformationSpace, TranslationSpace,
};
use rreg_core::Result as CoreResult;
use rreg_registration::metric::MeanSquaresMetric;
use rreg_registration::optimizer::{Lbfgs, LbfgsConfig};
use rreg_registration::regularization::L2Regularizer;
use rreg_registration::sampler::GridSampler;
use rreg_registration::Registration;

struct GaussianBlob {
    domain: BoxDomain<2>,
    center: Point2,
    sigma: f64,
}

impl Field<2> for GaussianBlob {
    fn domain(&self) -> &BoxDomain<2> {
        &self.domain
    }

    fn value(&self, point: &Point2) -> CoreResult<f64> {
        let d = *point - self.center;
        Ok((-d.norm_squared() / (2.0 * self.sigma * self.sigma)).exp())
    }
}

impl DifferentiableField<2> for GaussianBlob {
    fn gradient(&self, point: &Point2) -> CoreResult<Vector2> {
        let d = *point - self.center;
        let value = (-d.norm_squared() / (2.0 * self.sigma * self.sigma)).exp();
        Ok(d * (-value / (self.sigma * self.sigma)))
    }
}

struct Warped<F, T> {
    inner: F,
    warp: T,
    domain: BoxDomain<2>,
}

impl<F: Field<2>, T: Transform<2>> Field<2> for Warped<F, T> {
    fn domain(&self) -> &BoxDomain<2> {
        &self.domain
    }

    fn value(&self, point: &Point2) -> CoreResult<f64> {
        self.inner.value(&self.warp.apply(*point))
    }
}

fn blob(domain: BoxDomain<2>) -> GaussianBlob {
    GaussianBlob {
        domain,
        center: Point2::new([24.0, 24.0]),
        sigma: 10.0,
    }
}

fn deformation_space() -> LowRankDeformationSpace<GaussianBumpBasis<2>, 2> {
    let basis = GaussianBumpBasis::new(
        vec![Point2::new([16.0, 16.0]), Point2::new([32.0, 32.0])],
        5.0,
    );
    LowRankDeformationSpace::new(basis)
}

#[test]
fn test_product_space_recovery() {
    let domain = BoxDomain::new(Point2::new([6.0, 6.0]), Vector2::new([36.0, 36.0]));

    // Translation applied first, then the low-rank deformation; parameters
    // are [tx, ty | c0..c3].
    let space = TranslationSpace::<2>::new().product(deformation_space());
    assert_eq!(space.parameter_count(), 6);

    let truth = DVector::from_vec(vec![3.0, -2.0, 1.5, -1.0, 0.8, 1.2]);
    let fixed = Warped {
        inner: blob(domain),
        warp: space.transform_for_parameters(&truth).unwrap(),
        domain,
    };

    let metric = MeanSquaresMetric::new(
        fixed,
        blob(domain),
        domain,
        space,
        GridSampler::new([24, 24]).unwrap(),
    );
    let optimizer = Lbfgs::with_config(
        LbfgsConfig::default()
            .with_max_iterations(500)
            .with_gradient_tolerance(1e-12),
    );
    let driver = Registration::new(metric, optimizer);

    let last = driver
        .run(DVector::zeros(6))
        .unwrap()
        .expect("optimizer should take at least one step");

    assert!(
        last.value < 1e-6,
        "residual metric value {} should be near zero",
        last.value
    );
    for (i, &expected) in truth.iter().enumerate() {
        assert!(
            (last.parameters[i] - expected).abs() < 0.1,
            "parameter {}: recovered {} vs truth {}",
            i,
            last.parameters[i],
            expected
        );
    }
}

#[test]
fn test_regularized_deformation_shrinks_coefficients() {
    let domain = BoxDomain::new(Point2::new([6.0, 6.0]), Vector2::new([36.0, 36.0]));
    let space = TranslationSpace::<2>::new().product(deformation_space());

    let truth = DVector::from_vec(vec![2.0, -1.0, 1.0, -0.8, 0.6, 0.9]);
    let make_metric = || {
        let space = TranslationSpace::<2>::new().product(deformation_space());
        let fixed = Warped {
            inner: blob(domain),
            warp: space.transform_for_parameters(&truth).unwrap(),
            domain,
        };
        MeanSquaresMetric::new(fixed, blob(domain), domain, space, GridSampler::new([20, 20]).unwrap())
    };

    let optimizer = Lbfgs::with_config(
        LbfgsConfig::default()
            .with_max_iterations(300)
            .with_gradient_tolerance(1e-12),
    );

    let free = Registration::new(make_metric(), optimizer.clone())
        .run(DVector::zeros(6))
        .unwrap()
        .unwrap();

    // Penalize only the deformation coefficients, not the translation.
    let deformation_range = TranslationSpace::<2>::new().parameter_count()..space.parameter_count();
    let penalized = Registration::new(make_metric(), optimizer)
        .with_regularizer(L2Regularizer::over_range(deformation_range), 0.05)
        .run(DVector::zeros(6))
        .unwrap()
        .unwrap();

    let free_coeffs: f64 = free.parameters.rows(2, 4).norm();
    let penalized_coeffs: f64 = penalized.parameters.rows(2, 4).norm();
    assert!(
        penalized_coeffs < free_coeffs,
        "regularized coefficients {} should be smaller than free {}",
        penalized_coeffs,
        free_coeffs
    );
}
