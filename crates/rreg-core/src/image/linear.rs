//! Multilinear interpolated view of a discrete image.
//!
//! Turns a [`DiscreteImage`] into a continuous, differentiable scalar field
//! (bilinear for 2D, trilinear for 3D). The interpolated value is a product
//! of per-axis linear weights over the 2^D cell corners; the spatial
//! gradient differentiates those weights analytically.

use crate::domain::BoxDomain;
use crate::error::{CoreError, Result};
use crate::field::{DifferentiableField, Field};
use crate::image::DiscreteImage;
use crate::spatial::{Point, Vector};

// Slack for boundary evaluation after world-to-index rounding.
const INDEX_EPS: f64 = 1e-9;

/// Multilinear interpolated image.
///
/// Evaluation outside the sample grid fails with
/// [`CoreError::OutsideDomain`]; values are never clamped or padded.
#[derive(Debug, Clone)]
pub struct LinearImage<const D: usize> {
    image: DiscreteImage<D>,
    domain: BoxDomain<D>,
}

impl<const D: usize> LinearImage<D> {
    /// Wrap a discrete image. The grid needs at least two samples per axis.
    pub fn new(image: DiscreteImage<D>) -> Self {
        for k in 0..D {
            assert!(image.size()[k] >= 2, "interpolation needs at least 2 samples per axis");
        }
        let domain = image.domain();
        Self { image, domain }
    }

    /// The underlying discrete image.
    pub fn image(&self) -> &DiscreteImage<D> {
        &self.image
    }

    /// Locate the cell containing the point: lower corner index and
    /// per-axis fractional offsets.
    fn cell(&self, point: &Point<D>) -> Result<([usize; D], [f64; D])> {
        let index = self.image.world_to_index(point);
        let size = self.image.size();
        let mut corner = [0usize; D];
        let mut frac = [0.0; D];
        for k in 0..D {
            let u = index[k];
            if u < -INDEX_EPS || u > (size[k] - 1) as f64 + INDEX_EPS {
                return Err(CoreError::outside_domain(point.as_slice()));
            }
            let clamped = u.clamp(0.0, (size[k] - 1) as f64);
            let cell = (clamped.floor() as usize).min(size[k] - 2);
            corner[k] = cell;
            frac[k] = clamped - cell as f64;
        }
        Ok((corner, frac))
    }

    fn corner_value(&self, corner: [usize; D], mask: usize) -> f64 {
        let mut index = corner;
        for k in 0..D {
            if mask & (1 << k) != 0 {
                index[k] += 1;
            }
        }
        self.image.get(index)
    }
}

impl<const D: usize> Field<D> for LinearImage<D> {
    fn domain(&self) -> &BoxDomain<D> {
        &self.domain
    }

    fn value(&self, point: &Point<D>) -> Result<f64> {
        let (corner, frac) = self.cell(point)?;
        let mut value = 0.0;
        for mask in 0..(1usize << D) {
            let mut weight = 1.0;
            for k in 0..D {
                weight *= if mask & (1 << k) != 0 { frac[k] } else { 1.0 - frac[k] };
            }
            value += weight * self.corner_value(corner, mask);
        }
        Ok(value)
    }
}

impl<const D: usize> DifferentiableField<D> for LinearImage<D> {
    fn gradient(&self, point: &Point<D>) -> Result<Vector<D>> {
        let (corner, frac) = self.cell(point)?;
        let spacing = self.image.spacing();
        let mut gradient = Vector::zeros();
        for mask in 0..(1usize << D) {
            let value = self.corner_value(corner, mask);
            for a in 0..D {
                let mut weight = 1.0;
                for k in 0..D {
                    if k == a {
                        continue;
                    }
                    weight *= if mask & (1 << k) != 0 { frac[k] } else { 1.0 - frac[k] };
                }
                let sign = if mask & (1 << a) != 0 { 1.0 } else { -1.0 };
                gradient[a] += sign * weight * value / spacing[a];
            }
        }
        Ok(gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point2, Vector2};

    fn test_image() -> LinearImage<2> {
        // 2x2 grid: values 0, 1 / 10, 11
        let image = DiscreteImage::new(
            vec![0.0, 1.0, 10.0, 11.0],
            [2, 2],
            Point2::origin(),
            Vector2::new([1.0, 1.0]),
        )
        .unwrap();
        LinearImage::new(image)
    }

    #[test]
    fn test_value_at_grid_points() {
        let field = test_image();
        assert_eq!(field.value(&Point2::new([0.0, 0.0])).unwrap(), 0.0);
        assert_eq!(field.value(&Point2::new([1.0, 0.0])).unwrap(), 1.0);
        assert_eq!(field.value(&Point2::new([0.0, 1.0])).unwrap(), 10.0);
        assert_eq!(field.value(&Point2::new([1.0, 1.0])).unwrap(), 11.0);
    }

    #[test]
    fn test_value_at_cell_center() {
        let field = test_image();
        let center = field.value(&Point2::new([0.5, 0.5])).unwrap();
        assert!((center - 5.5).abs() < 1e-12, "expected 5.5, got {}", center);
    }

    #[test]
    fn test_outside_domain_is_an_error() {
        let field = test_image();
        assert!(matches!(
            field.value(&Point2::new([-0.5, 0.5])),
            Err(CoreError::OutsideDomain { .. })
        ));
        assert!(matches!(
            field.gradient(&Point2::new([0.5, 1.5])),
            Err(CoreError::OutsideDomain { .. })
        ));
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        // 4x4 smooth-ish grid, value = x^2 + 3*y sampled on integers.
        let mut data = Vec::with_capacity(16);
        for y in 0..4 {
            for x in 0..4 {
                data.push((x * x) as f64 + 3.0 * y as f64);
            }
        }
        let image = DiscreteImage::new(data, [4, 4], Point2::origin(), Vector2::new([1.0, 1.0])).unwrap();
        let field = LinearImage::new(image);

        let p = Point2::new([1.3, 2.4]);
        let grad = field.gradient(&p).unwrap();
        let h = 1e-6;
        for a in 0..2 {
            let mut fwd = p;
            fwd[a] += h;
            let mut bwd = p;
            bwd[a] -= h;
            let numeric = (field.value(&fwd).unwrap() - field.value(&bwd).unwrap()) / (2.0 * h);
            assert!(
                (grad[a] - numeric).abs() < 1e-6,
                "axis {}: analytic {} vs numeric {}",
                a,
                grad[a],
                numeric
            );
        }
    }

    #[test]
    fn test_gradient_accounts_for_spacing() {
        let image = DiscreteImage::new(
            vec![0.0, 1.0, 10.0, 11.0],
            [2, 2],
            Point2::origin(),
            Vector2::new([2.0, 0.5]),
        )
        .unwrap();
        let field = LinearImage::new(image);
        let grad = field.gradient(&Point2::new([1.0, 0.25])).unwrap();
        // value = x/2 + 10*y/0.5 in world coordinates
        assert!((grad[0] - 0.5).abs() < 1e-12);
        assert!((grad[1] - 20.0).abs() < 1e-12);
    }
}
