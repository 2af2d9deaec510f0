//! Discrete scalar image with physical metadata.
//!
//! The image combines a flat sample buffer with the metadata that maps
//! grid indices to physical coordinates (origin and per-axis spacing).

use crate::domain::BoxDomain;
use crate::error::{CoreError, Result};
use crate::spatial::{Point, Vector};

/// A D-dimensional grid of scalar samples with physical metadata.
///
/// # Coordinate Systems
/// * **Index space**: discrete pixel/voxel indices, axis 0 fastest-varying
///   in the flat buffer.
/// * **Physical space**: continuous coordinates,
///   `world = origin + index * spacing` per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteImage<const D: usize> {
    data: Vec<f64>,
    size: [usize; D],
    origin: Point<D>,
    spacing: Vector<D>,
}

impl<const D: usize> DiscreteImage<D> {
    /// Create a new image from a flat sample buffer.
    ///
    /// `data` is laid out with axis 0 fastest-varying. Fails if the buffer
    /// length does not match the product of `size`.
    pub fn new(data: Vec<f64>, size: [usize; D], origin: Point<D>, spacing: Vector<D>) -> Result<Self> {
        let expected: usize = size.iter().product();
        if data.len() != expected {
            return Err(CoreError::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        for k in 0..D {
            assert!(spacing[k] > 0.0, "spacing must be positive");
        }
        Ok(Self {
            data,
            size,
            origin,
            spacing,
        })
    }

    /// The per-axis sample counts.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Physical coordinate of the first sample.
    pub fn origin(&self) -> Point<D> {
        self.origin
    }

    /// Physical distance between samples along each axis.
    pub fn spacing(&self) -> Vector<D> {
        self.spacing
    }

    /// The flat sample buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// The physical region covered by the sample grid.
    pub fn domain(&self) -> BoxDomain<D> {
        let mut extent = Vector::zeros();
        for k in 0..D {
            extent[k] = self.spacing[k] * (self.size[k] - 1) as f64;
        }
        BoxDomain::new(self.origin, extent)
    }

    /// The sample at a grid index.
    pub fn get(&self, index: [usize; D]) -> f64 {
        self.data[self.flat_index(index)]
    }

    /// Map a physical point to a continuous grid index.
    pub fn world_to_index(&self, point: &Point<D>) -> [f64; D] {
        let mut index = [0.0; D];
        for k in 0..D {
            index[k] = (point[k] - self.origin[k]) / self.spacing[k];
        }
        index
    }

    /// Map a grid index to a physical point.
    pub fn index_to_world(&self, index: [f64; D]) -> Point<D> {
        let mut point = self.origin;
        for k in 0..D {
            point[k] += index[k] * self.spacing[k];
        }
        point
    }

    /// The minimum and maximum sample values.
    pub fn intensity_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }

    pub(crate) fn flat_index(&self, index: [usize; D]) -> usize {
        let mut flat = 0;
        let mut stride = 1;
        for k in 0..D {
            debug_assert!(index[k] < self.size[k]);
            flat += index[k] * stride;
            stride *= self.size[k];
        }
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Point2, Vector2};

    fn ramp_image() -> DiscreteImage<2> {
        // 3x2 grid, value = x + 10*y
        let data = vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        DiscreteImage::new(data, [3, 2], Point2::new([1.0, 2.0]), Vector2::new([0.5, 2.0])).unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let result = DiscreteImage::<2>::new(vec![0.0; 5], [3, 2], Point2::origin(), Vector2::new([1.0, 1.0]));
        assert!(matches!(result, Err(CoreError::InvalidShape { expected: 6, actual: 5 })));
    }

    #[test]
    fn test_indexing() {
        let image = ramp_image();
        assert_eq!(image.get([0, 0]), 0.0);
        assert_eq!(image.get([2, 0]), 2.0);
        assert_eq!(image.get([1, 1]), 11.0);
    }

    #[test]
    fn test_world_index_round_trip() {
        let image = ramp_image();
        let p = Point2::new([1.75, 4.0]);
        let index = image.world_to_index(&p);
        assert!((index[0] - 1.5).abs() < 1e-12);
        assert!((index[1] - 1.0).abs() < 1e-12);
        let back = image.index_to_world(index);
        assert!((back[0] - p[0]).abs() < 1e-12);
        assert!((back[1] - p[1]).abs() < 1e-12);
    }

    #[test]
    fn test_domain_extent() {
        let image = ramp_image();
        let domain = image.domain();
        assert_eq!(domain.origin(), Point2::new([1.0, 2.0]));
        assert_eq!(domain.upper(), Point2::new([2.0, 4.0]));
    }

    #[test]
    fn test_intensity_range() {
        let image = ramp_image();
        assert_eq!(image.intensity_range(), (0.0, 12.0));
    }
}
