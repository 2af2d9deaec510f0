//! Axis-aligned box domains over physical space.
//!
//! A domain describes the region over which a field can be evaluated and
//! over which samplers draw integration points.

use crate::spatial::{Point, Vector};
use serde::{Deserialize, Serialize};

/// An axis-aligned box in D-dimensional physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDomain<const D: usize> {
    origin: Point<D>,
    extent: Vector<D>,
}

impl<const D: usize> BoxDomain<D> {
    /// Create a new box domain from its lower corner and per-axis extent.
    ///
    /// Extents must be non-negative.
    pub fn new(origin: Point<D>, extent: Vector<D>) -> Self {
        for k in 0..D {
            assert!(extent[k] >= 0.0, "domain extent must be non-negative");
        }
        Self { origin, extent }
    }

    /// The lower corner of the box.
    pub fn origin(&self) -> Point<D> {
        self.origin
    }

    /// The per-axis extent of the box.
    pub fn extent(&self) -> Vector<D> {
        self.extent
    }

    /// The upper corner of the box.
    pub fn upper(&self) -> Point<D> {
        self.origin + self.extent
    }

    /// The center of the box.
    pub fn center(&self) -> Point<D> {
        self.origin + self.extent * 0.5
    }

    /// Whether the point lies inside the box (boundary included).
    pub fn contains(&self, point: &Point<D>) -> bool {
        for k in 0..D {
            if point[k] < self.origin[k] || point[k] > self.origin[k] + self.extent[k] {
                return false;
            }
        }
        true
    }
}
