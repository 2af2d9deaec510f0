pub mod domain;
pub mod error;
pub mod field;
pub mod image;
pub mod spatial;
pub mod transform;

pub use domain::BoxDomain;
pub use error::{CoreError, Result};
pub use field::{DifferentiableField, Field};
pub use spatial::{Point, Vector};
