//! Discrete images and their continuous, differentiable views.

pub mod discrete;
pub mod linear;

pub use discrete::DiscreteImage;
pub use linear::LinearImage;
