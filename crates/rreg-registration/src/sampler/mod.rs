//! Point samplers for integral approximation over spatial domains.

pub mod grid;
pub mod trait_;
pub mod uniform;

pub use grid::GridSampler;
pub use trait_::Sampler;
pub use uniform::UniformSampler;
