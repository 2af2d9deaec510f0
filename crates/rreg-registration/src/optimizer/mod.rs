//! Gradient-based parameter optimization.

pub mod lbfgs;
pub mod trait_;

pub use lbfgs::{IterationState, Lbfgs, LbfgsConfig, LbfgsIterations};
pub use trait_::CostFunction;
