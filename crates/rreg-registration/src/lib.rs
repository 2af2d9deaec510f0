pub mod error;
pub mod metric;
pub mod optimizer;
pub mod registration;
pub mod regularization;
pub mod sampler;

pub use error::{RegistrationError, Result};
pub use optimizer::{CostFunction, IterationState, Lbfgs, LbfgsConfig};
pub use registration::Registration;
