//! Registration driver: metric + regularizer wired to the optimizer.

use crate::error::Result;
use crate::metric::Metric;
use crate::optimizer::{CostFunction, IterationState, Lbfgs, LbfgsIterations};
use crate::regularization::{L2Regularizer, Regularizer};
use nalgebra::DVector;

/// Drives one registration: combines a metric with a weighted regularizer
/// into a single objective and hands it to the optimizer.
///
/// A driver has exactly two states, *not started* and *iterating*:
/// [`Registration::iterations`] moves straight from construction into the
/// lazy iteration stream. The stream is not restartable mid-way; calling
/// `iterations` again starts an independent run. Each yielded state's
/// `parameters` field is the authoritative estimate at that step, and the
/// caller selects the last element (or an earlier one under a custom
/// stopping rule) as the final answer.
pub struct Registration<M, R = L2Regularizer> {
    metric: M,
    regularizer: R,
    regularization_weight: f64,
    optimizer: Lbfgs,
}

impl<M: Metric> Registration<M> {
    /// Create a driver with no effective regularization (weight 0.0).
    pub fn new(metric: M, optimizer: Lbfgs) -> Self {
        Self {
            metric,
            regularizer: L2Regularizer::new(),
            regularization_weight: 0.0,
            optimizer,
        }
    }
}

impl<M: Metric, R: Regularizer> Registration<M, R> {
    /// Replace the regularizer and its weight.
    pub fn with_regularizer<R2: Regularizer>(self, regularizer: R2, weight: f64) -> Registration<M, R2> {
        Registration {
            metric: self.metric,
            regularizer,
            regularization_weight: weight,
            optimizer: self.optimizer,
        }
    }

    /// The metric being minimized.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// The regularization weight.
    pub fn regularization_weight(&self) -> f64 {
        self.regularization_weight
    }

    /// Start a run from the given initial parameters and return the lazy
    /// per-iteration stream.
    pub fn iterations(&self, initial: DVector<f64>) -> LbfgsIterations<RegularizedCost<'_, M, R>> {
        tracing::info!(
            metric = self.metric.name(),
            parameters = initial.len(),
            regularization_weight = self.regularization_weight,
            "starting registration"
        );
        let cost = RegularizedCost {
            metric: &self.metric,
            regularizer: &self.regularizer,
            weight: self.regularization_weight,
        };
        self.optimizer.iterations(cost, initial)
    }

    /// Run to completion and return the final iteration state, if any step
    /// was taken.
    pub fn run(&self, initial: DVector<f64>) -> Result<Option<IterationState>> {
        let mut last = None;
        for state in self.iterations(initial) {
            last = Some(state?);
        }
        Ok(last)
    }
}

/// Metric value plus weighted regularization penalty.
///
/// Weight 0.0 disables the regularizer entirely (it is not evaluated).
pub struct RegularizedCost<'a, M, R> {
    metric: &'a M,
    regularizer: &'a R,
    weight: f64,
}

impl<M: Metric, R: Regularizer> CostFunction for RegularizedCost<'_, M, R> {
    fn value(&self, parameters: &DVector<f64>) -> Result<f64> {
        let mut value = self.metric.value(parameters)?;
        if self.weight != 0.0 {
            value += self.weight * self.regularizer.value(parameters);
        }
        Ok(value)
    }

    fn gradient(&self, parameters: &DVector<f64>) -> Result<DVector<f64>> {
        let mut gradient = self.metric.derivative(parameters)?;
        if self.weight != 0.0 {
            gradient.axpy(self.weight, &self.regularizer.gradient(parameters), 1.0);
        }
        Ok(gradient)
    }
}
