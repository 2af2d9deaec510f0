//! Limited-memory BFGS optimizer.
//!
//! Standard L-BFGS two-loop recursion over a bounded history of parameter
//! and gradient differences, with Armijo backtracking line search. The
//! optimizer produces a lazy, pull-based stream of iteration states; the
//! curvature history lives inside one stream and is discarded with it.

use super::trait_::CostFunction;
use crate::error::Result;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// Curvature condition threshold for accepting an (s, y) pair.
const CURVATURE_EPS: f64 = 1e-10;
// Armijo sufficient-decrease constant.
const ARMIJO_C1: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// L-BFGS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LbfgsConfig {
    /// Hard cap on the number of iteration states produced.
    pub max_iterations: usize,
    /// Number of (s, y) pairs kept for the inverse-Hessian approximation.
    pub history_size: usize,
    /// Stream ends once the gradient norm falls below this.
    pub gradient_tolerance: f64,
    /// Scale of the first step, before any curvature information exists.
    pub initial_step: f64,
}

impl Default for LbfgsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            history_size: 10,
            gradient_tolerance: 1e-8,
            initial_step: 1.0,
        }
    }
}

impl LbfgsConfig {
    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the history size.
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    /// Set the gradient-norm convergence tolerance.
    pub fn with_gradient_tolerance(mut self, gradient_tolerance: f64) -> Self {
        self.gradient_tolerance = gradient_tolerance;
        self
    }

    /// Set the first-step scale.
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.initial_step = initial_step;
        self
    }
}

/// One optimizer step: the authoritative parameters after the step, the
/// objective value there, and the gradient norm.
#[derive(Debug, Clone, Serialize)]
pub struct IterationState {
    /// 1-based index of the completed step.
    pub iteration: usize,
    /// Parameter estimate after the step.
    pub parameters: DVector<f64>,
    /// Objective value at `parameters`.
    pub value: f64,
    /// Gradient norm at `parameters`.
    pub gradient_norm: f64,
}

/// Limited-memory BFGS minimizer.
#[derive(Debug, Clone)]
pub struct Lbfgs {
    config: LbfgsConfig,
}

impl Lbfgs {
    /// Create an optimizer with the given iteration cap and default
    /// history, tolerance, and step scale.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            config: LbfgsConfig::default().with_max_iterations(max_iterations),
        }
    }

    /// Create an optimizer from a full configuration.
    pub fn with_config(config: LbfgsConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LbfgsConfig {
        &self.config
    }

    /// Minimize `cost` starting from `initial`, returning the lazy stream
    /// of iteration states.
    ///
    /// The stream is finite (at most `max_iterations` elements), produced
    /// one state per pull, and ends early when the gradient norm drops
    /// below tolerance or no descent step can be found. An evaluation
    /// failure surfaces as an `Err` element and ends the stream. The
    /// internal curvature history is owned by the returned iterator and is
    /// not shared across runs.
    pub fn iterations<C: CostFunction>(&self, cost: C, initial: DVector<f64>) -> LbfgsIterations<C> {
        LbfgsIterations {
            cost,
            config: self.config.clone(),
            parameters: initial,
            value: 0.0,
            gradient: DVector::zeros(0),
            s_history: VecDeque::new(),
            y_history: VecDeque::new(),
            rho_history: VecDeque::new(),
            iteration: 0,
            started: false,
            done: false,
        }
    }
}

/// Lazy iteration stream of an L-BFGS run. Not restartable; a new run is
/// obtained from [`Lbfgs::iterations`].
pub struct LbfgsIterations<C> {
    cost: C,
    config: LbfgsConfig,
    parameters: DVector<f64>,
    value: f64,
    gradient: DVector<f64>,
    s_history: VecDeque<DVector<f64>>,
    y_history: VecDeque<DVector<f64>>,
    rho_history: VecDeque<f64>,
    iteration: usize,
    started: bool,
    done: bool,
}

impl<C: CostFunction> LbfgsIterations<C> {
    /// Two-loop recursion: approximate `H * g` from the stored history.
    fn search_direction(&self) -> DVector<f64> {
        let mut q = self.gradient.clone();
        let len = self.s_history.len();
        if len == 0 {
            return q * self.config.initial_step;
        }

        let mut alphas = vec![0.0; len];
        for i in (0..len).rev() {
            let alpha = self.rho_history[i] * self.s_history[i].dot(&q);
            alphas[i] = alpha;
            q.axpy(-alpha, &self.y_history[i], 1.0);
        }

        // Initial Hessian scaling: gamma = (s^T y) / (y^T y).
        let last_s = &self.s_history[len - 1];
        let last_y = &self.y_history[len - 1];
        let gamma = last_s.dot(last_y) / last_y.dot(last_y);
        let mut r = q * gamma;

        for i in 0..len {
            let beta = self.rho_history[i] * self.y_history[i].dot(&r);
            r.axpy(alphas[i] - beta, &self.s_history[i], 1.0);
        }
        r
    }

    fn push_history(&mut self, s: DVector<f64>, y: DVector<f64>) {
        let ys = y.dot(&s);
        if ys > CURVATURE_EPS {
            if self.s_history.len() >= self.config.history_size {
                self.s_history.pop_front();
                self.y_history.pop_front();
                self.rho_history.pop_front();
            }
            self.s_history.push_back(s);
            self.y_history.push_back(y);
            self.rho_history.push_back(1.0 / ys);
        }
    }

    fn evaluate_start(&mut self) -> Result<()> {
        self.value = self.cost.value(&self.parameters)?;
        self.gradient = self.cost.gradient(&self.parameters)?;
        self.started = true;
        Ok(())
    }
}

impl<C: CostFunction> Iterator for LbfgsIterations<C> {
    type Item = Result<IterationState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            if let Err(err) = self.evaluate_start() {
                self.done = true;
                return Some(Err(err));
            }
        }
        if self.iteration >= self.config.max_iterations
            || self.gradient.norm() < self.config.gradient_tolerance
        {
            self.done = true;
            return None;
        }

        // Descent direction; fall back to steepest descent if the
        // approximation loses positive definiteness numerically.
        let mut direction = self.search_direction();
        let mut slope = self.gradient.dot(&direction);
        if slope <= 0.0 {
            direction = self.gradient.clone() * self.config.initial_step;
            slope = self.gradient.dot(&direction);
            if slope <= 0.0 {
                self.done = true;
                return None;
            }
        }

        // Armijo backtracking: f(x - a*d) <= f(x) - c1 * a * g.d
        // A candidate that leaves the evaluable domain shortens the step
        // like any rejected one; the error only surfaces if no step length
        // stays evaluable.
        let mut step = 1.0;
        let mut accepted = None;
        let mut last_error = None;
        for _ in 0..MAX_BACKTRACKS {
            let candidate = &self.parameters - &direction * step;
            match self.cost.value(&candidate) {
                Ok(candidate_value) => {
                    if candidate_value <= self.value - ARMIJO_C1 * step * slope {
                        accepted = Some((candidate, candidate_value));
                        break;
                    }
                }
                Err(err) => last_error = Some(err),
            }
            step *= 0.5;
        }

        let (new_parameters, new_value) = match accepted {
            Some(found) => found,
            None => {
                self.done = true;
                if let Some(err) = last_error {
                    return Some(Err(err));
                }
                tracing::debug!(
                    iteration = self.iteration,
                    "line search found no descent step; stopping"
                );
                return None;
            }
        };

        let new_gradient = match self.cost.gradient(&new_parameters) {
            Ok(gradient) => gradient,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };

        let s = &new_parameters - &self.parameters;
        let y = &new_gradient - &self.gradient;
        self.push_history(s, y);

        self.parameters = new_parameters;
        self.value = new_value;
        self.gradient = new_gradient;
        self.iteration += 1;

        let gradient_norm = self.gradient.norm();
        tracing::debug!(
            iteration = self.iteration,
            value = self.value,
            gradient_norm,
            "lbfgs step"
        );
        if gradient_norm < self.config.gradient_tolerance {
            self.done = true;
        }

        Some(Ok(IterationState {
            iteration: self.iteration,
            parameters: self.parameters.clone(),
            value: self.value,
            gradient_norm,
        }))
    }
}
