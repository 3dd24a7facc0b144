//! Solver configuration for the iterative routines.
//!
//! [`critchi_with`](crate::distributions::critchi_with),
//! [`zprob_with`](crate::normal::zprob_with) and
//! [`mleg_with`](crate::gamma_fit::mleg_with) take a [`SolverConfig`];
//! their plain counterparts use [`SolverConfig::default`].

use crate::error::{Result, StatsError};
use crate::CHI_EPSILON;

/// Convergence policy for root finders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Absolute tolerance on the solution. Default: [`CHI_EPSILON`].
    pub tolerance: f64,

    /// Hard cap on iterations. Default: 200.
    ///
    /// Reaching the cap yields [`StatsError::NoConvergence`] carrying the
    /// best estimate, never an unbounded loop.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: CHI_EPSILON,
            max_iterations: 200,
        }
    }
}

impl SolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the tolerance is positive and finite and the cap non-zero.
    ///
    /// # Examples
    /// ```
    /// use statfn::config::SolverConfig;
    /// assert!(SolverConfig::default().validate().is_ok());
    /// assert!(SolverConfig::new().with_tolerance(0.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(StatsError::domain(
                "SolverConfig",
                self.tolerance,
                "tolerance must be positive and finite",
            ));
        }
        if self.max_iterations == 0 {
            return Err(StatsError::domain(
                "SolverConfig",
                0.0,
                "max_iterations must be non-zero",
            ));
        }
        Ok(())
    }
}
