//! Error types for statfn.

use thiserror::Error;

/// Result type alias using statfn's [`StatsError`].
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors reported by the statistical routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Argument outside the mathematical domain of the function.
    #[error("{func}: argument {arg} out of domain ({reason})")]
    Domain {
        /// Routine that rejected the argument
        func: &'static str,
        /// Offending value
        arg: f64,
        /// Which constraint was violated
        reason: &'static str,
    },

    /// Iteration cap reached before the requested tolerance.
    #[error("{func}: no convergence after {iterations} iterations (best estimate {best})")]
    NoConvergence {
        /// Routine that gave up
        func: &'static str,
        /// Iterations performed
        iterations: usize,
        /// Best-effort estimate at exit
        best: f64,
    },

    /// The answer lies beyond the largest value the routine represents.
    #[error("{func}: result exceeds representable limit {limit}")]
    Saturated {
        /// Routine that saturated
        func: &'static str,
        /// The ceiling that was hit
        limit: f64,
    },

    /// Bernoulli table read before it was loaded.
    #[error("Bernoulli table accessed before load()")]
    Uninitialized,

    /// Bernoulli index past the precomputed range.
    #[error("Bernoulli index {index} out of range (max {max})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Largest precomputed index
        max: usize,
    },

    /// Input carries no information for the statistic.
    #[error("{func}: degenerate sample ({reason})")]
    DegenerateSample {
        /// Routine that rejected the sample
        func: &'static str,
        /// What is missing
        reason: &'static str,
    },
}

impl StatsError {
    pub(crate) fn domain(func: &'static str, arg: f64, reason: &'static str) -> Self {
        StatsError::Domain { func, arg, reason }
    }
}
