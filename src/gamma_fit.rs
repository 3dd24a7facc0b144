//! Maximum-likelihood fit of a gamma distribution.
//!
//! For positive data x₁..xₙ the gamma log-likelihood depends on the sample
//! only through `a1 = mean(x)` and `a2 = mean(ln x)`. The shape `p` solves
//! ```text
//! ln p − ψ(p) = ln a1 − a2
//! ```
//! and the rate follows as `λ = p / a1`.

use tracing::warn;

use crate::config::SolverConfig;
use crate::error::{Result, StatsError};
use crate::special::{psi, tau};

/// Fitted gamma parameters; density ∝ x^(shape−1) e^(−rate·x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaFit {
    /// Shape parameter p.
    pub shape: f64,
    /// Rate parameter λ.
    pub rate: f64,
}

/// Maximum-likelihood gamma parameters from `a1 = mean(x)` and
/// `a2 = mean(ln x)`, with the default [`SolverConfig`].
///
/// # Errors
/// - [`StatsError::Domain`] if `a1 ≤ 0`, or if `ln a1 − a2 ≤ 0` (by Jensen's
///   inequality only constant data reach 0, and it has no finite shape).
/// - [`StatsError::NoConvergence`] if the Newton iteration hits its cap.
///
/// # Examples
/// ```
/// use statfn::gamma_fit::mleg;
/// let xs = [0.8_f64, 1.9, 2.4, 3.1, 5.0];
/// let a1 = xs.iter().sum::<f64>() / 5.0;
/// let a2 = xs.iter().map(|x| x.ln()).sum::<f64>() / 5.0;
/// let fit = mleg(a1, a2).unwrap();
/// assert!(fit.shape > 0.0);
/// assert!((fit.shape / fit.rate - a1).abs() < 1e-12);
/// ```
pub fn mleg(a1: f64, a2: f64) -> Result<GammaFit> {
    mleg_with(a1, a2, &SolverConfig::default())
}

/// [`mleg`] with an explicit solver configuration.
///
/// # Algorithm
/// Newton iteration on `ln p − ψ(p) − s` (derivative `1/p − ψ′(p)`),
/// seeded with Minka's closed-form approximation
/// `p₀ = (3 − s + √((s − 3)² + 24s)) / (12s)`. A step that would make `p`
/// non-positive halves it instead. Stops when the step is below
/// `config.tolerance · max(p, 1)`.
///
/// Reference: Minka, T. (2002), *Estimating a Gamma distribution*.
pub fn mleg_with(a1: f64, a2: f64, config: &SolverConfig) -> Result<GammaFit> {
    config.validate()?;
    if a1.is_nan() || a1 <= 0.0 {
        return Err(StatsError::domain("mleg", a1, "mean must be positive"));
    }
    let s = a1.ln() - a2;
    if s.is_nan() || s <= 0.0 {
        return Err(StatsError::domain(
            "mleg",
            s,
            "requires ln(mean) > mean(ln), i.e. non-constant data",
        ));
    }

    let mut p = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    for _ in 0..config.max_iterations {
        let f = p.ln() - psi(p)? - s;
        let df = 1.0 / p - tau(p)?;
        if df == 0.0 || !df.is_finite() {
            break;
        }
        let step = f / df;
        let next = if p - step > 0.0 { p - step } else { 0.5 * p };
        let moved = (next - p).abs();
        p = next;
        if moved < config.tolerance * p.max(1.0) {
            return Ok(GammaFit {
                shape: p,
                rate: p / a1,
            });
        }
    }

    warn!(a1, a2, best = p, "mleg: Newton iteration did not converge");
    Err(StatsError::NoConvergence {
        func: "mleg",
        iterations: config.max_iterations,
        best: p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Population moments of Gamma(shape, rate): E[x] = k/r, E[ln x] = ψ(k) − ln r.
    fn moments(shape: f64, rate: f64) -> (f64, f64) {
        (shape / rate, psi(shape).unwrap() - rate.ln())
    }

    #[test]
    fn test_recovers_population_parameters() {
        for &(k, r) in &[(0.3, 2.0), (1.0, 1.0), (2.5, 0.4), (12.0, 3.0), (150.0, 10.0)] {
            let (a1, a2) = moments(k, r);
            let fit = mleg(a1, a2).unwrap();
            assert!(((fit.shape - k) / k).abs() < 1e-6, "shape {k}: {}", fit.shape);
            assert!(((fit.rate - r) / r).abs() < 1e-6, "rate {r}: {}", fit.rate);
        }
    }

    #[test]
    fn test_solution_satisfies_likelihood_equation() {
        let xs = [1.0_f64, 2.0, 3.0, 4.0];
        let a1 = 2.5;
        let a2 = xs.iter().map(|x| x.ln()).sum::<f64>() / 4.0;
        let cfg = SolverConfig::new().with_tolerance(1e-12);
        let fit = mleg_with(a1, a2, &cfg).unwrap();
        let residual = fit.shape.ln() - psi(fit.shape).unwrap() - (a1.ln() - a2);
        assert!(residual.abs() < 1e-12);
    }

    #[test]
    fn test_exponential_data() {
        // shape 1: ln a1 − a2 = γ (Euler-Mascheroni)
        let euler = 0.577_215_664_901_532_9;
        let fit = mleg(2.0, 2.0_f64.ln() - euler).unwrap();
        assert!((fit.shape - 1.0).abs() < 1e-6);
        assert!((fit.rate - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_domain() {
        assert!(matches!(mleg(0.0, -1.0), Err(StatsError::Domain { .. })));
        assert!(mleg(-1.0, 0.0).is_err());
        // constant data: ln a1 == a2
        assert!(mleg(3.0, 3.0_f64.ln()).is_err());
        // violates Jensen
        assert!(mleg(1.0, 0.5).is_err());
        assert!(mleg(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_iteration_cap() {
        let (a1, a2) = moments(4.0, 1.0);
        let cfg = SolverConfig::new()
            .with_tolerance(1e-300)
            .with_max_iterations(1);
        match mleg_with(a1, a2, &cfg) {
            Err(StatsError::NoConvergence {
                iterations, best, ..
            }) => {
                assert_eq!(iterations, 1);
                assert!((best - 4.0).abs() < 1e-2);
            }
            other => panic!("expected NoConvergence, got {other:?}"),
        }
    }
}
