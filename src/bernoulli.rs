//! Bernoulli numbers B₀ … B₁₀₀.
//!
//! The numbers are computed once into a [`BernoulliTable`] and then read
//! without locking. A process-wide table backs the free functions
//! [`bernload`] and [`bernum`] and is filled only by [`bernload`].
//! [`psi`](crate::special::psi) and [`tau`](crate::special::tau) read a
//! separate private table, so calling them never makes [`bernum`] succeed.
//!
//! # Algorithm
//! Odd indices above 1 vanish, B₁ = −½, and for k ≥ 1
//! ```text
//! B₂ₖ = (−1)^{k+1} · 2 · (2k)! · ζ(2k) / (2π)^{2k}
//! ```
//! with ζ(2k) summed directly and closed with an Euler-Maclaurin tail.
//! The factorial-to-power ratio is built incrementally so that neither
//! factor overflows on its own.

use std::sync::OnceLock;

use tracing::debug;

use crate::error::{Result, StatsError};

/// Largest index held by the table.
pub const MAX_INDEX: usize = 100;

static SHARED: BernoulliTable = BernoulliTable::new();

static SERIES: BernoulliTable = BernoulliTable::new();

/// A lazily computed table of Bernoulli numbers.
///
/// `load` is idempotent and safe to call from many threads; the first
/// caller computes the table and the rest wait on the one-time barrier.
#[derive(Debug, Default)]
pub struct BernoulliTable {
    values: OnceLock<Vec<f64>>,
}

impl BernoulliTable {
    /// Creates an empty, unloaded table.
    pub const fn new() -> Self {
        Self {
            values: OnceLock::new(),
        }
    }

    /// Computes the table if necessary and returns B₀ … B₁₀₀.
    pub fn load(&self) -> &[f64] {
        self.values.get_or_init(|| {
            debug!(max_index = MAX_INDEX, "computing Bernoulli table");
            compute_table()
        })
    }

    /// Whether [`load`](Self::load) has completed.
    pub fn is_loaded(&self) -> bool {
        self.values.get().is_some()
    }

    /// Returns Bₙ.
    ///
    /// # Errors
    /// - [`StatsError::Uninitialized`] if the table has not been loaded.
    /// - [`StatsError::OutOfRange`] if `n > MAX_INDEX`.
    ///
    /// # Examples
    /// ```
    /// use statfn::bernoulli::BernoulliTable;
    /// use statfn::StatsError;
    /// let table = BernoulliTable::new();
    /// assert_eq!(table.get(2), Err(StatsError::Uninitialized));
    /// table.load();
    /// assert!((table.get(2).unwrap() - 1.0 / 6.0).abs() < 1e-15);
    /// ```
    pub fn get(&self, n: usize) -> Result<f64> {
        let values = self.values.get().ok_or(StatsError::Uninitialized)?;
        values.get(n).copied().ok_or(StatsError::OutOfRange {
            index: n,
            max: MAX_INDEX,
        })
    }
}

/// Loads the process-wide Bernoulli table. Idempotent.
pub fn bernload() {
    SHARED.load();
}

/// Returns Bₙ from the process-wide table.
///
/// # Errors
/// Fails with [`StatsError::Uninitialized`] until [`bernload`] has run,
/// and with [`StatsError::OutOfRange`] for `n > MAX_INDEX`.
pub fn bernum(n: usize) -> Result<f64> {
    SHARED.get(n)
}

/// Coefficients for the digamma and trigamma asymptotic series, loading
/// them if needed. Independent of the table behind [`bernum`].
pub(crate) fn series_coefficients() -> &'static [f64] {
    SERIES.load()
}

fn compute_table() -> Vec<f64> {
    let mut table = vec![0.0; MAX_INDEX + 1];
    table[0] = 1.0;
    table[1] = -0.5;

    let two_pi_sq = (2.0 * std::f64::consts::PI).powi(2);
    // (2k)! / (2π)^{2k}
    let mut ratio = 1.0;
    for k in 1..=MAX_INDEX / 2 {
        let n = 2 * k;
        ratio *= (n - 1) as f64 * n as f64 / two_pi_sq;
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        table[n] = sign * 2.0 * ratio * zeta_even(n as f64);
    }
    table
}

/// Riemann ζ(s) for real s ≥ 2.
fn zeta_even(s: f64) -> f64 {
    const TERMS: usize = 1000;

    let n = TERMS as f64;
    let f = n.powf(-s);
    // Σ_{j ≥ N} j^{-s} by Euler-Maclaurin
    let mut sum = n * f / (s - 1.0) + 0.5 * f + s * f / (12.0 * n)
        - s * (s + 1.0) * (s + 2.0) * f / (720.0 * n * n * n);

    for j in (1..TERMS).rev() {
        sum += (j as f64).powf(-s);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rel(actual: f64, expected: f64, tol: f64) {
        let rel = ((actual - expected) / expected).abs();
        assert!(rel < tol, "got {actual}, expected {expected} (rel {rel})");
    }

    #[test]
    fn test_uninitialized_fails() {
        let table = BernoulliTable::new();
        assert!(!table.is_loaded());
        assert_eq!(table.get(0), Err(StatsError::Uninitialized));
        assert_eq!(table.get(1000), Err(StatsError::Uninitialized));
    }

    #[test]
    fn test_load_idempotent() {
        let table = BernoulliTable::new();
        let first = table.load().as_ptr();
        let second = table.load().as_ptr();
        assert_eq!(first, second);
        assert!(table.is_loaded());
    }

    #[test]
    fn test_out_of_range() {
        let table = BernoulliTable::new();
        table.load();
        assert_eq!(
            table.get(MAX_INDEX + 1),
            Err(StatsError::OutOfRange {
                index: MAX_INDEX + 1,
                max: MAX_INDEX
            })
        );
        assert!(table.get(MAX_INDEX).is_ok());
    }

    #[test]
    fn test_known_values() {
        let table = BernoulliTable::new();
        table.load();
        assert_eq!(table.get(0).unwrap(), 1.0);
        assert_eq!(table.get(1).unwrap(), -0.5);
        assert_rel(table.get(2).unwrap(), 1.0 / 6.0, 1e-13);
        assert_rel(table.get(4).unwrap(), -1.0 / 30.0, 1e-13);
        assert_rel(table.get(6).unwrap(), 1.0 / 42.0, 1e-13);
        assert_rel(table.get(8).unwrap(), -1.0 / 30.0, 1e-13);
        assert_rel(table.get(10).unwrap(), 5.0 / 66.0, 1e-13);
        assert_rel(table.get(12).unwrap(), -691.0 / 2730.0, 1e-13);
        assert_rel(table.get(20).unwrap(), -174611.0 / 330.0, 1e-12);
    }

    #[test]
    fn test_odd_indices_vanish() {
        let table = BernoulliTable::new();
        table.load();
        for n in (3..=MAX_INDEX).step_by(2) {
            assert_eq!(table.get(n).unwrap(), 0.0, "B_{n} should be 0");
        }
    }

    #[test]
    fn test_signs_alternate() {
        let table = BernoulliTable::new();
        let values = table.load();
        for k in 1..=MAX_INDEX / 2 {
            let expected_positive = k % 2 == 1;
            assert_eq!(values[2 * k] > 0.0, expected_positive, "sign of B_{}", 2 * k);
        }
    }

    #[test]
    fn test_shared_table() {
        bernload();
        bernload();
        assert_rel(bernum(2).unwrap(), 1.0 / 6.0, 1e-13);
        assert!(bernum(MAX_INDEX + 1).is_err());
    }

    #[test]
    fn test_series_coefficients_match_table() {
        let table = BernoulliTable::new();
        assert_eq!(series_coefficients(), table.load());
    }

    #[test]
    fn test_zeta_known() {
        let pi = std::f64::consts::PI;
        assert_rel(zeta_even(2.0), pi * pi / 6.0, 1e-14);
        assert_rel(zeta_even(4.0), pi.powi(4) / 90.0, 1e-14);
    }
}
