//! Binomial log-probabilities and tail probabilities.
//!
//! Tails are accumulated in log space (log-sum-exp), so [`binlogtail`]
//! stays finite long after [`binomtail`] has underflowed to zero.

use crate::error::{Result, StatsError};
use crate::special::xlogy;

/// Which tail of the binomial distribution to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// P(X ≥ t)
    Upper,
    /// P(X ≤ t)
    Lower,
}

/// Log probabilities ln P(X = k) for k = 0..=n, X ~ Binomial(n, p).
///
/// Binomial coefficients come from a running sum of ln i, which is exact
/// to rounding for every n. Uses 0 · ln 0 = 0 at p = 0 and p = 1.
///
/// # Errors
/// [`StatsError::Domain`] if `p` is NaN or outside `[0, 1]`.
///
/// # Examples
/// ```
/// use statfn::binomial::genlogbin;
/// let logs = genlogbin(2, 0.5).unwrap();
/// assert!((logs[1] - 0.5_f64.ln()).abs() < 1e-15);
/// ```
pub fn genlogbin(n: usize, p: f64) -> Result<Vec<f64>> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(StatsError::domain("genlogbin", p, "requires 0 <= p <= 1"));
    }

    let mut log_fact = Vec::with_capacity(n + 1);
    let mut acc = 0.0;
    log_fact.push(acc);
    for i in 1..=n {
        acc += (i as f64).ln();
        log_fact.push(acc);
    }

    Ok((0..=n)
        .map(|k| {
            let log_choose = log_fact[n] - log_fact[k] - log_fact[n - k];
            log_choose + xlogy(k as f64, p) + xlogy((n - k) as f64, 1.0 - p)
        })
        .collect())
}

/// Natural log of a binomial tail probability.
///
/// `Tail::Upper` gives ln P(X ≥ t), `Tail::Lower` gives ln P(X ≤ t).
/// An empty tail (t > n for the upper tail) is −∞.
///
/// # Errors
/// [`StatsError::Domain`] if `p` is NaN or outside `[0, 1]`.
///
/// # Examples
/// ```
/// use statfn::binomial::{binlogtail, Tail};
/// // all heads in 2000 fair tosses
/// let l = binlogtail(2000, 2000, 0.5, Tail::Upper).unwrap();
/// assert!((l - 2000.0 * 0.5_f64.ln()).abs() < 1e-9);
/// ```
pub fn binlogtail(n: usize, t: usize, p: f64, tail: Tail) -> Result<f64> {
    let logs = genlogbin(n, p)?;
    let range = match tail {
        Tail::Upper => &logs[t.min(n + 1)..],
        Tail::Lower => &logs[..=t.min(n)],
    };
    Ok(log_sum_exp(range))
}

/// Binomial tail probability: P(X ≥ t) or P(X ≤ t).
///
/// # Errors
/// [`StatsError::Domain`] if `p` is NaN or outside `[0, 1]`.
///
/// # Examples
/// ```
/// use statfn::binomial::{binomtail, Tail};
/// // P(X ≥ 8) for 10 fair tosses = 56/1024
/// let p = binomtail(10, 8, 0.5, Tail::Upper).unwrap();
/// assert!((p - 56.0 / 1024.0).abs() < 1e-14);
/// ```
pub fn binomtail(n: usize, t: usize, p: f64, tail: Tail) -> Result<f64> {
    Ok(binlogtail(n, t, p, tail)?.exp().min(1.0))
}

fn log_sum_exp(logs: &[f64]) -> f64 {
    let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    max + logs.iter().map(|&l| (l - max).exp()).sum::<f64>().ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genlogbin_sums_to_one() {
        for &(n, p) in &[(1, 0.3), (10, 0.5), (57, 0.12), (400, 0.9)] {
            let total: f64 = genlogbin(n, p).unwrap().iter().map(|l| l.exp()).sum();
            assert!((total - 1.0).abs() < 1e-12, "n={n}, p={p}: {total}");
        }
    }

    #[test]
    fn test_genlogbin_degenerate_p() {
        let zero = genlogbin(5, 0.0).unwrap();
        assert_eq!(zero[0], 0.0);
        assert!(zero[1..].iter().all(|&l| l == f64::NEG_INFINITY));
        let one = genlogbin(5, 1.0).unwrap();
        assert_eq!(one[5], 0.0);
        assert!(one[..5].iter().all(|&l| l == f64::NEG_INFINITY));
    }

    #[test]
    fn test_genlogbin_n_zero() {
        assert_eq!(genlogbin(0, 0.4).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_binomtail_fair_coin() {
        let upper = binomtail(10, 8, 0.5, Tail::Upper).unwrap();
        let lower = binomtail(10, 2, 0.5, Tail::Lower).unwrap();
        assert!((upper - 56.0 / 1024.0).abs() < 1e-14);
        assert!((lower - upper).abs() < 1e-14);
    }

    #[test]
    fn test_binomtail_boundaries() {
        assert!((binomtail(10, 0, 0.3, Tail::Upper).unwrap() - 1.0).abs() < 1e-14);
        assert!((binomtail(10, 10, 0.3, Tail::Lower).unwrap() - 1.0).abs() < 1e-14);
        assert!((binomtail(10, 25, 0.3, Tail::Lower).unwrap() - 1.0).abs() < 1e-14);
        assert_eq!(binomtail(10, 11, 0.3, Tail::Upper).unwrap(), 0.0);
        assert_eq!(
            binlogtail(10, 11, 0.3, Tail::Upper).unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_binomtail_p_zero() {
        assert_eq!(binomtail(8, 1, 0.0, Tail::Upper).unwrap(), 0.0);
        assert_eq!(binomtail(8, 0, 0.0, Tail::Lower).unwrap(), 1.0);
    }

    #[test]
    fn test_binlogtail_beyond_underflow() {
        // P(X ≥ 1990) for 2000 fair tosses underflows but its log does not
        let l = binlogtail(2000, 1990, 0.5, Tail::Upper).unwrap();
        assert!(l.is_finite() && l < -1200.0);
        assert_eq!(binomtail(2000, 1990, 0.5, Tail::Upper).unwrap(), 0.0);
    }

    #[test]
    fn test_domain() {
        assert!(matches!(genlogbin(3, 1.5), Err(StatsError::Domain { .. })));
        assert!(binomtail(3, 1, -0.1, Tail::Upper).is_err());
        assert!(binlogtail(3, 1, f64::NAN, Tail::Lower).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn tails_are_complementary(n in 1_usize..300, frac in 0.0_f64..1.0, p in 0.01_f64..0.99) {
            let t = ((n as f64 * frac) as usize).max(1).min(n);
            let upper = binomtail(n, t, p, Tail::Upper).unwrap();
            let lower = binomtail(n, t - 1, p, Tail::Lower).unwrap();
            prop_assert!((upper + lower - 1.0).abs() < 1e-10);
        }

        #[test]
        fn upper_tail_decreasing_in_t(n in 1_usize..200, p in 0.01_f64..0.99) {
            let tails: Vec<f64> = (0..=n)
                .map(|t| binomtail(n, t, p, Tail::Upper).unwrap())
                .collect();
            for w in tails.windows(2) {
                prop_assert!(w[1] <= w[0] + 1e-12);
            }
        }
    }
}
