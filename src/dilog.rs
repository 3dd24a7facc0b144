//! Dilogarithm.
//!
//! Two conventions are provided:
//!
//! - [`li2`]: Spence's function Li₂(x) = −∫₀ˣ ln(1−t)/t dt, real for x ≤ 1.
//! - [`dilog`]: the Abramowitz & Stegun form (27.7)
//!   f(x) = −∫₁ˣ ln t/(t−1) dt = Li₂(1−x), real for x ≥ 0.

use std::f64::consts::PI;

use crate::error::{Result, StatsError};

const PI2_6: f64 = PI * PI / 6.0;

/// Spence's function Li₂(x) for x ≤ 1.
///
/// # Algorithm
/// The argument is mapped into [0, ½] and the power series Σ zᵏ/k² summed
/// there:
/// - x > ½: Li₂(x) = π²/6 − ln x · ln(1−x) − Li₂(1−x)
/// - −1 ≤ x < 0: Li₂(x) = −Li₂(x/(x−1)) − ½ ln²(1−x)
/// - x < −1: Li₂(x) = −π²/6 − ½ ln²(−x) − Li₂(1/x)
///
/// # Errors
/// [`StatsError::Domain`] for x > 1 (complex result) or NaN.
///
/// # Examples
/// ```
/// use statfn::dilog::li2;
/// let pi = std::f64::consts::PI;
/// assert!((li2(-1.0).unwrap() + pi * pi / 12.0).abs() < 1e-14);
/// assert!((li2(1.0).unwrap() - pi * pi / 6.0).abs() < 1e-15);
/// ```
pub fn li2(x: f64) -> Result<f64> {
    if x.is_nan() || x > 1.0 {
        return Err(StatsError::domain("li2", x, "requires x <= 1"));
    }
    Ok(spence(x))
}

/// Abramowitz & Stegun dilogarithm f(x) = Li₂(1−x) for x ≥ 0.
///
/// # Errors
/// [`StatsError::Domain`] for x < 0 or NaN.
///
/// # Examples
/// ```
/// use statfn::dilog::dilog;
/// assert_eq!(dilog(1.0).unwrap(), 0.0);
/// let pi = std::f64::consts::PI;
/// assert!((dilog(0.0).unwrap() - pi * pi / 6.0).abs() < 1e-15);
/// ```
pub fn dilog(x: f64) -> Result<f64> {
    if x.is_nan() || x < 0.0 {
        return Err(StatsError::domain("dilog", x, "requires x >= 0"));
    }
    Ok(spence(1.0 - x))
}

fn spence(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    if x == 1.0 {
        return PI2_6;
    }
    if x > 0.5 {
        return PI2_6 - x.ln() * (-x).ln_1p() - series(1.0 - x);
    }
    if x > 0.0 {
        return series(x);
    }
    if x >= -1.0 {
        let l = (-x).ln_1p();
        return -series(x / (x - 1.0)) - 0.5 * l * l;
    }
    let l = (-x).ln();
    -PI2_6 - 0.5 * l * l - spence(1.0 / x)
}

/// Σ zᵏ/k² for |z| ≤ ½.
fn series(z: f64) -> f64 {
    let mut power = z;
    let mut sum = z;
    for k in 2..=200 {
        power *= z;
        let term = power / (k * k) as f64;
        sum += term;
        if term.abs() < 1e-17 * sum.abs() {
            break;
        }
    }
    sum
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn euler_reflection(x in 0.001_f64..0.999) {
            let lhs = li2(x).unwrap() + li2(1.0 - x).unwrap();
            let rhs = PI2_6 - x.ln() * (1.0 - x).ln();
            prop_assert!((lhs - rhs).abs() < 1e-13);
        }

        #[test]
        fn derivative_matches(x in -20.0_f64..0.95) {
            // d/dx Li₂(x) = −ln(1−x)/x
            prop_assume!(x.abs() > 1e-3);
            let h = 1e-6;
            let numeric = (li2(x + h).unwrap() - li2(x - h).unwrap()) / (2.0 * h);
            let exact = -(1.0 - x).ln() / x;
            prop_assert!((numeric - exact).abs() < 1e-6, "x={x}: {numeric} vs {exact}");
        }

        #[test]
        fn duplication(x in -0.99_f64..0.99) {
            // Li₂(x) + Li₂(−x) = ½ Li₂(x²)
            let lhs = li2(x).unwrap() + li2(-x).unwrap();
            let rhs = 0.5 * li2(x * x).unwrap();
            prop_assert!((lhs - rhs).abs() < 1e-13);
        }
    }
}
