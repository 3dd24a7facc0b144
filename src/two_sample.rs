//! Two-sample tests on class labels.
//!
//! Both tests take the class label of each observation, listed in
//! ascending order of the measured value. Labels `0` and `1` name the two
//! samples; any other label is skipped, which lets callers mask
//! observations without rebuilding the array.

use crate::contingency::conchi;
use crate::distributions::rtlchsq;
use crate::error::{Result, StatsError};
use crate::ex;

/// Outcome of a two-sample test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSampleTest {
    /// Test statistic (KS distance D, or median-test χ²).
    pub statistic: f64,
    /// Observations labelled 0.
    pub n0: usize,
    /// Observations labelled 1.
    pub n1: usize,
    /// Asymptotic upper-tail probability of the statistic.
    pub tail: f64,
}

/// Two-sample Kolmogorov-Smirnov test.
///
/// D is the largest gap between the two empirical distribution functions
/// as the ordered observations are swept. The tail uses the Stephens
/// correction: `probks((√Nₑ + 0.12 + 0.11/√Nₑ)·D)` with
/// `Nₑ = n0·n1/(n0+n1)`.
///
/// # Errors
/// [`StatsError::DegenerateSample`] if either class is empty.
///
/// # Examples
/// ```
/// use statfn::two_sample::ks2;
/// let t = ks2(&[0, 0, 0, 1, 1, 1]).unwrap();
/// assert_eq!(t.statistic, 1.0);
/// assert_eq!((t.n0, t.n1), (3, 3));
/// ```
pub fn ks2(labels: &[i32]) -> Result<TwoSampleTest> {
    let (n0, n1) = class_counts("ks2", labels)?;
    let (step0, step1) = (1.0 / n0 as f64, 1.0 / n1 as f64);

    let mut y0 = 0.0;
    let mut y1 = 0.0;
    let mut d: f64 = 0.0;
    for &label in labels {
        match label {
            0 => y0 += step0,
            1 => y1 += step1,
            _ => continue,
        }
        d = d.max((y1 - y0).abs());
    }

    let en = (n0 as f64 * n1 as f64 / (n0 + n1) as f64).sqrt();
    let tail = probks((en + 0.12 + 0.11 / en) * d);
    Ok(TwoSampleTest {
        statistic: d,
        n0,
        n1,
        tail,
    })
}

/// Median test.
///
/// Splits the labelled observations at the rank median (the middle one of
/// an odd count goes to the upper half), tabulates class against half, and
/// returns the 2×2 [`conchi`] statistic with its χ²₁ tail.
///
/// # Errors
/// [`StatsError::DegenerateSample`] if either class is empty.
///
/// # Examples
/// ```
/// use statfn::two_sample::medchi;
/// let t = medchi(&[0, 0, 0, 0, 1, 1, 1, 1]).unwrap();
/// assert!((t.statistic - 8.0).abs() < 1e-12);
/// ```
pub fn medchi(labels: &[i32]) -> Result<TwoSampleTest> {
    let (n0, n1) = class_counts("medchi", labels)?;
    let half = (n0 + n1) / 2;

    // row = class, column = lower / upper half
    let mut table = [0.0; 4];
    let classes = labels.iter().filter(|&&l| l == 0 || l == 1);
    for (rank, &label) in classes.enumerate() {
        let upper = usize::from(rank >= half);
        table[2 * label as usize + upper] += 1.0;
    }

    let chi = conchi(&table, 2, 2)?;
    Ok(TwoSampleTest {
        statistic: chi,
        n0,
        n1,
        tail: rtlchsq(1, chi)?,
    })
}

/// Kolmogorov distribution upper tail Q(λ) = P(K > λ).
///
/// Returns 1 for λ ≤ 0 and NaN for NaN.
///
/// # Algorithm
/// Below λ = 1.18 the alternating terms decay too slowly, so the
/// theta-function form is used:
/// ```text
/// Q(λ) = 1 − (√(2π)/λ) Σ_{k≥1} e^{−(2k−1)²π²/(8λ²)}
/// ```
/// From λ = 1.18 up the alternating series is summed:
/// ```text
/// Q(λ) = 2 Σ_{j≥1} (−1)^{j−1} e^{−2j²λ²}
/// ```
/// Summation stops when a term is negligible against the previous term or
/// the running sum. Terms below e⁻²⁰ are flushed by [`ex`], so the tail
/// saturates to 0 for λ ≳ 3.2.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §14.3.
///
/// # Examples
/// ```
/// use statfn::two_sample::probks;
/// // theta-function branch
/// assert!((probks(0.5) - 0.9639452436648751).abs() < 1e-9);
/// assert!((probks(1.0) - 0.2699996716773546).abs() < 1e-9);
/// // alternating branch
/// assert!((probks(2.0) - 0.0006709252557796953).abs() < 1e-9);
/// assert_eq!(probks(0.0), 1.0);
/// ```
pub fn probks(lambda: f64) -> f64 {
    const EPS1: f64 = 0.001;
    const EPS2: f64 = 1.0e-8;
    const SWITCH: f64 = 1.18;

    if lambda.is_nan() {
        return f64::NAN;
    }
    if lambda <= 0.0 {
        return 1.0;
    }

    if lambda < SWITCH {
        let w = -std::f64::consts::PI.powi(2) / (8.0 * lambda * lambda);
        let mut sum = 0.0;
        for k in 1..=20 {
            let odd = (2 * k - 1) as f64;
            let term = (w * odd * odd).exp();
            sum += term;
            if term <= EPS2 * EPS2 * sum {
                break;
            }
        }
        let cdf = (2.0 * std::f64::consts::PI).sqrt() / lambda * sum;
        return (1.0 - cdf).clamp(0.0, 1.0);
    }

    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous = 0.0;
    for j in 1..=100 {
        let jf = j as f64;
        let term = fac * ex(a2 * jf * jf);
        sum += term;
        if term.abs() <= EPS1 * previous || term.abs() <= EPS2 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        previous = term.abs();
    }
    1.0
}

fn class_counts(func: &'static str, labels: &[i32]) -> Result<(usize, usize)> {
    let n0 = labels.iter().filter(|&&l| l == 0).count();
    let n1 = labels.iter().filter(|&&l| l == 1).count();
    if n0 == 0 || n1 == 0 {
        return Err(StatsError::DegenerateSample {
            func,
            reason: "both classes need at least one observation",
        });
    }
    Ok((n0, n1))
}
