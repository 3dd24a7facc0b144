//! Tracy-Widom distribution (β = 1) and the eigenvalue normalisation used
//! to test the largest eigenvalue of a sample covariance matrix.
//!
//! The CDF is expressed through the Hastings-McLeod solution q of
//! Painlevé II, `q'' = s·q + 2q³` with `q(s) ~ Ai(s)` as s → ∞:
//! ```text
//! ln F₁(s) = −½ ∫ₛ^∞ q(x) dx − ½ ∫ₛ^∞ (x − s) q(x)² dx
//! ```
//! The ODE is integrated once, from s = 8 down to s = −8, and the upper
//! tail 1 − F₁ is kept on a uniform grid built on first use.

use std::f64::consts::PI;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{Result, StatsError};

/// Upper end of the integrated range; Airy asymptotics are used above it.
const S_MAX: f64 = 8.0;
/// Lower end of the integrated range; the tail is reported as 1 below it.
const S_MIN: f64 = -8.0;
/// RK4 step.
const STEP: f64 = 1e-3;
/// Every fifth RK4 state is stored, giving a grid spacing of 0.005.
const RECORD_EVERY: usize = 5;

/// (q, q′, W = ∫q, U = ∫q², V = ∫(x−s)q²), integrals taken over [s, ∞).
type State = [f64; 5];

static TAIL_GRID: OnceLock<Vec<f64>> = OnceLock::new();

/// Upper tail P(TW₁ > x) of the Tracy-Widom distribution for real
/// symmetric (GOE) matrices.
///
/// Linear interpolation on the precomputed grid for −8 ≤ x ≤ 8; above 8 the
/// Airy asymptotics (tail ≈ e^(−⅔x^{3/2}) / (4√π x^{3/4})); 1 below −8.
/// NaN propagates.
///
/// # Examples
/// ```
/// use statfn::tracy_widom::twtail;
/// // 5% critical value
/// assert!((twtail(0.9793) - 0.05).abs() < 2e-5);
/// assert_eq!(twtail(-10.0), 1.0);
/// ```
pub fn twtail(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    if x >= S_MAX {
        return tail_from_state(&airy_state(x));
    }
    if x < S_MIN {
        return 1.0;
    }

    let grid = tail_grid();
    let pos = (S_MAX - x) / (STEP * RECORD_EVERY as f64);
    let i = pos.floor() as usize;
    if i + 1 >= grid.len() {
        return grid[grid.len() - 1];
    }
    let frac = pos - i as f64;
    grid[i] + frac * (grid[i + 1] - grid[i])
}

/// Tracy-Widom statistic of a trace-normalised eigenvalue.
///
/// `lam` is the largest eigenvalue divided by the sum of all eigenvalues,
/// `m` the number of samples and `n` the (effective) number of markers.
/// Returns `(n·lam − μ)/σ` with
/// ```text
/// μ = (√(n−1) + √m)²
/// σ = (√(n−1) + √m) · (1/√(n−1) + 1/√m)^{1/3}
/// ```
/// Compare the result against [`twtail`].
///
/// Reference: Johnstone (2001); Patterson, Price & Reich (2006).
///
/// # Errors
/// [`StatsError::Domain`] if `m ≤ 0`, `n ≤ 1`, or any argument is NaN.
///
/// # Examples
/// ```
/// use statfn::tracy_widom::twnorm;
/// let (m, n) = (100.0_f64, 1000.0_f64);
/// let mu = ((n - 1.0).sqrt() + m.sqrt()).powi(2);
/// assert!(twnorm(mu / n, m, n).unwrap().abs() < 1e-9);
/// ```
pub fn twnorm(lam: f64, m: f64, n: f64) -> Result<f64> {
    if lam.is_nan() {
        return Err(StatsError::domain("twnorm", lam, "eigenvalue is NaN"));
    }
    if m.is_nan() || m <= 0.0 {
        return Err(StatsError::domain("twnorm", m, "requires m > 0 samples"));
    }
    if n.is_nan() || n <= 1.0 {
        return Err(StatsError::domain("twnorm", n, "requires n > 1 markers"));
    }
    let (rn, rm) = ((n - 1.0).sqrt(), m.sqrt());
    let mu = (rn + rm).powi(2);
    let sigma = (rn + rm) * (1.0 / rn + 1.0 / rm).cbrt();
    Ok((n * lam - mu) / sigma)
}

/// Moment estimate of the effective number of markers.
///
/// `eigs` are the m − 1 non-zero eigenvalues of a covariance matrix built
/// from m mean-centred samples. Returns
/// ```text
/// n′ = (m+1)(Σλ)² / ((m−1)Σλ² − (Σλ)²)
/// ```
/// which is invariant under rescaling of the eigenvalues.
///
/// # Errors
/// - [`StatsError::Domain`] for a negative or non-finite eigenvalue.
/// - [`StatsError::DegenerateSample`] for fewer than two eigenvalues, or
///   when all are equal (the estimate is unbounded).
///
/// # Examples
/// ```
/// use statfn::tracy_widom::tw_effective_markers;
/// let n = tw_effective_markers(&[5.0, 1.0, 1.0]).unwrap();
/// assert!((n - 245.0 / 32.0).abs() < 1e-12);
/// ```
pub fn tw_effective_markers(eigs: &[f64]) -> Result<f64> {
    const FUNC: &str = "tw_effective_markers";

    if eigs.len() < 2 {
        return Err(StatsError::DegenerateSample {
            func: FUNC,
            reason: "needs at least two eigenvalues",
        });
    }
    if let Some(&bad) = eigs.iter().find(|&&l| !l.is_finite() || l < 0.0) {
        return Err(StatsError::domain(
            FUNC,
            bad,
            "eigenvalues must be finite and non-negative",
        ));
    }

    let m = (eigs.len() + 1) as f64;
    let sum: f64 = eigs.iter().sum();
    let sum_sq: f64 = eigs.iter().map(|l| l * l).sum();
    let denom = (m - 1.0) * sum_sq - sum * sum;
    if denom <= 1e-12 * sum * sum {
        return Err(StatsError::DegenerateSample {
            func: FUNC,
            reason: "eigenvalues are all equal",
        });
    }
    Ok((m + 1.0) * sum * sum / denom)
}

fn tail_grid() -> &'static [f64] {
    TAIL_GRID.get_or_init(|| {
        let grid = integrate_painleve();
        debug!(
            points = grid.len(),
            from = S_MAX,
            to = S_MIN,
            "built Tracy-Widom tail grid"
        );
        grid
    })
}

fn integrate_painleve() -> Vec<f64> {
    let steps = ((S_MAX - S_MIN) / STEP).round() as usize;
    let mut y = airy_state(S_MAX);
    let mut tails = Vec::with_capacity(steps / RECORD_EVERY + 1);
    tails.push(tail_from_state(&y));

    for i in 1..=steps {
        let s = S_MAX - (i - 1) as f64 * STEP;
        y = rk4_step(s, &y, -STEP);
        if i % RECORD_EVERY == 0 {
            tails.push(tail_from_state(&y));
        }
    }
    tails
}

/// 1 − F₁ from an integrated state, without cancellation in the far tail.
fn tail_from_state(y: &State) -> f64 {
    -(-0.5 * (y[2] + y[4])).exp_m1()
}

fn painleve_rhs(s: f64, y: &State) -> State {
    let q = y[0];
    [y[1], s * q + 2.0 * q * q * q, -q, -q * q, -y[3]]
}

fn rk4_step(s: f64, y: &State, h: f64) -> State {
    let shift = |k: &State, a: f64| -> State { std::array::from_fn(|j| y[j] + a * k[j]) };

    let k1 = painleve_rhs(s, y);
    let k2 = painleve_rhs(s + 0.5 * h, &shift(&k1, 0.5 * h));
    let k3 = painleve_rhs(s + 0.5 * h, &shift(&k2, 0.5 * h));
    let k4 = painleve_rhs(s + h, &shift(&k3, h));
    std::array::from_fn(|j| y[j] + h / 6.0 * (k1[j] + 2.0 * k2[j] + 2.0 * k3[j] + k4[j]))
}

/// State at large `s` where q ≈ Ai: the Airy function and derivative from
/// their asymptotic series, and leading-order tail integrals using the
/// local decay rate √s of Ai.
fn airy_state(s: f64) -> State {
    let (ai, ai_prime) = airy_asymptotic(s);
    let rate = s.sqrt();
    let w = ai / rate;
    let u = ai * ai / (2.0 * rate);
    let v = u / (2.0 * rate);
    [ai, ai_prime, w, u, v]
}

/// Ai(x) and Ai′(x) for large positive x (A&S 10.4.59, 10.4.61).
fn airy_asymptotic(x: f64) -> (f64, f64) {
    const TERMS: usize = 12;

    let zeta = 2.0 / 3.0 * x.powf(1.5);
    let pre = (-zeta).exp() / (2.0 * PI.sqrt());
    let quarter = x.powf(0.25);

    let mut u = 1.0;
    let mut sum_u = 1.0;
    let mut sum_v = 1.0;
    let mut zeta_pow = 1.0;
    let mut sign = 1.0;
    for k in 1..=TERMS {
        let kf = k as f64;
        u *= (6.0 * kf - 5.0) * (6.0 * kf - 3.0) * (6.0 * kf - 1.0)
            / ((2.0 * kf - 1.0) * 216.0 * kf);
        let v = -(6.0 * kf + 1.0) / (6.0 * kf - 1.0) * u;
        zeta_pow *= zeta;
        sign = -sign;
        sum_u += sign * u / zeta_pow;
        sum_v += sign * v / zeta_pow;
    }
    (pre / quarter * sum_u, -pre * quarter * sum_v)
}
