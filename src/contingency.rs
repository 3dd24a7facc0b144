//! Chi-square statistics on counts: contingency tables, goodness of fit,
//! and Hardy-Weinberg equilibrium.
//!
//! Counts are `f64` so that weighted or fractional tallies are accepted;
//! they must be finite and non-negative. None of the statistics apply a
//! continuity correction.

use crate::error::{Result, StatsError};

/// Pearson chi-square statistic of an `m × n` contingency table.
///
/// `table` holds the cells in row-major order. Expected counts are
/// `row_sum · col_sum / total`; rows and columns whose margin is zero carry
/// no information and contribute nothing.
///
/// # Errors
/// - [`StatsError::Domain`] if `table.len() != m * n` or a cell is negative
///   or non-finite.
/// - [`StatsError::DegenerateSample`] if the table total is zero.
///
/// # Examples
/// ```
/// use statfn::contingency::conchi;
/// let chi = conchi(&[20.0, 30.0, 30.0, 20.0], 2, 2).unwrap();
/// assert!((chi - 4.0).abs() < 1e-12);
/// ```
pub fn conchi(table: &[f64], m: usize, n: usize) -> Result<f64> {
    if table.len() != m * n || m == 0 || n == 0 {
        return Err(StatsError::domain(
            "conchi",
            table.len() as f64,
            "table length must equal m * n",
        ));
    }
    check_counts("conchi", table)?;

    let row_sums: Vec<f64> = table.chunks(n).map(|row| row.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..n)
        .map(|j| (0..m).map(|i| table[i * n + j]).sum())
        .collect();
    let total: f64 = row_sums.iter().sum();
    if total <= 0.0 {
        return Err(StatsError::DegenerateSample {
            func: "conchi",
            reason: "table total is zero",
        });
    }

    let mut chi = 0.0;
    for (i, &r) in row_sums.iter().enumerate() {
        for (j, &c) in col_sums.iter().enumerate() {
            let expected = r * c / total;
            if expected <= 0.0 {
                continue;
            }
            let diff = table[i * n + j] - expected;
            chi += diff * diff / expected;
        }
    }
    Ok(chi)
}

/// Goodness-of-fit chi-square of observed counts against proportions.
///
/// `proportions` need not sum to 1; they are normalised. `None` tests
/// against the uniform distribution. Boxes with zero expected count are
/// skipped.
///
/// # Errors
/// - [`StatsError::Domain`] for negative or non-finite entries, or when
///   `proportions` has a different length from `observed`.
/// - [`StatsError::DegenerateSample`] if the observed total or the
///   proportion total is zero.
///
/// # Examples
/// ```
/// use statfn::contingency::chitest;
/// let chi = chitest(&[30.0, 10.0], None).unwrap();
/// assert!((chi - 10.0).abs() < 1e-12);
/// ```
pub fn chitest(observed: &[f64], proportions: Option<&[f64]>) -> Result<f64> {
    check_counts("chitest", observed)?;
    let total: f64 = observed.iter().sum();
    if total <= 0.0 {
        return Err(StatsError::DegenerateSample {
            func: "chitest",
            reason: "no observations",
        });
    }

    let uniform;
    let weights = match proportions {
        Some(p) => {
            if p.len() != observed.len() {
                return Err(StatsError::domain(
                    "chitest",
                    p.len() as f64,
                    "proportions length must match observed",
                ));
            }
            check_counts("chitest", p)?;
            p
        }
        None => {
            uniform = vec![1.0; observed.len()];
            &uniform[..]
        }
    };
    let weight_total: f64 = weights.iter().sum();
    if weight_total <= 0.0 {
        return Err(StatsError::DegenerateSample {
            func: "chitest",
            reason: "proportions sum to zero",
        });
    }

    let scale = total / weight_total;
    Ok(observed
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(&o, &w)| {
            let expected = w * scale;
            let diff = o - expected;
            diff * diff / expected
        })
        .sum())
}

/// Signed Hardy-Weinberg statistic from genotype counts.
///
/// `genotypes` is `[hom_ref, het, hom_alt]`. With alternate allele
/// frequency p̂ the expected counts are `N·q̂², 2N·p̂q̂, N·p̂²`; the result is
/// `sign(het − E[het]) · √χ²`, approximately standard normal under
/// equilibrium. Positive values mean excess heterozygosity.
///
/// Returns `0.0` when the sample is empty or nearly monomorphic
/// (p̂q̂ < 0.001), where the test carries no information.
///
/// # Errors
/// [`StatsError::Domain`] for negative or non-finite counts.
///
/// # Examples
/// ```
/// use statfn::contingency::hwstat;
/// assert!(hwstat(&[25.0, 50.0, 25.0]).unwrap().abs() < 1e-12);
/// assert!((hwstat(&[10.0, 80.0, 10.0]).unwrap() - 6.0).abs() < 1e-12);
/// ```
pub fn hwstat(genotypes: &[f64; 3]) -> Result<f64> {
    check_counts("hwstat", genotypes)?;
    let [hom_ref, het, hom_alt] = *genotypes;
    let total = hom_ref + het + hom_alt;
    if total < 0.001 {
        return Ok(0.0);
    }
    let p = (2.0 * hom_alt + het) / (2.0 * total);
    let q = 1.0 - p;
    if p * q < 0.001 {
        return Ok(0.0);
    }

    let expected = [total * q * q, 2.0 * total * p * q, total * p * p];
    let chi: f64 = genotypes
        .iter()
        .zip(expected.iter())
        .map(|(&o, &e)| (o - e) * (o - e) / e)
        .sum();
    let stat = chi.sqrt();
    Ok(if het >= expected[1] { stat } else { -stat })
}

fn check_counts(func: &'static str, counts: &[f64]) -> Result<()> {
    match counts.iter().find(|c| !(c.is_finite() && **c >= 0.0)) {
        Some(&bad) => Err(StatsError::domain(
            func,
            bad,
            "counts must be finite and non-negative",
        )),
        None => Ok(()),
    }
}
