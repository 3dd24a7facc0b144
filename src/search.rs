//! First-exceedance lookup in tables.
//!
//! Both functions return the smallest index `i` with `tab[i] > val`
//! (strictly greater), or `tab.len()` when no entry exceeds `val`. The table
//! need not be sorted; on an ascending table the result is the insertion
//! point after any run of entries equal to `val`.

/// First index whose integer entry is strictly greater than `val`.
///
/// # Examples
/// ```
/// use statfn::search::ifirstgt;
/// let tab = [1, 3, 3, 7];
/// assert_eq!(ifirstgt(3, &tab), 3);
/// assert_eq!(ifirstgt(0, &tab), 0);
/// assert_eq!(ifirstgt(7, &tab), tab.len());
/// ```
pub fn ifirstgt(val: i32, tab: &[i32]) -> usize {
    tab.iter().position(|&x| x > val).unwrap_or(tab.len())
}

/// First index whose entry is strictly greater than `val`.
///
/// NaN entries never compare greater, and a NaN `val` exceeds nothing, so
/// both fall through to `tab.len()`.
///
/// # Examples
/// ```
/// use statfn::search::firstgt;
/// let tab = [0.1, 0.5, 0.5, 0.9];
/// assert_eq!(firstgt(0.5, &tab), 3);
/// assert_eq!(firstgt(1.0, &tab), 4);
/// ```
pub fn firstgt(val: f64, tab: &[f64]) -> usize {
    tab.iter().position(|&x| x > val).unwrap_or(tab.len())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn ifirstgt_matches_partition_point(
            mut tab in prop::collection::vec(-50_i32..50, 0..40),
            val in -60_i32..60,
        ) {
            tab.sort_unstable();
            prop_assert_eq!(ifirstgt(val, &tab), tab.partition_point(|&x| x <= val));
        }

        #[test]
        fn firstgt_index_is_first_exceedance(
            tab in prop::collection::vec(-1.0e3_f64..1.0e3, 0..40),
            val in -1.0e3_f64..1.0e3,
        ) {
            let i = firstgt(val, &tab);
            prop_assert!(tab[..i].iter().all(|&x| x <= val));
            if i < tab.len() {
                prop_assert!(tab[i] > val);
            }
        }
    }
}
