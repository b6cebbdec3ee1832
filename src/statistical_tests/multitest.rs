//! statistical_tests::multitest — Benjamini–Hochberg FDR correction.
//!
//! Purpose
//! -------
//! Adjust p-values for multiple testing with the Benjamini–Hochberg
//! step-up procedure, either over a whole labeled array or separately per
//! label of one grouping dimension (one inferential family per label).
//!
//! Key behaviors
//! -------------
//! - Non-finite p-values are excluded from the family size and come back as
//!   NaN at their original positions.
//! - Shape, dim order, and coordinates of the input are preserved.
//! - Adjusted values are monotone in the raw values and clamped to 1.
//!
//! Conventions
//! -----------
//! - A family of one finite p-value is returned unchanged; an all-NaN
//!   family stays all-NaN.

use crate::{
    labeled::{Label, LabeledArray},
    statistical_tests::errors::SigResult,
};
use std::collections::BTreeMap;

/// Benjamini–Hochberg adjusted p-values, in input order.
///
/// Parameters
/// ----------
/// - `p_values`: raw p-values; non-finite entries are ignored.
///
/// Returns
/// -------
/// `Vec<f64>` of the same length: `min(1, min_{k ≥ i} p₍ₖ₎·m/k)` at each
/// finite position (`m` = number of finite inputs), NaN elsewhere.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let mut adjusted = vec![f64::NAN; p_values.len()];
    let mut order: Vec<usize> = (0..p_values.len()).filter(|&i| p_values[i].is_finite()).collect();
    let m = order.len();
    if m == 0 {
        return adjusted;
    }
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let m_f = m as f64;
    let mut running = f64::INFINITY;
    for (rank0, &i) in order.iter().enumerate().rev() {
        let adj = (p_values[i] * m_f / (rank0 + 1) as f64).min(1.0);
        running = running.min(adj);
        adjusted[i] = running;
    }
    adjusted
}

/// Benjamini–Hochberg over every cell of `p` as one family.
pub fn multitest_bh(p: &LabeledArray) -> SigResult<LabeledArray> {
    let values: Vec<f64> = p.data().iter().copied().collect();
    Ok(p.replace_values(benjamini_hochberg(&values))?)
}

/// Benjamini–Hochberg with one family per distinct label of `group_dim`.
///
/// Every other dimension is pooled into the family. Positions sharing a
/// label (duplicate index labels) pool into the same family.
///
/// Errors
/// ------
/// - Labeled-layer errors when `group_dim` is missing or has no index.
pub fn multitest_bh_by(p: &LabeledArray, group_dim: &str) -> SigResult<LabeledArray> {
    let ax = p.axis_of(group_dim)?;
    let index = p.index(group_dim)?;

    let mut families: BTreeMap<&Label, Vec<usize>> = BTreeMap::new();
    for (flat, (idx, _)) in p.data().indexed_iter().enumerate() {
        families.entry(&index[idx[ax]]).or_default().push(flat);
    }

    let values: Vec<f64> = p.data().iter().copied().collect();
    let mut adjusted = vec![f64::NAN; values.len()];
    for members in families.values() {
        let raw: Vec<f64> = members.iter().map(|&i| values[i]).collect();
        for (&i, adj) in members.iter().zip(benjamini_hochberg(&raw)) {
            adjusted[i] = adj;
        }
    }
    Ok(p.replace_values(adjusted)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::labels;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-12;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The classic four-value BH example.
    // - NaN handling and the one-value family identity.
    // - Family scoping of `multitest_bh_by`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the step-up adjustment and right-to-left monotonicity.
    //
    // Given
    // -----
    // - p = [0.01, 0.04, 0.03, 0.005].
    //
    // Expect
    // ------
    // - Adjusted = [0.02, 0.04, 0.04, 0.02].
    fn benjamini_hochberg_classic_example() {
        // Act
        let adj = benjamini_hochberg(&[0.01, 0.04, 0.03, 0.005]);

        // Assert
        for (got, want) in adj.iter().zip([0.02, 0.04, 0.04, 0.02]) {
            assert_relative_eq!(*got, want, epsilon = TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the smallest-family and all-missing edge cases, and that NaNs
    // do not count toward the family size.
    //
    // Given
    // -----
    // - [NaN, NaN]; [0.03]; [NaN, 0.03].
    //
    // Expect
    // ------
    // - All-NaN unchanged; 0.03 unchanged in both single-value families.
    fn benjamini_hochberg_nan_and_single_value() {
        assert!(benjamini_hochberg(&[f64::NAN, f64::NAN]).iter().all(|v| v.is_nan()));
        assert_relative_eq!(benjamini_hochberg(&[0.03])[0], 0.03, epsilon = TOL);
        let mixed = benjamini_hochberg(&[f64::NAN, 0.03]);
        assert!(mixed[0].is_nan());
        assert_relative_eq!(mixed[1], 0.03, epsilon = TOL);
        assert!(benjamini_hochberg(&[]).is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure `multitest_bh_by` corrects each case separately and that
    // changing one family leaves the other untouched.
    //
    // Given
    // -----
    // - p over (case=2, x=2): case a = [0.01, 0.04], case b = [0.2, 0.3],
    //   and a variant where case b is [0.9, NaN].
    //
    // Expect
    // ------
    // - Case a adjusted to [0.02, 0.04] in both runs.
    fn multitest_bh_by_scopes_families_per_label() {
        // Arrange
        let build = |b: [f64; 2]| {
            LabeledArray::from_shape_vec(["case", "x"], &[2, 2], vec![0.01, 0.04, b[0], b[1]])
                .and_then(|a| a.with_index("case", labels(["a", "b"])))
                .expect("valid")
        };

        // Act
        let first = multitest_bh_by(&build([0.2, 0.3]), "case").expect("case indexed");
        let second = multitest_bh_by(&build([0.9, f64::NAN]), "case").expect("case indexed");

        // Assert
        for out in [&first, &second] {
            assert_relative_eq!(out.data()[[0, 0]], 0.02, epsilon = TOL);
            assert_relative_eq!(out.data()[[0, 1]], 0.04, epsilon = TOL);
        }
        assert_relative_eq!(first.data()[[1, 0]], 0.3, epsilon = TOL);
        assert!(second.data()[[1, 1]].is_nan());
        assert_eq!(first.dims(), ["case".to_string(), "x".to_string()]);
    }
}
