//! statistical_tests::ttest — field-significance tests with global FDR.
//!
//! Purpose
//! -------
//! Provide the parametric alternative to the rank tests (Student's t, paired
//! or independent) and a rank-based twin of the same wrapper. Unlike the
//! orchestrator, these operations apply their own Benjamini–Hochberg
//! correction across *all* finite cells of the output at a caller-supplied
//! `global_alpha`, i.e. one family per call.
//!
//! Key behaviors
//! -------------
//! - [`ttest_rel`]: one-sample t-test of the paired differences; pairs with
//!   a non-finite member are dropped.
//! - [`ttest_ind`]: pooled-variance two-sample t-test; each side is filtered
//!   separately.
//! - [`ttest_2samp`] / [`rank_test_2samp`]: vectorized over all non-test
//!   dims, then globally FDR-corrected into a [`FieldSignificance`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Paired operands are matched by position along the test dim and must
//!   have the same length there.
//! - Cells with too few finite values yield NaN statistic and p, are left out
//!   of the correction, and are never rejected.
//!
//! Conventions
//! -----------
//! - `reject` marks cells whose *adjusted* p-value is `≤ global_alpha`.

use crate::{
    labeled::{LabeledArray, LabeledError},
    statistical_tests::{
        errors::SigResult,
        multitest::multitest_bh,
        rank_tests::{TestStats, mannwhitneyu, wilcoxon},
        validation::validate_alpha,
    },
};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
fn t_pvalue(t: f64, df: f64) -> f64 {
    if t.is_nan() || !(df > 0.0) {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

fn mean_and_ss(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (mean, ss)
}

/// Paired t-test of `x` against `y`, returning `(t, p)`.
///
/// Notes
/// -----
/// - Fewer than 2 complete pairs gives `(NaN, NaN)`.
/// - Zero spread with a non-zero mean difference gives `t = ±∞, p = 0`.
pub fn ttest_rel(x: &[f64], y: &[f64]) -> (f64, f64) {
    let d: Vec<f64> =
        x.iter().zip(y).filter(|(a, b)| a.is_finite() && b.is_finite()).map(|(a, b)| a - b).collect();
    if d.len() < 2 {
        return (f64::NAN, f64::NAN);
    }
    let n = d.len() as f64;
    let (mean, ss) = mean_and_ss(&d);
    let se = (ss / (n - 1.0) / n).sqrt();
    let t = mean / se;
    (t, t_pvalue(t, n - 1.0))
}

/// Independent two-sample t-test with pooled variance, returning `(t, p)`.
///
/// Notes
/// -----
/// - Requires one finite value per side and `n1 + n2 − 2 ≥ 1`; otherwise
///   `(NaN, NaN)`.
pub fn ttest_ind(x: &[f64], y: &[f64]) -> (f64, f64) {
    let xs: Vec<f64> = x.iter().copied().filter(|v| v.is_finite()).collect();
    let ys: Vec<f64> = y.iter().copied().filter(|v| v.is_finite()).collect();
    if xs.is_empty() || ys.is_empty() || xs.len() + ys.len() < 3 {
        return (f64::NAN, f64::NAN);
    }
    let (n1, n2) = (xs.len() as f64, ys.len() as f64);
    let df = n1 + n2 - 2.0;
    let (m1, ss1) = mean_and_ss(&xs);
    let (m2, ss2) = mean_and_ss(&ys);
    let se = ((ss1 + ss2) / df * (1.0 / n1 + 1.0 / n2)).sqrt();
    let t = (m1 - m2) / se;
    (t, t_pvalue(t, df))
}

/// FieldSignificance — globally corrected field of test results.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSignificance {
    pub statistic: LabeledArray,
    /// Raw two-sided p-values.
    pub p: LabeledArray,
    /// Benjamini–Hochberg adjusted p-values over all finite cells.
    pub p_adjusted: LabeledArray,
    /// `p_adjusted ≤ global_alpha`; false for NaN cells.
    pub reject: LabeledArray<bool>,
}

fn check_paired(a: &LabeledArray, b: &LabeledArray, dim: &str) -> SigResult<()> {
    let (na, nb) = (a.dim_len(dim)?, b.dim_len(dim)?);
    if na != nb {
        return Err(LabeledError::ShapeMismatch { expected: vec![na], found: vec![nb] }.into());
    }
    Ok(())
}

fn field_significance(statistic: LabeledArray, p: LabeledArray, global_alpha: f64) -> SigResult<FieldSignificance> {
    let p_adjusted = multitest_bh(&p)?;
    let reject = p_adjusted.map(|&q| q <= global_alpha);
    Ok(FieldSignificance { statistic, p, p_adjusted, reject })
}

/// Student t-test of `a` against `b` along `dim`, FDR-corrected over the
/// whole output field.
///
/// Parameters
/// ----------
/// - `paired`: paired test on position-matched values, otherwise the
///   pooled-variance independent test.
/// - `global_alpha`: false discovery rate in `(0, 1)`.
///
/// Errors
/// ------
/// - `SigError::InvalidAlpha` for `global_alpha` outside `(0, 1)`.
/// - Labeled-layer errors when the operands' non-test dims disagree, or
///   when paired operands differ in length along `dim`.
pub fn ttest_2samp(
    a: &LabeledArray, b: &LabeledArray, paired: bool, dim: &str, global_alpha: f64,
) -> SigResult<FieldSignificance> {
    validate_alpha(global_alpha)?;
    if paired {
        check_paired(a, b, dim)?;
    }
    let [t, p] = a.reduce_pair_along(b, dim, |x, y| {
        let xs: Vec<f64> = x.iter().copied().collect();
        let ys: Vec<f64> = y.iter().copied().collect();
        let (t, p) = if paired { ttest_rel(&xs, &ys) } else { ttest_ind(&xs, &ys) };
        [t, p]
    })?;
    field_significance(t, p, global_alpha)
}

/// Rank-based counterpart of [`ttest_2samp`]: signed-rank test of the paired
/// differences, or rank-sum test of independent samples.
pub fn rank_test_2samp(
    a: &LabeledArray, b: &LabeledArray, paired: bool, dim: &str, global_alpha: f64,
) -> SigResult<FieldSignificance> {
    validate_alpha(global_alpha)?;
    if paired {
        check_paired(a, b, dim)?;
    }
    let arrays = a.reduce_pair_along(b, dim, |x, y| {
        let xs: Vec<f64> = x.iter().copied().collect();
        let ys: Vec<f64> = y.iter().copied().collect();
        if paired {
            let d: Vec<f64> = xs.iter().zip(&ys).map(|(u, v)| u - v).collect();
            wilcoxon(&d).to_array()
        } else {
            mannwhitneyu(&xs, &ys).to_array()
        }
    })?;
    let stats = TestStats::from_arrays(arrays);
    field_significance(stats.statistic, stats.p, global_alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistical_tests::errors::SigError;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-10;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Scalar t statistics against hand-computed values.
    // - Degenerate and zero-spread inputs.
    // - The global FDR wrapper: `reject` comes from adjusted p-values, NaN
    //   cells are never rejected, and alpha is validated.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the paired statistic and the NaN-pair policy.
    //
    // Given
    // -----
    // - Differences [1, 2, 3] (mean 2, sd 1, n 3) plus a pair with NaN.
    //
    // Expect
    // ------
    // - t = 2/(1/√3) = 2√3; p in (0, 1).
    fn ttest_rel_drops_incomplete_pairs() {
        // Act
        let (t, p) = ttest_rel(&[2.0, 4.0, 6.0, f64::NAN], &[1.0, 2.0, 3.0, 0.0]);

        // Assert
        assert_relative_eq!(t, 2.0 * 3.0_f64.sqrt(), epsilon = TOL);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Check the pooled-variance statistic and degenerate inputs.
    //
    // Given
    // -----
    // - x = [1, 2, 3], y = [4, 5, 6]: means differ by 3, pooled var 1.
    // - A single value per side (df = 0).
    //
    // Expect
    // ------
    // - t = −3/√(2/3); NaN pair for the degenerate case.
    fn ttest_ind_pooled_statistic_and_degenerate_case() {
        // Act
        let (t, _) = ttest_ind(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let (td, pd) = ttest_ind(&[1.0], &[2.0]);

        // Assert
        assert_relative_eq!(t, -3.0 / (2.0_f64 / 3.0).sqrt(), epsilon = TOL);
        assert!(td.is_nan() && pd.is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Verify zero spread maps to infinite t and p = 0, and zero mean with
    // zero spread to NaN.
    //
    // Given
    // -----
    // - Constant differences of 1; constant differences of 0.
    //
    // Expect
    // ------
    // - (+∞, 0) and (NaN, NaN).
    fn ttest_rel_zero_spread() {
        // Act
        let (t1, p1) = ttest_rel(&[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0]);
        let (t0, p0) = ttest_rel(&[1.0, 1.0], &[1.0, 1.0]);

        // Assert
        assert!(t1.is_infinite() && p1 == 0.0);
        assert!(t0.is_nan() && p0.is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the field wrapper rejects from adjusted p-values and never
    // rejects missing cells.
    //
    // Given
    // -----
    // - (time=6, x=2): column 0 strongly shifted, column 1 all NaN in `a`.
    //
    // Expect
    // ------
    // - x=0 rejected at alpha 0.05; x=1 has NaN adjusted p and is not
    //   rejected; alpha 1.0 is an error.
    fn field_tests_reject_on_adjusted_pvalues() {
        // Arrange
        let nan = f64::NAN;
        let a_vals = vec![10.0, nan, 11.0, nan, 12.0, nan, 13.0, nan, 14.0, nan, 15.0, nan];
        let b_vals = vec![0.0, 1.0, 1.0, 2.0, 0.5, 3.0, 1.5, 4.0, 0.2, 5.0, 0.9, 6.0];
        let a = LabeledArray::from_shape_vec(["time", "x"], &[6, 2], a_vals).expect("valid");
        let b = LabeledArray::from_shape_vec(["time", "x"], &[6, 2], b_vals).expect("valid");

        // Act
        let tt = ttest_2samp(&a, &b, false, "time", 0.05).expect("valid inputs");
        let rk = rank_test_2samp(&a, &b, false, "time", 0.05).expect("valid inputs");
        let bad = ttest_2samp(&a, &b, true, "time", 1.0);

        // Assert
        for field in [&tt, &rk] {
            assert!(field.reject.data()[[0]]);
            assert!(!field.reject.data()[[1]]);
            assert!(field.p_adjusted.data()[[1]].is_nan());
        }
        assert_eq!(bad, Err(SigError::InvalidAlpha(1.0)));
    }
}
