//! calc::interval — Student-t confidence half-widths.
//!
//! Purpose
//! -------
//! Half-width of the two-sided confidence interval of the mean along a dim,
//! `s / sqrt(n) * t_{n-1}(1 - (1 - confidence) / 2)`, with `s` the sample
//! standard deviation (ddof = 1) over finite values.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n` counts finite values per cell; cells with `n < 2` yield NaN.
//! - The grouped variant reduces within each group of a coordinate and stacks
//!   the results along a new dim named after the coordinate.

use crate::{
    labeled::LabeledArray,
    statistical_tests::{errors::SigResult, validation::validate_confidence},
};
use ndarray::ArrayView1;
use statrs::distribution::{ContinuousCDF, StudentsT};

fn half_width(lane: ArrayView1<'_, f64>, confidence: f64) -> f64 {
    let vals: Vec<f64> = lane.iter().copied().filter(|v| v.is_finite()).collect();
    let n = vals.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = vals.iter().sum::<f64>() / nf;
    let sd = (vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (nf - 1.0)).sqrt();
    match StudentsT::new(0.0, 1.0, nf - 1.0) {
        Ok(t) => sd / nf.sqrt() * t.inverse_cdf(1.0 - (1.0 - confidence) / 2.0),
        Err(_) => f64::NAN,
    }
}

/// Confidence half-width of the mean of `a` along `dim`.
///
/// Errors
/// ------
/// - `SigError::InvalidConfidence` unless `0 < confidence < 1`.
/// - `LabeledError::UnknownDim` (wrapped) when `dim` is missing.
pub fn confidence_interval(a: &LabeledArray, dim: &str, confidence: f64) -> SigResult<LabeledArray> {
    validate_confidence(confidence)?;
    let [out] = a.reduce_along(dim, |lane| [half_width(lane, confidence)])?;
    Ok(out)
}

/// Confidence half-width along `dim` within each group of `group_coord`.
///
/// The result carries a leading dim named `group_coord` with one entry per
/// group, in label order.
pub fn confidence_interval_by(
    a: &LabeledArray, dim: &str, group_coord: &str, confidence: f64,
) -> SigResult<LabeledArray> {
    validate_confidence(confidence)?;
    let mut blocks = Vec::new();
    for (label, group) in a.group_by(group_coord)? {
        let [out] = group.reduce_along(dim, |lane| [half_width(lane, confidence)])?;
        blocks.push(out.expand_dims(group_coord, label)?);
    }
    Ok(LabeledArray::concat(&blocks, group_coord)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{labeled::labels, statistical_tests::SigError};
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-9;

    #[test]
    // Purpose
    // -------
    // Verify the half-width against a hand-computed value and NaN skipping.
    //
    // Given
    // -----
    // - Values [1, 2, 3, NaN]: n = 3, s = 1, t_2(0.975) = 4.302652729911275.
    //
    // Expect
    // ------
    // - Half-width 4.302652729911275 / sqrt(3).
    fn confidence_interval_matches_hand_value() {
        // Arrange
        let a = LabeledArray::from_shape_vec(["time"], &[4], vec![1.0, 2.0, 3.0, f64::NAN])
            .expect("valid");

        // Act
        let ci = confidence_interval(&a, "time", 0.95).expect("valid confidence");

        // Assert
        let v = ci.data().iter().copied().next().unwrap_or(f64::NAN);
        assert_relative_eq!(v, 4.302652729911275 / 3f64.sqrt(), epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Check the degenerate and invalid cases.
    //
    // Given
    // -----
    // - One finite value; confidence 1.0.
    //
    // Expect
    // ------
    // - NaN for the single value; `InvalidConfidence` for 1.0.
    fn confidence_interval_degenerate_and_invalid() {
        // Arrange
        let a = LabeledArray::from_shape_vec(["time"], &[2], vec![1.0, f64::NAN]).expect("valid");

        // Act
        let one = confidence_interval(&a, "time", 0.9).expect("valid confidence");
        let bad = confidence_interval(&a, "time", 1.0);

        // Assert
        assert!(one.data().iter().all(|v| v.is_nan()));
        assert!(matches!(bad, Err(SigError::InvalidConfidence(_))));
    }

    #[test]
    // Purpose
    // -------
    // Ensure grouping adds a leading dim with one entry per group label.
    //
    // Given
    // -----
    // - 4 time steps with season labels [DJF, JJA, DJF, JJA].
    //
    // Expect
    // ------
    // - dims ["season"], index [DJF, JJA].
    fn confidence_interval_by_groups_along_new_dim() {
        // Arrange
        let a = LabeledArray::from_shape_vec(["time"], &[4], vec![1.0, 5.0, 2.0, 7.0])
            .expect("valid")
            .with_coord("season", &["time"], labels(["DJF", "JJA", "DJF", "JJA"]))
            .expect("valid coord");

        // Act
        let ci = confidence_interval_by(&a, "time", "season", 0.95).expect("groupable");

        // Assert
        assert_eq!(ci.dims().to_vec(), vec!["season".to_string()]);
        assert_eq!(ci.index("season").expect("index"), labels(["DJF", "JJA"]));
    }
}
