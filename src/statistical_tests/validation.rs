//! statistical_tests::validation — shared guards for options and inputs.
//!
//! Purpose
//! -------
//! Centralize the configuration checks of the significance workflow so that
//! the orchestrator, the field-significance tests, the formatters, and the
//! `calc` helpers reject invalid arguments the same way, before any test is
//! run.
//!
//! Key behaviors
//! -------------
//! - Range checks for numeric options (`global_alpha`, significant digits,
//!   confidence level, noise threshold).
//! - Structural checks on the dataset (case dimension present, requested
//!   cases present on its index).
//!
//! Conventions
//! -----------
//! - Guards return `SigResult<()>` and never panic; they perform no
//!   computation on the sample values themselves.

use crate::{
    labeled::{Dataset, Label},
    statistical_tests::errors::{SigError, SigResult},
};

/// Require `0 < alpha < 1`.
pub fn validate_alpha(alpha: f64) -> SigResult<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(SigError::InvalidAlpha(alpha));
    }
    Ok(())
}

/// Require at least one significant digit.
pub fn validate_digits(digits: usize) -> SigResult<()> {
    if digits == 0 {
        return Err(SigError::InvalidDigits(digits));
    }
    Ok(())
}

/// Require `0 < confidence < 1`.
pub fn validate_confidence(confidence: f64) -> SigResult<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(SigError::InvalidConfidence(confidence));
    }
    Ok(())
}

/// Require a finite, non-negative noise threshold.
pub fn validate_noise(noise: f64) -> SigResult<()> {
    if !noise.is_finite() || noise < 0.0 {
        return Err(SigError::InvalidNoise(noise));
    }
    Ok(())
}

/// Validate the case-related preconditions of an orchestrator run.
///
/// Errors
/// ------
/// - `SigError::NoCasesRequested` when `n_requested == 0`.
/// - `SigError::MissingCaseDimension` when no variable carries `case_dim`.
/// - `SigError::UnknownCase` for the first requested case absent from the
///   case index of a variable that carries `case_dim`.
pub fn validate_cases<T: Clone>(
    dataset: &Dataset<T>, case_dim: &str, n_requested: usize, requested: &[&str],
) -> SigResult<()> {
    if n_requested == 0 {
        return Err(SigError::NoCasesRequested);
    }
    if !dataset.has_dim(case_dim) {
        return Err(SigError::MissingCaseDimension { dim: case_dim.to_string() });
    }
    for (_, array) in dataset.iter().filter(|(_, a)| a.has_dim(case_dim)) {
        let index = array.index(case_dim)?;
        if let Some(missing) = requested.iter().find(|c| !index.contains(&Label::from(**c))) {
            return Err(SigError::UnknownCase {
                case: missing.to_string(),
                dim: case_dim.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::{LabeledArray, labels};

    fn two_case_dataset() -> Dataset {
        let a = LabeledArray::from_shape_vec(["case", "time"], &[2, 2], vec![0.0; 4])
            .and_then(|a| a.with_index("case", labels(["baseline", "scenario"])))
            .expect("valid array");
        Dataset::new().with_var("tas", a)
    }

    #[test]
    // Purpose
    // -------
    // Exercise the open-interval guards at and inside their boundaries.
    //
    // Given
    // -----
    // - Alpha and confidence at 0, 1, NaN, and 0.05.
    //
    // Expect
    // ------
    // - Only 0.05 passes.
    fn open_interval_guards_reject_boundaries_and_nan() {
        // Act / Assert
        for bad in [0.0, 1.0, f64::NAN] {
            assert!(validate_alpha(bad).is_err(), "alpha {bad}");
            assert!(validate_confidence(bad).is_err(), "confidence {bad}");
        }
        assert!(validate_alpha(0.05).is_ok());
        assert!(validate_confidence(0.95).is_ok());
        assert_eq!(validate_digits(0), Err(SigError::InvalidDigits(0)));
        assert!(validate_noise(-1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Cover every branch of `validate_cases`.
    //
    // Given
    // -----
    // - A dataset with cases [baseline, scenario].
    //
    // Expect
    // ------
    // - No request → `NoCasesRequested`; wrong dim → `MissingCaseDimension`;
    //   unknown label → `UnknownCase`; known label → Ok.
    fn validate_cases_covers_all_branches() {
        // Arrange
        let ds = two_case_dataset();

        // Act / Assert
        assert_eq!(validate_cases(&ds, "case", 0, &[]), Err(SigError::NoCasesRequested));
        assert!(matches!(
            validate_cases(&ds, "member", 1, &["scenario"]),
            Err(SigError::MissingCaseDimension { .. })
        ));
        assert!(matches!(
            validate_cases(&ds, "case", 1, &["ssp5"]),
            Err(SigError::UnknownCase { .. })
        ));
        assert!(validate_cases(&ds, "case", 1, &["scenario", "baseline"]).is_ok());
    }
}
