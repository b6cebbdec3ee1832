//! statistical_tests::errors — error type for the significance workflow.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the test primitives,
//! the orchestrator, the FDR helpers, the reporting formatters, and the
//! `calc` helpers, together with a conversion layer to Python exceptions
//! for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`SigResult`] and [`SigError`] as the canonical result and error
//!   types for everything above the labeled array layer.
//! - Wrap structural failures of the labeled layer via
//!   `From<LabeledError> for SigError`, so `?` works across both layers.
//! - Implement `From<SigError> for PyErr` to raise `ValueError` at the
//!   Python boundary with the `Display` message preserved.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only configuration and empty-result conditions are errors. Degenerate
//!   data (too few finite samples in a cell) is never reported here; it
//!   yields NaN cells instead.
//!
//! Conventions
//! -----------
//! - Variants are grouped by the stage that raises them; messages name the
//!   offending dimension, coordinate, case, or value.

use crate::labeled::LabeledError;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SigResult<T> = Result<T, SigError>;

/// SigError — configuration and result errors of the significance workflow.
///
/// Variants
/// --------
/// - `NoCasesRequested`
///   Neither paired nor independent cases were supplied.
/// - `MissingCaseDimension { dim }`
///   The dataset does not expose the case dimension.
/// - `MissingSplitCoordinate { name }` / `SplitCoordinateDims { .. }`
///   The split coordinate is absent, or does not vary along exactly the
///   test dimension.
/// - `UnknownCase { case, dim }`
///   A requested case label is not on the case dimension's index.
/// - `MissingStatDimension { variable, dim }` / `MissingStatKey { key }`
///   A formatter input lacks the stat axis or one of its keys.
/// - `InvalidAlpha`, `InvalidDigits`, `InvalidConfidence`, `InvalidNoise`
///   Numeric option outside its documented range.
/// - `NoTestsProduced`
///   Orchestration finished without producing a single result block.
/// - `Labeled(LabeledError)`
///   Structural failure in the labeled array layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SigError {
    // ---- Orchestrator configuration ----
    NoCasesRequested,
    MissingCaseDimension { dim: String },
    MissingSplitCoordinate { name: String },
    SplitCoordinateDims { name: String, dims: Vec<String>, test_dim: String },
    UnknownCase { case: String, dim: String },

    // ---- Formatter configuration ----
    MissingStatDimension { variable: Option<String>, dim: String },
    MissingStatKey { key: String },

    // ---- Numeric options ----
    InvalidAlpha(f64),
    InvalidDigits(usize),
    InvalidConfidence(f64),
    InvalidNoise(f64),

    // ---- Results ----
    NoTestsProduced,

    // ---- Labeled layer ----
    Labeled(LabeledError),
}

impl std::error::Error for SigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SigError::Labeled(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for SigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Orchestrator configuration ----
            SigError::NoCasesRequested => {
                write!(f, "At least one of paired_samples or independent_samples must be non-empty.")
            }
            SigError::MissingCaseDimension { dim } => {
                write!(f, "Dataset has no '{dim}' dimension to select cases from.")
            }
            SigError::MissingSplitCoordinate { name } => {
                write!(f, "Split coordinate '{name}' not found.")
            }
            SigError::SplitCoordinateDims { name, dims, test_dim } => write!(
                f,
                "Split coordinate '{name}' must span exactly ['{test_dim}'], found dims {dims:?}."
            ),
            SigError::UnknownCase { case, dim } => {
                write!(f, "Case '{case}' not found along dimension '{dim}'.")
            }

            // ---- Formatter configuration ----
            SigError::MissingStatDimension { variable: Some(v), dim } => {
                write!(f, "Variable '{v}' lacks required stat dimension '{dim}'.")
            }
            SigError::MissingStatDimension { variable: None, dim } => {
                write!(f, "Stat dimension '{dim}' not found on the input array.")
            }
            SigError::MissingStatKey { key } => {
                write!(f, "Statistic key '{key}' not found on the stat dimension.")
            }

            // ---- Numeric options ----
            SigError::InvalidAlpha(a) => {
                write!(f, "Invalid global_alpha: {a}. Must satisfy 0 < alpha < 1.")
            }
            SigError::InvalidDigits(d) => {
                write!(f, "Invalid number of significant digits: {d}. Must be at least 1.")
            }
            SigError::InvalidConfidence(c) => {
                write!(f, "Invalid confidence level: {c}. Must satisfy 0 < confidence < 1.")
            }
            SigError::InvalidNoise(n) => {
                write!(f, "Invalid noise threshold: {n}. Must be finite and non-negative.")
            }

            // ---- Results ----
            SigError::NoTestsProduced => {
                write!(f, "No significance tests were produced for the requested cases.")
            }

            // ---- Labeled layer ----
            SigError::Labeled(e) => write!(f, "{e}"),
        }
    }
}

impl From<LabeledError> for SigError {
    fn from(err: LabeledError) -> Self {
        SigError::Labeled(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<SigError> for PyErr {
    fn from(err: SigError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<LabeledError> for PyErr {
    fn from(err: LabeledError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` messages.
    // - Wrapping of labeled-layer errors and the `source` chain.
    //
    // They intentionally DO NOT cover:
    // - The `From<SigError> for PyErr` conversion, which needs the Python C
    //   API and is better handled by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that split-coordinate errors report the coordinate, its dims,
    // and the expected test dimension.
    //
    // Given
    // -----
    // - A `SplitCoordinateDims` for `season` spanning [time, lat].
    //
    // Expect
    // ------
    // - The message contains "season", "lat", and "time".
    fn split_coordinate_dims_display_includes_payload() {
        // Arrange
        let err = SigError::SplitCoordinateDims {
            name: "season".into(),
            dims: vec!["time".into(), "lat".into()],
            test_dim: "time".into(),
        };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("season") && msg.contains("lat") && msg.contains("time"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure labeled-layer errors convert with `?` and stay reachable as the
    // error source.
    //
    // Given
    // -----
    // - A `LabeledError::MissingIndex` on "time".
    //
    // Expect
    // ------
    // - `SigError::from` wraps it; `source()` is `Some`; message is kept.
    fn labeled_errors_wrap_and_expose_source() {
        // Arrange
        let inner = LabeledError::MissingIndex { dim: "time".into() };

        // Act
        let err = SigError::from(inner.clone());

        // Assert
        assert_eq!(err, SigError::Labeled(inner.clone()));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    // Purpose
    // -------
    // Check that numeric option errors echo the rejected value.
    //
    // Given
    // -----
    // - `InvalidAlpha(1.5)` and `InvalidDigits(0)`.
    //
    // Expect
    // ------
    // - Messages contain "1.5" and "0" respectively.
    fn numeric_option_errors_include_value() {
        // Act
        let alpha = SigError::InvalidAlpha(1.5).to_string();
        let digits = SigError::InvalidDigits(0).to_string();

        // Assert
        assert!(alpha.contains("1.5"), "Got: {alpha}");
        assert!(digits.contains('0'), "Got: {digits}");
    }
}
