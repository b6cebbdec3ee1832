//! labeled::errors — error type for labeled array construction and indexing.
//!
//! Purpose
//! -------
//! Report structural failures of the labeled array layer (unknown or
//! duplicate dimensions, shape mismatches, missing coordinates or labels,
//! incompatible concatenation blocks) as a single small enum so that the
//! statistical layers above can wrap it without losing the message.
//!
//! Conventions
//! -----------
//! - Every variant carries the offending names or sizes so that the
//!   `Display` output is self-explanatory without the array in hand.
//! - These errors always indicate a caller-side configuration problem; the
//!   labeled layer never fails because of the *values* stored in an array.

use crate::labeled::label::Label;

/// Result alias for labeled array operations.
pub type LabeledResult<T> = Result<T, LabeledError>;

/// Error conditions of the labeled array layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LabeledError {
    // ---- Dimensions ----
    /// A dimension name is not present on the array.
    UnknownDim { dim: String, available: Vec<String> },

    /// The same dimension name was given twice.
    DuplicateDim { dim: String },

    /// Data rank or extent does not match the declared dims.
    ShapeMismatch { expected: Vec<usize>, found: Vec<usize> },

    // ---- Coordinates ----
    /// A coordinate name is not present on the array.
    UnknownCoord { name: String },

    /// A label was not found on the index coordinate of a dimension.
    UnknownLabel { dim: String, label: Label },

    /// Label-based selection needs an index coordinate on the dimension.
    MissingIndex { dim: String },

    /// A coordinate was expected to span exactly one dimension.
    NotOneDimensional { name: String, dims: Vec<String> },

    // ---- Combination ----
    /// Blocks cannot be concatenated because their layout disagrees.
    IncompatibleBlocks { dim: String, reason: String },

    /// Concatenation was requested on an empty list of blocks.
    EmptyConcat { dim: String },

    // ---- Datasets ----
    /// A variable name is not present on the dataset.
    UnknownVariable { name: String },
}

impl std::error::Error for LabeledError {}

impl std::fmt::Display for LabeledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dimensions ----
            LabeledError::UnknownDim { dim, available } => {
                write!(f, "Dimension '{dim}' not found; available dims: {available:?}")
            }
            LabeledError::DuplicateDim { dim } => {
                write!(f, "Dimension '{dim}' appears more than once")
            }
            LabeledError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }

            // ---- Coordinates ----
            LabeledError::UnknownCoord { name } => {
                write!(f, "Coordinate '{name}' not found")
            }
            LabeledError::UnknownLabel { dim, label } => {
                write!(f, "Label '{label}' not found along dimension '{dim}'")
            }
            LabeledError::MissingIndex { dim } => {
                write!(f, "Dimension '{dim}' has no index coordinate to select labels from")
            }
            LabeledError::NotOneDimensional { name, dims } => {
                write!(f, "Coordinate '{name}' must span exactly one dimension, has dims {dims:?}")
            }

            // ---- Combination ----
            LabeledError::IncompatibleBlocks { dim, reason } => {
                write!(f, "Cannot concatenate along '{dim}': {reason}")
            }
            LabeledError::EmptyConcat { dim } => {
                write!(f, "Cannot concatenate an empty list of blocks along '{dim}'")
            }

            // ---- Datasets ----
            LabeledError::UnknownVariable { name } => {
                write!(f, "Variable '{name}' not found in dataset")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that dimension errors embed the offending name and the
    // available alternatives in their `Display` output.
    //
    // Given
    // -----
    // - An `UnknownDim` error for "time" on an array with dims ["lat"].
    //
    // Expect
    // ------
    // - The message mentions both "time" and "lat".
    fn unknown_dim_display_mentions_requested_and_available_dims() {
        // Arrange
        let err =
            LabeledError::UnknownDim { dim: "time".to_string(), available: vec!["lat".into()] };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("time") && msg.contains("lat"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure that label lookup failures report the label and the dimension.
    //
    // Given
    // -----
    // - An `UnknownLabel` error for label "ssp5" on dim "case".
    //
    // Expect
    // ------
    // - The message contains "ssp5" and "case".
    fn unknown_label_display_includes_label_and_dim() {
        // Arrange
        let err = LabeledError::UnknownLabel { dim: "case".into(), label: Label::from("ssp5") };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("ssp5") && msg.contains("case"), "Got: {msg}");
    }
}
