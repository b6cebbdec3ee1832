//! labeled — a minimal labeled N-d array layer on top of `ndarray`.
//!
//! Purpose
//! -------
//! Give the significance workflow named dimensions, coordinate labels,
//! label-based selection, grouping, concatenation, and an explicit
//! vectorized map, without pulling in a full dataframe stack.
//!
//! Key behaviors
//! -------------
//! - [`LabeledArray`] couples an `ndarray::ArrayD` with dim names and
//!   [`Coord`]inates of typed [`Label`]s.
//! - [`Dataset`] holds several named arrays in insertion order.
//! - Structural failures surface as [`LabeledError`]; the layer never
//!   inspects the numeric values it carries.
//!
//! Downstream usage
//! ----------------
//! - `statistical_tests` builds every test primitive on
//!   [`LabeledArray::reduce_along`] / [`LabeledArray::reduce_pair_along`].
//! - `calc` uses the same layer for correlations and interval estimates.

pub mod array;
pub mod coord;
pub mod dataset;
pub mod errors;
pub mod label;

pub use self::array::LabeledArray;
pub use self::coord::Coord;
pub use self::dataset::Dataset;
pub use self::errors::{LabeledError, LabeledResult};
pub use self::label::{Label, labels};

pub mod prelude {
    pub use super::{Coord, Dataset, Label, LabeledArray, LabeledError, LabeledResult, labels};
}
