//! labeled::coord — coordinate variables attached to labeled arrays.
//!
//! A coordinate is an N-d array of [`Label`]s spanning zero or more of the
//! parent array's dimensions. A coordinate whose only dimension carries its
//! own name is the *index* of that dimension and is what label-based
//! selection resolves against; every other coordinate (for example a
//! `season` label per `time` step) simply travels along with the data.

use crate::labeled::{
    errors::{LabeledError, LabeledResult},
    label::Label,
};
use ndarray::{Array1, ArrayD, Axis};

/// Coordinate values over a subset of an array's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    dims: Vec<String>,
    values: ArrayD<Label>,
}

impl Coord {
    /// Build a coordinate from its dims and a row-major array of labels.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::ShapeMismatch` when the rank of `values` differs from
    ///   the number of dims.
    pub fn new(dims: Vec<String>, values: ArrayD<Label>) -> LabeledResult<Self> {
        if dims.len() != values.ndim() {
            return Err(LabeledError::ShapeMismatch {
                expected: vec![dims.len()],
                found: vec![values.ndim()],
            });
        }
        Ok(Coord { dims, values })
    }

    /// Build a one-dimensional coordinate along `dim`.
    pub fn along(dim: &str, values: Vec<Label>) -> Self {
        Coord { dims: vec![dim.to_string()], values: Array1::from(values).into_dyn() }
    }

    /// Dimensions spanned by this coordinate, in storage order.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Raw label array.
    pub fn values(&self) -> &ArrayD<Label> {
        &self.values
    }

    /// Whether this coordinate spans `dim`.
    pub fn spans(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Labels of a one-dimensional coordinate, in order.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::NotOneDimensional` when the coordinate spans zero or
    ///   several dims; `name` is only used for the message.
    pub fn labels_1d(&self, name: &str) -> LabeledResult<Vec<Label>> {
        if self.dims.len() != 1 {
            return Err(LabeledError::NotOneDimensional {
                name: name.to_string(),
                dims: self.dims.clone(),
            });
        }
        Ok(self.values.iter().cloned().collect())
    }

    fn axis(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    /// Coordinate after fixing `dim` at position `index`.
    ///
    /// Returns `None` when the coordinate collapses to a scalar; scalar
    /// coordinates are not kept.
    pub(crate) fn index_axis(&self, dim: &str, index: usize) -> Option<Coord> {
        match self.axis(dim) {
            None => Some(self.clone()),
            Some(_) if self.dims.len() == 1 => None,
            Some(ax) => {
                let values = self.values.index_axis(Axis(ax), index).to_owned();
                let dims = self.dims.iter().filter(|d| *d != dim).cloned().collect();
                Some(Coord { dims, values })
            }
        }
    }

    /// Coordinate restricted to `positions` along `dim`.
    pub(crate) fn select(&self, dim: &str, positions: &[usize]) -> Coord {
        match self.axis(dim) {
            None => self.clone(),
            Some(ax) => {
                Coord { dims: self.dims.clone(), values: self.values.select(Axis(ax), positions) }
            }
        }
    }

    /// Concatenate coordinates that all span `dim` along that dim.
    pub(crate) fn concat(parts: &[&Coord], dim: &str) -> LabeledResult<Coord> {
        let first = parts.first().ok_or(LabeledError::EmptyConcat { dim: dim.to_string() })?;
        let ax = first.axis(dim).ok_or_else(|| LabeledError::IncompatibleBlocks {
            dim: dim.to_string(),
            reason: "coordinate does not span the concatenation dim".to_string(),
        })?;
        if parts.iter().any(|c| c.dims != first.dims) {
            return Err(LabeledError::IncompatibleBlocks {
                dim: dim.to_string(),
                reason: "coordinate dims differ between blocks".to_string(),
            });
        }
        let views: Vec<_> = parts.iter().map(|c| c.values.view()).collect();
        let values = ndarray::concatenate(Axis(ax), &views).map_err(|e| {
            LabeledError::IncompatibleBlocks { dim: dim.to_string(), reason: e.to_string() }
        })?;
        Ok(Coord { dims: first.dims.clone(), values })
    }
}
