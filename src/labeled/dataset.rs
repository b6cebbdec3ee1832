//! labeled::dataset — insertion-ordered collections of named arrays.
//!
//! A [`Dataset`] is the unit the orchestrator iterates over: one labeled
//! array per physical variable (e.g. `tas`, `pr`), all sharing a case and a
//! test dimension but otherwise free to differ in their remaining dims.
//! Variables keep the order they were inserted in; re-inserting a name
//! replaces the array in place.

use crate::labeled::{
    array::LabeledArray,
    errors::{LabeledError, LabeledResult},
    label::Label,
};

/// Insertion-ordered mapping from variable name to labeled array.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T = f64> {
    vars: Vec<(String, LabeledArray<T>)>,
}

impl<T> Default for Dataset<T> {
    fn default() -> Self {
        Dataset { vars: Vec::new() }
    }
}

impl<T: Clone> Dataset<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace variable `name`.
    pub fn insert(&mut self, name: &str, array: LabeledArray<T>) {
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = array,
            None => self.vars.push((name.to_string(), array)),
        }
    }

    /// Builder-style [`Dataset::insert`].
    pub fn with_var(mut self, name: &str, array: LabeledArray<T>) -> Self {
        self.insert(name, array);
        self
    }

    pub fn get(&self, name: &str) -> Option<&LabeledArray<T>> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }

    /// Like [`Dataset::get`], failing with `UnknownVariable`.
    pub fn require(&self, name: &str) -> LabeledResult<&LabeledArray<T>> {
        self.get(name).ok_or_else(|| LabeledError::UnknownVariable { name: name.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabeledArray<T>)> {
        self.vars.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn names(&self) -> Vec<&str> {
        self.vars.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether any variable carries `dim`.
    pub fn has_dim(&self, dim: &str) -> bool {
        self.vars.iter().any(|(_, a)| a.has_dim(dim))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Stack all variables along a new leading dim `dim` labelled by
    /// variable name.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::EmptyConcat` for an empty dataset.
    /// - `LabeledError::IncompatibleBlocks` when variables differ in layout.
    pub fn to_stacked(&self, dim: &str) -> LabeledResult<LabeledArray<T>> {
        let blocks = self
            .vars
            .iter()
            .map(|(n, a)| a.expand_dims(dim, Label::from(n)))
            .collect::<LabeledResult<Vec<_>>>()?;
        LabeledArray::concat(&blocks, dim)
    }
}

impl<T: Clone> FromIterator<(String, LabeledArray<T>)> for Dataset<T> {
    fn from_iter<I: IntoIterator<Item = (String, LabeledArray<T>)>>(iter: I) -> Self {
        let mut ds = Dataset::new();
        for (name, array) in iter {
            ds.insert(&name, array);
        }
        ds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeled::label::labels;

    fn series(values: Vec<f64>) -> LabeledArray {
        let n = values.len();
        LabeledArray::from_shape_vec(["time"], &[n], values).expect("valid shape")
    }

    #[test]
    // Purpose
    // -------
    // Verify insertion order is kept and re-inserting a name replaces the
    // array without moving it.
    //
    // Given
    // -----
    // - Variables inserted as tas, pr, then tas again.
    //
    // Expect
    // ------
    // - Names are [tas, pr] and `tas` holds the second array.
    fn insert_keeps_order_and_replaces_in_place() {
        // Arrange
        let mut ds = Dataset::new();

        // Act
        ds.insert("tas", series(vec![1.0]));
        ds.insert("pr", series(vec![2.0]));
        ds.insert("tas", series(vec![3.0]));

        // Assert
        assert_eq!(ds.names(), vec!["tas", "pr"]);
        assert_eq!(ds.get("tas").map(|a| a.data()[[0]]), Some(3.0));
        assert!(matches!(ds.require("hurs"), Err(LabeledError::UnknownVariable { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Check that stacking adds a leading dim indexed by variable name.
    //
    // Given
    // -----
    // - Two 2-step series `a` and `b`.
    //
    // Expect
    // ------
    // - Dims [variable, time], index [a, b], values row by row.
    fn to_stacked_adds_variable_dim() {
        // Arrange
        let ds = Dataset::new().with_var("a", series(vec![1.0, 2.0])).with_var("b", series(vec![3.0, 4.0]));

        // Act
        let stacked = ds.to_stacked("variable").expect("same layout");

        // Assert
        assert_eq!(stacked.dims(), ["variable".to_string(), "time".to_string()]);
        assert_eq!(stacked.index("variable").expect("index"), labels(["a", "b"]));
        assert_eq!(stacked.data().iter().copied().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
