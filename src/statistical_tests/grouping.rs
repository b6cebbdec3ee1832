//! statistical_tests::grouping — optional split of an array before testing.
//!
//! Decomposes an array by a categorical coordinate defined on the test
//! dimension (e.g. one `season` label per `time` step), so that one test is
//! run per group. Without a split coordinate the whole array is a single
//! unlabeled group.

use crate::{
    labeled::{Label, LabeledArray},
    statistical_tests::errors::{SigError, SigResult},
};

/// One split group: the split label (if any) and the matching subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitGroup {
    /// `(split coordinate name, group value)`; `None` when not splitting.
    pub label: Option<(String, Label)>,
    pub data: LabeledArray,
}

/// Split `array` by the coordinate `split` defined on `test_dim`.
///
/// Errors
/// ------
/// - `SigError::MissingSplitCoordinate` if `split` is not a coordinate.
/// - `SigError::SplitCoordinateDims` if it does not span exactly
///   `[test_dim]`.
///
/// Notes
/// -----
/// - Groups are ordered by label and keep the test-dim order of their
///   members.
pub fn iter_groups(array: &LabeledArray, split: Option<&str>, test_dim: &str) -> SigResult<Vec<SplitGroup>> {
    let Some(name) = split else {
        return Ok(vec![SplitGroup { label: None, data: array.clone() }]);
    };
    let coord = array
        .coord(name)
        .ok_or_else(|| SigError::MissingSplitCoordinate { name: name.to_string() })?;
    if coord.dims() != [test_dim.to_string()] {
        return Err(SigError::SplitCoordinateDims {
            name: name.to_string(),
            dims: coord.dims().to_vec(),
            test_dim: test_dim.to_string(),
        });
    }
    Ok(array
        .group_by(name)?
        .into_iter()
        .map(|(label, data)| SplitGroup { label: Some((name.to_string(), label)), data })
        .collect())
}
