//! labeled::array — N-dimensional arrays with named dims and coordinates.
//!
//! Purpose
//! -------
//! Provide the small slice of labeled-array functionality that the
//! significance workflow needs: named dimensions, label-based selection,
//! grouping by a categorical coordinate, concatenation, and an explicit
//! vectorized map that applies a scalar kernel along one "core" dimension
//! while broadcasting over all others.
//!
//! Key behaviors
//! -------------
//! - [`LabeledArray::reduce_along`] / [`LabeledArray::reduce_pair_along`]
//!   own all iteration and broadcasting; kernels only ever see 1-D views of
//!   the core dimension and return a fixed number of scalars.
//! - Label-based selection (`sel`, `sel_labels`) resolves against the
//!   dimension's *index* coordinate and never falls back to positions.
//! - Every operation returns a new array; receivers are never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - `dims.len() == data.ndim()` and dimension names are unique.
//! - Every coordinate spans only dims of its parent and has matching extents.
//! - Remaining dims keep their relative order through reductions,
//!   selections, and concatenations.
//!
//! Conventions
//! -----------
//! - New dims introduced by [`LabeledArray::expand_dims`] are always
//!   inserted as the leading axis, so repeated expansions stack outermost
//!   last-added first (e.g. `variable, case, season, ...`).
//! - Coordinates are stored in a `BTreeMap` keyed by name so iteration order
//!   is deterministic.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction guards, selection by label and position,
//!   grouping order, concatenation checks, and the lane ordering of the
//!   vectorized reductions (including a transposed second operand).

use crate::labeled::{
    coord::Coord,
    errors::{LabeledError, LabeledResult},
    label::Label,
};
use ndarray::{ArrayD, ArrayView1, Axis, IxDyn};
use std::collections::{BTreeMap, BTreeSet};

/// Labeled N-d array.
///
/// Fields
/// ------
/// - `dims`: dimension names, one per axis of `data`.
/// - `data`: the values, row-major over `dims`.
/// - `coords`: named coordinates keyed by coordinate name.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray<T = f64> {
    dims: Vec<String>,
    data: ArrayD<T>,
    coords: BTreeMap<String, Coord>,
}

impl<T: Clone> LabeledArray<T> {
    /// Wrap `data` with dimension names.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::ShapeMismatch` if the number of names differs from the
    ///   rank of `data`.
    /// - `LabeledError::DuplicateDim` if a name repeats.
    pub fn new<I, S>(dims: I, data: ArrayD<T>) -> LabeledResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(LabeledError::ShapeMismatch {
                expected: vec![dims.len()],
                found: vec![data.ndim()],
            });
        }
        let mut seen = BTreeSet::new();
        for d in &dims {
            if !seen.insert(d.as_str()) {
                return Err(LabeledError::DuplicateDim { dim: d.clone() });
            }
        }
        Ok(LabeledArray { dims, data, coords: BTreeMap::new() })
    }

    /// Build from a flat row-major vector and an explicit shape.
    pub fn from_shape_vec<I, S>(dims: I, shape: &[usize], values: Vec<T>) -> LabeledResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let found = vec![values.len()];
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| {
            LabeledError::ShapeMismatch { expected: vec![shape.iter().product()], found }
        })?;
        Self::new(dims, data)
    }

    /// Attach a coordinate `name` spanning `dims`, with row-major `values`.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::UnknownDim` if a coordinate dim is not on the array.
    /// - `LabeledError::ShapeMismatch` if `values.len()` does not equal the
    ///   product of the spanned extents.
    pub fn with_coord(mut self, name: &str, dims: &[&str], values: Vec<Label>) -> LabeledResult<Self> {
        let mut shape = Vec::with_capacity(dims.len());
        for d in dims {
            shape.push(self.dim_len(d)?);
        }
        let found = vec![values.len()];
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            LabeledError::ShapeMismatch { expected: vec![shape.iter().product()], found }
        })?;
        let coord = Coord::new(dims.iter().map(|d| d.to_string()).collect(), arr)?;
        self.coords.insert(name.to_string(), coord);
        Ok(self)
    }

    /// Attach the index coordinate of `dim`.
    pub fn with_index(self, dim: &str, values: Vec<Label>) -> LabeledResult<Self> {
        self.with_coord(dim, &[dim], values)
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn coords(&self) -> &BTreeMap<String, Coord> {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Coord> {
        self.coords.get(name)
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    /// Axis position of `dim`.
    pub fn axis_of(&self, dim: &str) -> LabeledResult<usize> {
        self.dims.iter().position(|d| d == dim).ok_or_else(|| LabeledError::UnknownDim {
            dim: dim.to_string(),
            available: self.dims.clone(),
        })
    }

    /// Extent of `dim`.
    pub fn dim_len(&self, dim: &str) -> LabeledResult<usize> {
        Ok(self.data.len_of(Axis(self.axis_of(dim)?)))
    }

    /// Labels of the index coordinate of `dim`.
    pub fn index(&self, dim: &str) -> LabeledResult<Vec<Label>> {
        self.axis_of(dim)?;
        match self.coords.get(dim) {
            Some(c) if c.dims().len() == 1 && c.dims()[0] == dim => c.labels_1d(dim),
            _ => Err(LabeledError::MissingIndex { dim: dim.to_string() }),
        }
    }

    fn position_of(index: &[Label], dim: &str, label: &Label) -> LabeledResult<usize> {
        index.iter().position(|l| l == label).ok_or_else(|| LabeledError::UnknownLabel {
            dim: dim.to_string(),
            label: label.clone(),
        })
    }

    /// Select one label along `dim`, dropping the dimension.
    pub fn sel(&self, dim: &str, label: &Label) -> LabeledResult<Self> {
        let index = self.index(dim)?;
        let pos = Self::position_of(&index, dim, label)?;
        self.isel_drop(dim, pos)
    }

    /// Select one position along `dim`, dropping the dimension.
    pub fn isel_drop(&self, dim: &str, position: usize) -> LabeledResult<Self> {
        let ax = self.axis_of(dim)?;
        let len = self.data.len_of(Axis(ax));
        if position >= len {
            return Err(LabeledError::ShapeMismatch { expected: vec![len], found: vec![position] });
        }
        let data = self.data.index_axis(Axis(ax), position).to_owned();
        let dims = self.dims.iter().filter(|d| *d != dim).cloned().collect();
        let coords = self
            .coords
            .iter()
            .filter_map(|(name, c)| c.index_axis(dim, position).map(|c| (name.clone(), c)))
            .collect();
        Ok(LabeledArray { dims, data, coords })
    }

    /// Keep `positions` along `dim` (in the given order).
    pub fn isel(&self, dim: &str, positions: &[usize]) -> LabeledResult<Self> {
        let ax = self.axis_of(dim)?;
        let len = self.data.len_of(Axis(ax));
        if let Some(&bad) = positions.iter().find(|&&p| p >= len) {
            return Err(LabeledError::ShapeMismatch { expected: vec![len], found: vec![bad] });
        }
        let data = self.data.select(Axis(ax), positions);
        let coords =
            self.coords.iter().map(|(name, c)| (name.clone(), c.select(dim, positions))).collect();
        Ok(LabeledArray { dims: self.dims.clone(), data, coords })
    }

    /// Re-index `dim` to exactly `wanted`, matching by label value.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::UnknownLabel` for the first wanted label that is not
    ///   on the index.
    pub fn sel_labels(&self, dim: &str, wanted: &[Label]) -> LabeledResult<Self> {
        let index = self.index(dim)?;
        let lookup: BTreeMap<&Label, usize> =
            index.iter().enumerate().map(|(i, l)| (l, i)).collect();
        let positions = wanted
            .iter()
            .map(|l| {
                lookup.get(l).copied().ok_or_else(|| LabeledError::UnknownLabel {
                    dim: dim.to_string(),
                    label: l.clone(),
                })
            })
            .collect::<LabeledResult<Vec<usize>>>()?;
        self.isel(dim, &positions)
    }

    /// Insert a leading singleton dimension `dim` labelled `label`.
    pub fn expand_dims(&self, dim: &str, label: Label) -> LabeledResult<Self> {
        if self.has_dim(dim) || self.coords.contains_key(dim) {
            return Err(LabeledError::DuplicateDim { dim: dim.to_string() });
        }
        let data = self.data.clone().insert_axis(Axis(0));
        let mut dims = Vec::with_capacity(self.dims.len() + 1);
        dims.push(dim.to_string());
        dims.extend(self.dims.iter().cloned());
        let mut coords = self.coords.clone();
        coords.insert(dim.to_string(), Coord::along(dim, vec![label]));
        Ok(LabeledArray { dims, data, coords })
    }

    /// Reorder dims to `order`, which must be a permutation of the dims.
    pub fn transpose(&self, order: &[&str]) -> LabeledResult<Self> {
        if order.len() != self.dims.len() {
            return Err(LabeledError::ShapeMismatch {
                expected: vec![self.dims.len()],
                found: vec![order.len()],
            });
        }
        let mut perm = Vec::with_capacity(order.len());
        for d in order {
            let ax = self.axis_of(d)?;
            if perm.contains(&ax) {
                return Err(LabeledError::DuplicateDim { dim: d.to_string() });
            }
            perm.push(ax);
        }
        let data = self.data.view().permuted_axes(perm).to_owned();
        let dims = order.iter().map(|d| d.to_string()).collect();
        Ok(LabeledArray { dims, data, coords: self.coords.clone() })
    }

    /// Concatenate blocks along an existing dimension `dim`.
    ///
    /// All blocks must share dims (same order), extents on every other dim,
    /// and every coordinate not spanning `dim`. Coordinates spanning `dim`
    /// are concatenated in block order.
    pub fn concat(blocks: &[Self], dim: &str) -> LabeledResult<Self> {
        let first = blocks.first().ok_or(LabeledError::EmptyConcat { dim: dim.to_string() })?;
        let ax = first.axis_of(dim)?;
        let incompatible = |reason: String| LabeledError::IncompatibleBlocks {
            dim: dim.to_string(),
            reason,
        };

        for b in &blocks[1..] {
            if b.dims != first.dims {
                return Err(incompatible(format!("dims {:?} vs {:?}", b.dims, first.dims)));
            }
            let same_extent = b
                .shape()
                .iter()
                .zip(first.shape())
                .enumerate()
                .all(|(i, (x, y))| i == ax || x == y);
            if !same_extent {
                return Err(incompatible(format!("shape {:?} vs {:?}", b.shape(), first.shape())));
            }
            if b.coords.keys().ne(first.coords.keys()) {
                return Err(incompatible("coordinate names differ between blocks".to_string()));
            }
        }

        let mut coords = BTreeMap::new();
        for (name, c) in &first.coords {
            if c.spans(dim) {
                let parts: Vec<&Coord> = blocks.iter().filter_map(|b| b.coords.get(name)).collect();
                coords.insert(name.clone(), Coord::concat(&parts, dim)?);
            } else {
                if blocks.iter().any(|b| b.coords.get(name) != Some(c)) {
                    return Err(incompatible(format!("coordinate '{name}' differs between blocks")));
                }
                coords.insert(name.clone(), c.clone());
            }
        }

        let views: Vec<_> = blocks.iter().map(|b| b.data.view()).collect();
        let data =
            ndarray::concatenate(Axis(ax), &views).map_err(|e| incompatible(e.to_string()))?;
        Ok(LabeledArray { dims: first.dims.clone(), data, coords })
    }

    /// Broadcast every block to the ordered union of the blocks' dims.
    ///
    /// Dims are ordered by first appearance across `blocks`. A block lacking
    /// a dim repeats its values along it and takes over the coordinates of
    /// the first block that carries the dim. Dims shared by several blocks
    /// must have the same extent.
    ///
    /// Errors
    /// ------
    /// - `LabeledError::ShapeMismatch` when a shared dim differs in extent.
    pub fn align_dims(blocks: &[Self]) -> LabeledResult<Vec<Self>> {
        let mut dims: Vec<String> = Vec::new();
        let mut shape: Vec<usize> = Vec::new();
        let mut donors: Vec<usize> = Vec::new();
        for (b, block) in blocks.iter().enumerate() {
            for (d, &n) in block.dims.iter().zip(block.shape()) {
                if !dims.contains(d) {
                    dims.push(d.clone());
                    shape.push(n);
                    donors.push(b);
                }
            }
        }

        blocks
            .iter()
            .map(|block| {
                if block.dims == dims && block.shape() == shape.as_slice() {
                    return Ok(block.clone());
                }
                let data = block.broadcast_to(&dims, &shape)?;
                let mut coords = block.coords.clone();
                for (d, &donor) in dims.iter().zip(&donors) {
                    if block.has_dim(d) {
                        continue;
                    }
                    for (name, c) in &blocks[donor].coords {
                        if c.spans(d) {
                            coords.entry(name.clone()).or_insert_with(|| c.clone());
                        }
                    }
                }
                Ok(LabeledArray { dims: dims.clone(), data, coords })
            })
            .collect()
    }

    /// Split along the dimension of a 1-D coordinate, one block per distinct
    /// label, ordered by label.
    pub fn group_by(&self, coord_name: &str) -> LabeledResult<Vec<(Label, Self)>> {
        let coord = self
            .coords
            .get(coord_name)
            .ok_or_else(|| LabeledError::UnknownCoord { name: coord_name.to_string() })?;
        let labels = coord.labels_1d(coord_name)?;
        let dim = coord.dims()[0].clone();

        let mut members: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
        for (i, l) in labels.into_iter().enumerate() {
            members.entry(l).or_default().push(i);
        }
        members
            .into_iter()
            .map(|(label, positions)| Ok((label, self.isel(&dim, &positions)?)))
            .collect()
    }

    /// Elementwise map into a new element type; dims and coords are kept.
    pub fn map<U, F>(&self, f: F) -> LabeledArray<U>
    where
        F: FnMut(&T) -> U,
    {
        LabeledArray { dims: self.dims.clone(), data: self.data.map(f), coords: self.coords.clone() }
    }

    /// Same layout and coordinates with new row-major `values`.
    pub fn replace_values<U>(&self, values: Vec<U>) -> LabeledResult<LabeledArray<U>> {
        let found = vec![values.len()];
        let data = ArrayD::from_shape_vec(IxDyn(self.shape()), values).map_err(|_| {
            LabeledError::ShapeMismatch { expected: vec![self.data.len()], found }
        })?;
        Ok(LabeledArray { dims: self.dims.clone(), data, coords: self.coords.clone() })
    }

    /// Elementwise combination with an array of identical layout.
    pub fn zip_with<U, V, F>(&self, other: &LabeledArray<U>, mut f: F) -> LabeledResult<LabeledArray<V>>
    where
        U: Clone,
        F: FnMut(&T, &U) -> V,
    {
        if self.dims != other.dims || self.shape() != other.shape() {
            return Err(LabeledError::ShapeMismatch {
                expected: self.shape().to_vec(),
                found: other.shape().to_vec(),
            });
        }
        let values: Vec<V> = self.data.iter().zip(other.data.iter()).map(|(a, b)| f(a, b)).collect();
        let data = ArrayD::from_shape_vec(IxDyn(self.shape()), values).map_err(|_| {
            LabeledError::ShapeMismatch { expected: self.shape().to_vec(), found: vec![] }
        })?;
        Ok(LabeledArray { dims: self.dims.clone(), data, coords: self.coords.clone() })
    }

    /// Overwrite every slice along `dim` whose index label satisfies `pred`.
    pub fn fill_where_label<P>(&self, dim: &str, pred: P, value: T) -> LabeledResult<Self>
    where
        P: Fn(&Label) -> bool,
    {
        let ax = self.axis_of(dim)?;
        let index = self.index(dim)?;
        let mut out = self.clone();
        for (i, l) in index.iter().enumerate() {
            if pred(l) {
                out.data.index_axis_mut(Axis(ax), i).fill(value.clone());
            }
        }
        Ok(out)
    }

    /// Broadcast this array into the layout `dims` / `shape`.
    ///
    /// Every own dim must appear in `dims` with the same extent; target dims
    /// missing here are broadcast.
    pub fn broadcast_to(&self, dims: &[String], shape: &[usize]) -> LabeledResult<ArrayD<T>> {
        let mismatch = || LabeledError::ShapeMismatch {
            expected: shape.to_vec(),
            found: self.shape().to_vec(),
        };
        let mut targets = Vec::with_capacity(self.dims.len());
        for d in &self.dims {
            let pos = dims.iter().position(|t| t == d).ok_or_else(|| {
                LabeledError::UnknownDim { dim: d.clone(), available: dims.to_vec() }
            })?;
            targets.push(pos);
        }
        let mut perm: Vec<usize> = (0..self.dims.len()).collect();
        perm.sort_by_key(|&ax| targets[ax]);

        let mut view = self.data.view().permuted_axes(perm);
        for (i, d) in dims.iter().enumerate() {
            if !self.has_dim(d) {
                view = view.insert_axis(Axis(i));
            }
        }
        view.broadcast(IxDyn(shape)).map(|v| v.to_owned()).ok_or_else(mismatch)
    }

    /// Merge `dims` into one trailing dimension `new_dim` (row-major over
    /// `dims` in the given order). Coordinates on merged dims are dropped.
    pub fn stack(&self, dims: &[&str], new_dim: &str) -> LabeledResult<Self> {
        if self.has_dim(new_dim) && !dims.contains(&new_dim) {
            return Err(LabeledError::DuplicateDim { dim: new_dim.to_string() });
        }
        let mut order: Vec<&str> =
            self.dims.iter().map(String::as_str).filter(|d| !dims.contains(d)).collect();
        let kept = order.len();
        order.extend_from_slice(dims);
        let moved = self.transpose(&order)?;

        let mut shape: Vec<usize> = moved.shape()[..kept].to_vec();
        shape.push(moved.shape()[kept..].iter().product());
        let values: Vec<T> = moved.data.iter().cloned().collect();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            LabeledError::ShapeMismatch { expected: shape.clone(), found: moved.shape().to_vec() }
        })?;

        let mut new_dims: Vec<String> = order[..kept].iter().map(|d| d.to_string()).collect();
        new_dims.push(new_dim.to_string());
        let coords = self
            .coords
            .iter()
            .filter(|(_, c)| !dims.iter().any(|d| c.spans(d)))
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        Ok(LabeledArray { dims: new_dims, data, coords })
    }

    fn coords_without(&self, dim: &str) -> BTreeMap<String, Coord> {
        self.coords.iter().filter(|(_, c)| !c.spans(dim)).map(|(n, c)| (n.clone(), c.clone())).collect()
    }

    fn assemble<const K: usize>(
        dims: Vec<String>, shape: &[usize], coords: BTreeMap<String, Coord>,
        columns: [Vec<f64>; K],
    ) -> LabeledResult<[LabeledArray<f64>; K]> {
        let built = columns
            .into_iter()
            .map(|values| {
                let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| {
                    LabeledError::ShapeMismatch { expected: shape.to_vec(), found: vec![] }
                })?;
                Ok(LabeledArray { dims: dims.clone(), data, coords: coords.clone() })
            })
            .collect::<LabeledResult<Vec<_>>>()?;
        built.try_into().map_err(|_| LabeledError::ShapeMismatch {
            expected: vec![K],
            found: vec![],
        })
    }
}

impl LabeledArray<f64> {
    /// Apply `kernel` to every 1-D lane along `dim`.
    ///
    /// The result holds `K` arrays with `dim` removed; remaining dims keep
    /// their order and coordinates not spanning `dim` are carried over.
    pub fn reduce_along<const K: usize, F>(&self, dim: &str, mut kernel: F) -> LabeledResult<[Self; K]>
    where
        F: FnMut(ArrayView1<'_, f64>) -> [f64; K],
    {
        let ax = self.axis_of(dim)?;
        let dims: Vec<String> = self.dims.iter().filter(|d| *d != dim).cloned().collect();
        let shape: Vec<usize> =
            self.shape().iter().enumerate().filter(|(i, _)| *i != ax).map(|(_, &n)| n).collect();
        let cells: usize = shape.iter().product();

        let mut columns: [Vec<f64>; K] = std::array::from_fn(|_| Vec::with_capacity(cells));
        for lane in self.data.lanes(Axis(ax)) {
            for (col, v) in columns.iter_mut().zip(kernel(lane)) {
                col.push(v);
            }
        }
        Self::assemble(dims, &shape, self.coords_without(dim), columns)
    }

    /// Apply `kernel` to matching lane pairs of `self` and `other` along `dim`.
    ///
    /// `other` must carry the same non-core dims with the same extents, in any
    /// order; it is transposed to `self`'s order before lanes are zipped. The
    /// core dim may have different lengths on the two sides.
    pub fn reduce_pair_along<const K: usize, F>(
        &self, other: &Self, dim: &str, mut kernel: F,
    ) -> LabeledResult<[Self; K]>
    where
        F: FnMut(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> [f64; K],
    {
        self.reduce_zip_along(&[other], dim, |lanes| kernel(lanes[0].clone(), lanes[1].clone()))
    }

    /// Apply `kernel` to the matching lanes of `self` and every array in
    /// `others` along `dim`; the kernel sees `self`'s lane first.
    pub fn reduce_zip_along<const K: usize, F>(
        &self, others: &[&Self], dim: &str, mut kernel: F,
    ) -> LabeledResult<[Self; K]>
    where
        F: FnMut(&[ArrayView1<'_, f64>]) -> [f64; K],
    {
        let ax = self.axis_of(dim)?;
        let rest: Vec<usize> = (0..self.dims.len()).filter(|&i| i != ax).collect();

        let mut views = Vec::with_capacity(others.len());
        for other in others {
            let mismatch = || LabeledError::ShapeMismatch {
                expected: self.shape().to_vec(),
                found: other.shape().to_vec(),
            };
            if other.dims.len() != self.dims.len() {
                return Err(mismatch());
            }
            let mut perm = Vec::with_capacity(other.dims.len());
            for &i in &rest {
                let j = other.axis_of(&self.dims[i])?;
                if other.shape()[j] != self.shape()[i] {
                    return Err(mismatch());
                }
                perm.push(j);
            }
            perm.push(other.axis_of(dim)?);
            views.push(other.data.view().permuted_axes(perm));
        }
        let mut perm_a = rest.clone();
        perm_a.push(ax);
        let a = self.data.view().permuted_axes(perm_a);
        let last = Axis(rest.len());

        let dims: Vec<String> = rest.iter().map(|&i| self.dims[i].clone()).collect();
        let shape: Vec<usize> = rest.iter().map(|&i| self.shape()[i]).collect();
        let cells: usize = shape.iter().product();

        let mut iters: Vec<_> = views.iter().map(|v| v.lanes(last).into_iter()).collect();
        let mut columns: [Vec<f64>; K] = std::array::from_fn(|_| Vec::with_capacity(cells));
        let mut lanes = Vec::with_capacity(others.len() + 1);
        for la in a.lanes(last) {
            lanes.clear();
            lanes.push(la);
            lanes.extend(iters.iter_mut().filter_map(Iterator::next));
            for (col, v) in columns.iter_mut().zip(kernel(&lanes)) {
                col.push(v);
            }
        }
        Self::assemble(dims, &shape, self.coords_without(dim), columns)
    }
}
