//! calc::correlation — weighted Pearson correlation over named dims.
//!
//! The sample dims are merged into one core dimension and each remaining
//! cell is reduced with a pairwise-complete weighted Pearson kernel: an
//! element contributes only when both values and its weight are finite.
//! Weights broadcast from any subset of the first operand's dims (e.g. a
//! grid-cell area over `lat, lon`).

use crate::{
    labeled::{Dataset, LabeledArray, LabeledError},
    statistical_tests::errors::SigResult,
};
use ndarray::ArrayView1;

const SAMPLE_DIM: &str = "__sample__";

/// Weighted Pearson correlation of one lane triple.
///
/// Returns NaN with fewer than 2 usable elements, non-positive total
/// weight, or zero variance on either side.
fn weighted_pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, w: ArrayView1<'_, f64>) -> f64 {
    let usable: Vec<(f64, f64, f64)> = x
        .iter()
        .zip(y.iter())
        .zip(w.iter())
        .filter(|((a, b), c)| a.is_finite() && b.is_finite() && c.is_finite())
        .map(|((&a, &b), &c)| (a, b, c))
        .collect();
    let sw: f64 = usable.iter().map(|t| t.2).sum();
    if usable.len() < 2 || sw <= 0.0 {
        return f64::NAN;
    }
    let mx = usable.iter().map(|t| t.2 * t.0).sum::<f64>() / sw;
    let my = usable.iter().map(|t| t.2 * t.1).sum::<f64>() / sw;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(a, b, c) in &usable {
        sxy += c * (a - mx) * (b - my);
        sxx += c * (a - mx).powi(2);
        syy += c * (b - my).powi(2);
    }
    let denom = (sxx * syy).sqrt();
    if denom > 0.0 { sxy / denom } else { f64::NAN }
}

/// Pearson correlation of `a` and `b` over `dims`, optionally weighted.
///
/// Parameters
/// ----------
/// - `a`, `b`: arrays with the same dims (any order) and extents.
/// - `dims`: sample dims reduced by the correlation.
/// - `weights`: optional non-negative weights over a subset of `a`'s dims.
///
/// Returns
/// -------
/// Correlation over the dims of `a` not in `dims`, in `a`'s order.
///
/// Errors
/// ------
/// - Labeled-layer errors for unknown dims, mismatched extents, or weights
///   with dims that `a` lacks.
pub fn corr(a: &LabeledArray, b: &LabeledArray, dims: &[&str], weights: Option<&LabeledArray>) -> SigResult<LabeledArray> {
    for d in dims {
        let (na, nb) = (a.dim_len(d)?, b.dim_len(d)?);
        if na != nb {
            return Err(LabeledError::ShapeMismatch { expected: vec![na], found: vec![nb] }.into());
        }
    }
    let w = match weights {
        Some(w) => a.replace_values(w.broadcast_to(a.dims(), a.shape())?.iter().copied().collect())?,
        None => a.map(|_| 1.0),
    };

    let xs = a.stack(dims, SAMPLE_DIM)?;
    let ys = b.stack(dims, SAMPLE_DIM)?;
    let ws = w.stack(dims, SAMPLE_DIM)?;
    let [r] = xs.reduce_zip_along(&[&ys, &ws], SAMPLE_DIM, |lanes| {
        [weighted_pearson(lanes[0].clone(), lanes[1].clone(), lanes[2].clone())]
    })?;
    Ok(r)
}

/// Correlation of each variable of `ds1` with the same-named variable of
/// `ds2`.
///
/// Errors
/// ------
/// - `LabeledError::UnknownVariable` when `ds2` lacks a variable of `ds1`.
pub fn corr_datasets(ds1: &Dataset, ds2: &Dataset, dims: &[&str], weights: Option<&LabeledArray>) -> SigResult<Dataset> {
    let mut out = Dataset::new();
    for (name, a) in ds1.iter() {
        out.insert(name, corr(a, ds2.require(name)?, dims, weights)?);
    }
    Ok(out)
}

/// Correlation of `a` with every variable of `ds`.
pub fn corr_with_dataset(a: &LabeledArray, ds: &Dataset, dims: &[&str], weights: Option<&LabeledArray>) -> SigResult<Dataset> {
    let mut out = Dataset::new();
    for (name, b) in ds.iter() {
        out.insert(name, corr(a, b, dims, weights)?);
    }
    Ok(out)
}

/// Correlation of every variable of `ds1` with every variable of `ds2`.
///
/// Returns
/// -------
/// Dataset keyed `"{var1}-{var2}"`, ordered by `ds1` then `ds2`.
pub fn corr_cross(ds1: &Dataset, ds2: &Dataset, dims: &[&str], weights: Option<&LabeledArray>) -> SigResult<Dataset> {
    let mut out = Dataset::new();
    for (v1, a) in ds1.iter() {
        for (v2, b) in ds2.iter() {
            out.insert(&format!("{v1}-{v2}"), corr(a, b, dims, weights)?);
        }
    }
    Ok(out)
}
