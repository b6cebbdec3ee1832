//! rust_climstats — significance testing and reporting for climate model output.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the scalar test kernels and formatters to Python via the `_rust_climstats`
//! extension module. When the `python-bindings` feature is enabled, this
//! module defines the Python-facing classes and the `statistical_tests`
//! submodule used by the `rust_climstats` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`labeled`, `statistical_tests`, `calc`)
//!   as the public crate surface.
//! - Define `#[pyclass]` wrappers, `#[pyfunction]`s, and the `#[pymodule]`
//!   initializer for the `_rust_climstats` Python extension.
//! - Register the `statistical_tests` submodule under `rust_climstats` so that
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - The Python surface is one-dimensional: labeled multi-dimensional
//!   workflows are driven from Rust, or from Python by looping over cells.
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_rust_climstats.statistical_tests` and
//!   are wrapped by thin pure-Python facades in the `rust_climstats` package.
//! - Test conventions (zero handling, exact vs. asymptotic p-values, effect
//!   sizes) follow [`statistical_tests::rank_tests`].
//! - Errors from core Rust code surface in Python as `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on the inner modules and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - Structured run logging is available behind the `obs_slog` feature.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by `tests/integration_significance_pipeline.rs`.

pub mod calc;
pub mod labeled;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statistical_tests::{TestOutcome, rank_tests, report},
    utils::extract_sample,
};

/// Wilcoxon — Python-facing signed-rank test on a single sample.
///
/// Constructed from Python via `Wilcoxon(x)`, where `x` is a 1-D array-like
/// of differences; NaN and infinite entries are omitted. Degenerate input
/// (fewer than two finite values or all zeros) yields NaN properties.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_climstats.statistical_tests")]
pub struct Wilcoxon {
    inner: TestOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Wilcoxon {
    #[new]
    #[pyo3(text_signature = "(x, /)", signature = (raw_x))]
    pub fn new<'py>(py: Python<'py>, raw_x: &Bound<'py, PyAny>) -> PyResult<Wilcoxon> {
        let x = extract_sample(py, raw_x, "x", true)?;
        Ok(Wilcoxon { inner: rank_tests::wilcoxon(&x) })
    }

    /// min(R+, R-).
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p
    }

    /// Standardized statistic divided by sqrt(n).
    #[getter]
    pub fn effect_size(&self) -> f64 {
        self.inner.effect_size
    }
}

/// MannWhitneyU — Python-facing rank-sum test on two independent samples.
///
/// Constructed from Python via `MannWhitneyU(x, y)`; non-finite entries are
/// omitted from each side separately.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_climstats.statistical_tests")]
pub struct MannWhitneyU {
    inner: TestOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MannWhitneyU {
    #[new]
    #[pyo3(text_signature = "(x, y, /)", signature = (raw_x, raw_y))]
    pub fn new<'py>(
        py: Python<'py>, raw_x: &Bound<'py, PyAny>, raw_y: &Bound<'py, PyAny>,
    ) -> PyResult<MannWhitneyU> {
        let x = extract_sample(py, raw_x, "x", true)?;
        let y = extract_sample(py, raw_y, "y", true)?;
        Ok(MannWhitneyU { inner: rank_tests::mannwhitneyu(&x, &y) })
    }

    /// U statistic of the first sample.
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p
    }

    /// Rank-biserial correlation `1 - 2 U1 / (n1 n2)`.
    #[getter]
    pub fn effect_size(&self) -> f64 {
        self.inner.effect_size
    }
}

/// Benjamini–Hochberg adjusted p-values of a 1-D array (NaN kept in place).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (p_values))]
fn benjamini_hochberg<'py>(
    py: Python<'py>, p_values: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let p = extract_sample(py, p_values, "p_values", true)?;
    Ok(crate::statistical_tests::benjamini_hochberg(&p).into_pyarray(py))
}

/// Star code for a p-value (`***`, `**`, `*`, empty, or `nan_label`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (p, nan_label = ""))]
fn encode_significance(p: f64, nan_label: &str) -> String {
    report::encode_significance(p, nan_label)
}

/// `P = 0.xyz` label with a `P < 0.001` floor.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (p, nan_label = ""))]
fn format_pvalue(p: f64, nan_label: &str) -> String {
    report::format_pvalue(p, nan_label)
}

/// _rust_climstats — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Create the `statistical_tests` submodule, attach it to the top-level
/// extension module, and register it in `sys.modules` so that
/// `import rust_climstats.statistical_tests` works.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_climstats<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    statistical_tests(_py, m, &statistical_tests_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_climstats.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    _py: Python, rust_climstats: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Wilcoxon>()?;
    m.add_class::<MannWhitneyU>()?;
    m.add_function(wrap_pyfunction!(benjamini_hochberg, m)?)?;
    m.add_function(wrap_pyfunction!(encode_significance, m)?)?;
    m.add_function(wrap_pyfunction!(format_pvalue, m)?)?;
    rust_climstats.add_submodule(m)?;
    Ok(())
}
