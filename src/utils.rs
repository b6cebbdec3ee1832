//! utils — Python input extraction shared by the PyO3 bindings.
//!
//! Only compiled with the `python-bindings` feature. Accepts the array-likes
//! that climate analysis notebooks pass around (numpy arrays, pandas Series,
//! xarray DataArrays via `to_numpy`, plain sequences) and hands back a
//! contiguous read-only `f64` buffer.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Extract a contiguous 1-D `f64` array from a Python object.
///
/// Tries, in order: a contiguous numpy array, the result of
/// `obj.to_numpy()` (pandas / xarray), and finally a copy of any sequence of
/// floats.
///
/// Errors
/// ------
/// - `TypeError` when the object is none of the above.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method0("to_numpy") {
        if let Ok(values_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if values_ro.as_slice().is_ok() {
                return Ok(values_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, xarray.DataArray, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract a 1-D `f64` sample and copy it into a Rust vector.
///
/// Errors
/// ------
/// - `TypeError` from [`extract_f64_array`].
/// - `ValueError` when the sample is empty and `allow_empty` is false.
#[cfg(feature = "python-bindings")]
pub fn extract_sample<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str, allow_empty: bool,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let data = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err(format!("{name} must be a contiguous 1-D array")))?;
    if data.is_empty() && !allow_empty {
        return Err(PyValueError::new_err(format!("{name} must not be empty")));
    }
    Ok(data.to_vec())
}
