//! calc::masking — hide values within a noise band around zero.

use crate::{
    labeled::LabeledArray,
    statistical_tests::{errors::SigResult, validation::validate_noise},
};

/// Default half-width of the noise band.
pub const DEFAULT_NOISE: f64 = 1e-5;

#[inline]
fn outside_band(v: f64, noise: f64) -> f64 {
    if v.abs() > noise { v } else { f64::NAN }
}

/// Copy of `a` with every value in `[-noise, noise]` replaced by NaN.
///
/// Errors
/// ------
/// - `SigError::InvalidNoise` when `noise` is negative or not finite.
pub fn masked(a: &LabeledArray, noise: f64) -> SigResult<LabeledArray> {
    validate_noise(noise)?;
    Ok(a.map(|&v| outside_band(v, noise)))
}

/// `a - b` with values in `[-noise, noise]` replaced by NaN.
///
/// `b` may store the same dims in another order; it is transposed to `a`'s
/// layout first.
pub fn diff_masked(a: &LabeledArray, b: &LabeledArray, noise: f64) -> SigResult<LabeledArray> {
    validate_noise(noise)?;
    let order: Vec<&str> = a.dims().iter().map(String::as_str).collect();
    let b = b.transpose(&order)?;
    Ok(a.zip_with(&b, |&x, &y| outside_band(x - y, noise))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistical_tests::SigError;

    #[test]
    // Purpose
    // -------
    // Verify the band is inclusive and NaN passes through.
    //
    // Given
    // -----
    // - Values [0.5, -0.5, 0.4, 2.0, NaN] with noise 0.5.
    //
    // Expect
    // ------
    // - Only 2.0 survives.
    fn masked_hides_values_inside_band() {
        // Arrange
        let a = LabeledArray::from_shape_vec(["x"], &[5], vec![0.5, -0.5, 0.4, 2.0, f64::NAN])
            .expect("valid");

        // Act
        let m = masked(&a, 0.5).expect("valid noise");

        // Assert
        let kept: Vec<f64> = m.data().iter().copied().filter(|v| v.is_finite()).collect();
        assert_eq!(kept, vec![2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Check differences are taken after aligning dim order and that bad noise
    // levels are rejected.
    //
    // Given
    // -----
    // - a over (time=2, x=2), b the same values stored as (x, time) plus 1
    //   except one cell equal to a.
    //
    // Expect
    // ------
    // - Differences −1 except the equal cell, which is NaN.
    // - noise = −1 yields `InvalidNoise`.
    fn diff_masked_aligns_layout_and_validates_noise() {
        // Arrange
        let a = LabeledArray::from_shape_vec(["time", "x"], &[2, 2], vec![1.0, 2.0, 3.0, 4.0])
            .expect("valid");
        // b[x, time]: a transposed, +1, with (time=1, x=1) left equal
        let b = LabeledArray::from_shape_vec(["x", "time"], &[2, 2], vec![2.0, 4.0, 3.0, 4.0])
            .expect("valid");

        // Act
        let d = diff_masked(&a, &b, DEFAULT_NOISE).expect("same dims");
        let bad = diff_masked(&a, &b, -1.0);

        // Assert
        let v: Vec<f64> = d.data().iter().copied().collect();
        assert_eq!(&v[..3], &[-1.0, -1.0, -1.0]);
        assert!(v[3].is_nan());
        assert!(matches!(bad, Err(SigError::InvalidNoise(_))));
    }
}
