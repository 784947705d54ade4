/// Angle utilities for ecliptic longitudes
///
/// This module provides the circular arithmetic used throughout chart
/// derivation: reducing arbitrary angles to the canonical [0, 360) range
/// and computing minimal angular separations between longitudes.
use ndarray::{Array1, Array2};

use crate::error::{ChartError, Result};
use crate::utils::config::FULL_CIRCLE_DEG;

/// Reduce an angle to the canonical range [0, 360)
///
/// # Arguments
/// * `angle` - Angle in degrees, any finite value
///
/// # Returns
/// Equivalent angle in [0, 360)
///
/// # Errors
/// Returns `ChartError::InvalidInput` for NaN or infinite input
pub fn normalize(angle: f64) -> Result<f64> {
    if !angle.is_finite() {
        return Err(ChartError::non_finite("angle", angle));
    }
    let reduced = angle.rem_euclid(FULL_CIRCLE_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if reduced >= FULL_CIRCLE_DEG {
        Ok(0.0)
    } else {
        Ok(reduced)
    }
}

/// Minimal angular separation between two longitudes
///
/// # Arguments
/// * `lon_a` - First longitude in degrees, normalized
/// * `lon_b` - Second longitude in degrees, normalized
///
/// # Returns
/// Separation in degrees, in [0, 180]
pub fn separation(lon_a: f64, lon_b: f64) -> f64 {
    let diff = (lon_a - lon_b).abs();
    diff.min(FULL_CIRCLE_DEG - diff)
}

// ============================================================================
// Vectorized batch operations
// ============================================================================

/// Normalize many angles at once
///
/// # Arguments
/// * `angles` - Array of angles in degrees
///
/// # Returns
/// Array of normalized angles, same shape as the input
///
/// # Errors
/// Fails on the first non-finite element, reporting its index
pub fn normalize_batch(angles: &Array1<f64>) -> Result<Array1<f64>> {
    let mut result = Array1::<f64>::zeros(angles.len());
    for (i, &angle) in angles.iter().enumerate() {
        result[i] = normalize(angle)
            .map_err(|_| ChartError::non_finite(format!("angle[{i}]"), angle))?;
    }
    Ok(result)
}

/// Pairwise separation matrix for a list of normalized longitudes
///
/// # Arguments
/// * `longitudes` - Normalized longitudes in degrees
///
/// # Returns
/// Symmetric Array2 with shape (N, N) and a zero diagonal, where entry
/// [i, j] is `separation(longitudes[i], longitudes[j])`
pub fn separation_matrix(longitudes: &[f64]) -> Array2<f64> {
    let n = longitudes.len();
    let mut result = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in (i + 1)..n {
            let sep = separation(longitudes[i], longitudes[j]);
            result[[i, j]] = sep;
            result[[j, i]] = sep;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_in_range() {
        for x in [-1080.5, -360.0, -0.25, 0.0, 45.0, 359.75, 360.0, 725.0] {
            let n = normalize(x).unwrap();
            assert!((0.0..360.0).contains(&n), "normalize({x}) = {n}");
        }
    }

    #[test]
    fn test_normalize_negative() {
        assert!((normalize(-30.0).unwrap() - 330.0).abs() < 1e-10);
        assert!((normalize(-390.0).unwrap() - 330.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_periodic() {
        let base = normalize(123.456).unwrap();
        for k in -5..=5 {
            let shifted = normalize(123.456 + 360.0 * k as f64).unwrap();
            assert!((shifted - base).abs() < 1e-9, "k={k}: {shifted} vs {base}");
        }
    }

    #[test]
    fn test_normalize_tiny_negative_stays_below_360() {
        let n = normalize(-1e-20).unwrap();
        assert!(n < 360.0);
    }

    #[test]
    fn test_normalize_rejects_non_finite() {
        assert!(normalize(f64::NAN).is_err());
        assert!(normalize(f64::INFINITY).is_err());
        assert!(normalize(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_separation_wraps() {
        assert!((separation(350.0, 10.0) - 20.0).abs() < 1e-10);
        assert!((separation(0.0, 183.0) - 177.0).abs() < 1e-10);
        assert!((separation(0.0, 180.0) - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_separation_matrix_symmetric() {
        let m = separation_matrix(&[0.0, 90.0, 350.0]);
        assert_eq!(m.shape(), &[3, 3]);
        for i in 0..3 {
            assert_eq!(m[[i, i]], 0.0);
            for j in 0..3 {
                assert_eq!(m[[i, j]], m[[j, i]]);
            }
        }
        assert!((m[[0, 2]] - 10.0).abs() < 1e-10);
        assert!((m[[1, 2]] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_batch_reports_index() {
        let arr = Array1::from(vec![10.0, f64::NAN]);
        let err = normalize_batch(&arr).unwrap_err();
        assert!(err.to_string().contains("angle[1]"));
    }
}
