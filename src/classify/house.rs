/// House classification against a set of 12 cusps
///
/// House i spans [cusp[i], cusp[(i + 1) % 12]). A house whose end cusp is
/// smaller than its start cusp wraps through 0°.
use serde::Serialize;

use crate::error::{ChartError, Result};
use crate::utils::angle::normalize;
use crate::utils::config::{CUSP_SPAN_TOLERANCE_DEG, FULL_CIRCLE_DEG, HOUSE_COUNT};

/// House returned when no house matches a longitude
pub const FALLBACK_HOUSE: u8 = 1;

/// Twelve normalized house cusp longitudes, house 1 first
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HouseCuspSet {
    cusps: [f64; HOUSE_COUNT],
}

impl HouseCuspSet {
    /// Build a cusp set from raw ephemeris output
    ///
    /// Each cusp is normalized to [0, 360).
    ///
    /// # Errors
    /// Returns `ChartError::InvalidCuspSet` if there are not exactly 12
    /// cusps or any cusp is non-finite
    pub fn new(cusps: &[f64]) -> Result<Self> {
        if cusps.len() != HOUSE_COUNT {
            return Err(ChartError::InvalidCuspSet(format!(
                "expected {HOUSE_COUNT} cusps, got {}",
                cusps.len()
            )));
        }

        let mut normalized = [0.0; HOUSE_COUNT];
        for (i, &cusp) in cusps.iter().enumerate() {
            normalized[i] = normalize(cusp).map_err(|_| {
                ChartError::InvalidCuspSet(format!("cusp {} is not finite ({cusp})", i + 1))
            })?;
        }

        Ok(HouseCuspSet { cusps: normalized })
    }

    pub fn cusps(&self) -> &[f64; HOUSE_COUNT] {
        &self.cusps
    }

    /// Check that the houses tile the circle exactly once
    ///
    /// Sums the forward arc of every house; a well-formed set covers 360°
    /// with no gaps and no overlap.
    ///
    /// # Errors
    /// Returns `ChartError::InvalidCuspSet` describing the total coverage
    /// when it differs from 360°
    pub fn check_span(&self) -> Result<()> {
        let total: f64 = (0..HOUSE_COUNT)
            .map(|i| {
                let start = self.cusps[i];
                let end = self.cusps[(i + 1) % HOUSE_COUNT];
                if end >= start {
                    end - start
                } else {
                    end + FULL_CIRCLE_DEG - start
                }
            })
            .sum();

        if (total - FULL_CIRCLE_DEG).abs() > CUSP_SPAN_TOLERANCE_DEG {
            return Err(ChartError::InvalidCuspSet(format!(
                "houses cover {total:.6}° instead of one full circle"
            )));
        }
        Ok(())
    }

    fn contains(&self, house_idx: usize, longitude: f64) -> bool {
        let start = self.cusps[house_idx];
        let end = self.cusps[(house_idx + 1) % HOUSE_COUNT];
        if start <= end {
            start <= longitude && longitude < end
        } else {
            longitude >= start || longitude < end
        }
    }
}

/// Find the house containing a longitude, if any
///
/// # Arguments
/// * `longitude` - Ecliptic longitude in degrees, already in [0, 360)
/// * `cusps` - The house cusps
///
/// # Returns
/// The first matching house (1..=12), or `None` when the cusp set leaves
/// the longitude uncovered
pub fn locate_checked(longitude: f64, cusps: &HouseCuspSet) -> Option<u8> {
    (0..HOUSE_COUNT)
        .find(|&i| cusps.contains(i, longitude))
        .map(|i| (i + 1) as u8)
}

/// Find the house containing a longitude
///
/// Falls back to house 1 (`FALLBACK_HOUSE`) when no house matches, which
/// only happens for malformed cusp sets or floating-point boundary cases.
/// Use `locate_checked` to detect that case.
pub fn locate(longitude: f64, cusps: &HouseCuspSet) -> u8 {
    locate_checked(longitude, cusps).unwrap_or(FALLBACK_HOUSE)
}
