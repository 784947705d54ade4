/// Zodiac sign classification
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::tables::Sign;
use crate::utils::config::{FULL_CIRCLE_DEG, SIGN_WIDTH_DEG};

/// Sign and position within the sign for a longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignPlacement {
    pub sign: Sign,
    /// Degrees past the start of the sign, in [0, 30)
    pub degree_in_sign: f64,
}

/// Classify a normalized longitude into its zodiac sign
///
/// # Arguments
/// * `longitude` - Ecliptic longitude in degrees, already in [0, 360)
///
/// # Returns
/// The sign (`floor(longitude / 30)` in catalog order) and the remainder
/// `longitude mod 30`
///
/// # Errors
/// Returns `ChartError::InvalidInput` for non-finite longitudes or values
/// outside [0, 360)
pub fn classify(longitude: f64) -> Result<SignPlacement> {
    if !longitude.is_finite() {
        return Err(ChartError::non_finite("longitude", longitude));
    }
    if !(0.0..FULL_CIRCLE_DEG).contains(&longitude) {
        return Err(ChartError::InvalidInput {
            what: "longitude (expected normalized to [0, 360))".to_string(),
            value: longitude,
        });
    }

    let mut index = (longitude / SIGN_WIDTH_DEG).floor() as usize;
    // Division can round up across a sign boundary just below it
    if longitude < index as f64 * SIGN_WIDTH_DEG {
        index -= 1;
    }
    let sign = Sign::from_index(index).ok_or(ChartError::InvalidInput {
        what: "longitude".to_string(),
        value: longitude,
    })?;
    let degree_in_sign = longitude - index as f64 * SIGN_WIDTH_DEG;

    Ok(SignPlacement {
        sign,
        degree_in_sign,
    })
}
