//! Named chart points and their raw longitudes

use serde::{Deserialize, Serialize};

use crate::utils::config::{ASCENDANT, STANDARD_POINTS};

/// A named point with the longitude supplied by the ephemeris
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLongitude {
    pub name: String,
    /// Ecliptic longitude in degrees, not necessarily normalized
    pub longitude: f64,
}

impl PointLongitude {
    pub fn new(name: impl Into<String>, longitude: f64) -> Self {
        PointLongitude {
            name: name.into(),
            longitude,
        }
    }
}

impl<S: Into<String>> From<(S, f64)> for PointLongitude {
    fn from((name, longitude): (S, f64)) -> Self {
        PointLongitude::new(name, longitude)
    }
}

/// Whether `name` is one of the standard ephemeris bodies (Sun through Pluto)
pub fn is_standard_point(name: &str) -> bool {
    STANDARD_POINTS.contains(&name)
}

/// Whether `name` refers to the Ascendant, which is never house-located
pub fn is_ascendant(name: &str) -> bool {
    name == ASCENDANT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_lookups() {
        assert!(is_standard_point("Sun"));
        assert!(is_standard_point("Pluto"));
        assert!(!is_standard_point("Chiron"));
        assert!(is_ascendant("Ascendant"));
        assert!(!is_ascendant("ascendant"));
    }

    #[test]
    fn test_from_tuple() {
        let p: PointLongitude = ("Mars", 12.5).into();
        assert_eq!(p.name, "Mars");
        assert_eq!(p.longitude, 12.5);
    }
}
