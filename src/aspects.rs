/// Aspect detection between chart points
///
/// Every unordered pair of eligible points is compared against each entry of
/// an aspect catalog. A pair matches an aspect when its minimal angular
/// separation lies within the orb of the aspect's ideal angle. Pairs are
/// enumerated in input order, (0,1), (0,2), …, (1,2), …, and matches for a
/// pair follow catalog order, so the output sequence is fully determined by
/// the order of the inputs.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::error::{ChartError, Result};
use crate::points::PointLongitude;
use crate::utils::angle::{normalize, separation_matrix};
use crate::utils::config::{ASCENDANT, DEFAULT_ORB_DEG};

/// An aspect type and its ideal angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub name: String,
    /// Ideal separation in degrees, within [0, 180]
    pub angle: f64,
}

impl AspectDefinition {
    pub fn new(name: impl Into<String>, angle: f64) -> Self {
        AspectDefinition {
            name: name.into(),
            angle,
        }
    }
}

/// The five major aspects
pub fn major_aspects() -> Vec<AspectDefinition> {
    vec![
        AspectDefinition::new("Conjunction", 0.0),
        AspectDefinition::new("Sextile", 60.0),
        AspectDefinition::new("Square", 90.0),
        AspectDefinition::new("Trine", 120.0),
        AspectDefinition::new("Opposition", 180.0),
    ]
}

/// A detected aspect between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub point_a: String,
    pub point_b: String,
    pub aspect: String,
    /// Ideal angle of the matched aspect in degrees
    pub angle: f64,
    /// Actual minimal separation between the points in degrees
    pub separation: f64,
    /// |separation - angle|, never greater than the orb
    pub orb_error: f64,
}

/// Configuration for aspect detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectConfig {
    /// Maximum allowed deviation from an ideal angle in degrees
    #[serde(default = "default_orb")]
    pub orb: f64,
    /// Aspect catalog, checked in order for every pair
    #[serde(default = "major_aspects")]
    pub aspects: Vec<AspectDefinition>,
    /// Points that are classified but never paired
    #[serde(
        default = "default_exclusions",
        rename = "aspect_exclusions",
        alias = "exclude"
    )]
    pub exclude: Vec<String>,
}

fn default_orb() -> f64 {
    DEFAULT_ORB_DEG
}

pub(crate) fn default_exclusions() -> Vec<String> {
    vec![ASCENDANT.to_string()]
}

impl Default for AspectConfig {
    fn default() -> Self {
        AspectConfig {
            orb: default_orb(),
            aspects: major_aspects(),
            exclude: default_exclusions(),
        }
    }
}

impl AspectConfig {
    /// Validate the configuration and build a detector
    ///
    /// # Errors
    /// Returns `ChartError::InvalidConfig` if the orb is negative or
    /// non-finite, an aspect angle lies outside [0, 180], or two aspects
    /// share a name
    pub fn to_detector(&self) -> Result<AspectDetector> {
        if !self.orb.is_finite() || self.orb < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "orb must be a non-negative finite number of degrees (got {})",
                self.orb
            )));
        }

        let mut names = HashSet::new();
        for aspect in &self.aspects {
            if !aspect.angle.is_finite() || !(0.0..=180.0).contains(&aspect.angle) {
                return Err(ChartError::InvalidConfig(format!(
                    "aspect {} has angle {} outside [0, 180]",
                    aspect.name, aspect.angle
                )));
            }
            if !names.insert(aspect.name.as_str()) {
                return Err(ChartError::InvalidConfig(format!(
                    "aspect {} listed more than once",
                    aspect.name
                )));
            }
        }

        Ok(AspectDetector {
            orb: self.orb,
            aspects: self.aspects.clone(),
            exclude: self.exclude.iter().cloned().collect(),
        })
    }

    /// Human-readable summary, e.g. `AspectConfig(aspects=5, orb=6°)`
    pub fn name(&self) -> String {
        format!(
            "AspectConfig(aspects={}, orb={}°)",
            self.aspects.len(),
            self.orb
        )
    }
}

/// Validated aspect detector
#[derive(Debug, Clone)]
pub struct AspectDetector {
    orb: f64,
    aspects: Vec<AspectDefinition>,
    exclude: HashSet<String>,
}

impl AspectDetector {
    /// Major aspects, default orb, Ascendant excluded
    pub fn standard() -> Self {
        AspectDetector {
            orb: DEFAULT_ORB_DEG,
            aspects: major_aspects(),
            exclude: default_exclusions().into_iter().collect(),
        }
    }

    pub fn orb(&self) -> f64 {
        self.orb
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }

    /// Detect aspects among the given points
    ///
    /// Excluded points and points with non-finite longitudes are dropped
    /// before pairing; the remaining points keep their relative order.
    ///
    /// # Arguments
    /// * `points` - Named longitudes in degrees, in the order pairs are enumerated
    ///
    /// # Returns
    /// All matches, ordered by pair then by catalog entry
    pub fn detect(&self, points: &[PointLongitude]) -> Vec<AspectMatch> {
        let mut names: Vec<&str> = Vec::with_capacity(points.len());
        let mut longitudes: Vec<f64> = Vec::with_capacity(points.len());

        for point in points {
            if self.is_excluded(&point.name) {
                continue;
            }
            match normalize(point.longitude) {
                Ok(lon) => {
                    names.push(&point.name);
                    longitudes.push(lon);
                }
                Err(e) => warn!("Skipping {} in aspect detection: {}", point.name, e),
            }
        }

        let separations = separation_matrix(&longitudes);
        let n = longitudes.len();
        let mut matches = Vec::new();

        for i in 0..n {
            for j in (i + 1)..n {
                let sep = separations[[i, j]];
                for aspect in &self.aspects {
                    let orb_error = (sep - aspect.angle).abs();
                    if orb_error <= self.orb {
                        matches.push(AspectMatch {
                            point_a: names[i].to_string(),
                            point_b: names[j].to_string(),
                            aspect: aspect.name.clone(),
                            angle: aspect.angle,
                            separation: sep,
                            orb_error,
                        });
                    }
                }
            }
        }

        matches
    }
}

/// Detect aspects with an explicit catalog, orb and exclusion list
///
/// Convenience wrapper over `AspectConfig::to_detector` and
/// `AspectDetector::detect`.
pub fn detect_aspects(
    points: &[PointLongitude],
    exclude: &[String],
    aspects: &[AspectDefinition],
    orb: f64,
) -> Result<Vec<AspectMatch>> {
    let detector = AspectConfig {
        orb,
        aspects: aspects.to_vec(),
        exclude: exclude.to_vec(),
    }
    .to_detector()?;
    Ok(detector.detect(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(list: &[(&str, f64)]) -> Vec<PointLongitude> {
        list.iter().map(|&(n, l)| PointLongitude::new(n, l)).collect()
    }

    fn detect_default(points: &[PointLongitude]) -> Vec<AspectMatch> {
        detect_aspects(points, &[], &major_aspects(), DEFAULT_ORB_DEG).unwrap()
    }

    #[test]
    fn test_exact_square() {
        let m = detect_default(&pts(&[("A", 0.0), ("B", 90.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Square");
        assert_eq!(m[0].orb_error, 0.0);
    }

    #[test]
    fn test_offset_square() {
        let m = detect_default(&pts(&[("A", 10.0), ("B", 100.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Square");
        assert!(m[0].orb_error.abs() < 1e-10);
    }

    #[test]
    fn test_wide_opposition() {
        let m = detect_default(&pts(&[("A", 0.0), ("B", 183.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Opposition");
        assert!((m[0].orb_error - 3.0).abs() < 1e-10);
        assert!((m[0].separation - 177.0).abs() < 1e-10);
    }

    #[test]
    fn test_conjunction_across_zero() {
        let m = detect_default(&pts(&[("A", 358.0), ("B", 2.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Conjunction");
        assert!((m[0].orb_error - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_orb_boundary_inclusive() {
        let m = detect_default(&pts(&[("A", 0.0), ("B", 96.0)]));
        assert_eq!(m.len(), 1);
        let none = detect_default(&pts(&[("A", 0.0), ("B", 96.5)]));
        assert!(none.is_empty());
    }

    #[test]
    fn test_pair_order() {
        let m = detect_default(&pts(&[("A", 0.0), ("B", 0.0), ("C", 0.0)]));
        let pairs: Vec<(&str, &str)> = m
            .iter()
            .map(|x| (x.point_a.as_str(), x.point_b.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "C"), ("B", "C")]);
    }

    #[test]
    fn test_multiple_matches_for_one_pair() {
        let catalog = vec![
            AspectDefinition::new("Semisquare", 45.0),
            AspectDefinition::new("Wide", 50.0),
        ];
        let m = detect_aspects(&pts(&[("A", 0.0), ("B", 47.0)]), &[], &catalog, 6.0).unwrap();
        let names: Vec<&str> = m.iter().map(|x| x.aspect.as_str()).collect();
        assert_eq!(names, vec!["Semisquare", "Wide"]);
    }

    #[test]
    fn test_excluded_points_not_paired() {
        let excluded = vec!["B".to_string()];
        let m = detect_aspects(
            &pts(&[("A", 0.0), ("B", 90.0), ("C", 180.0)]),
            &excluded,
            &major_aspects(),
            6.0,
        )
        .unwrap();
        assert_eq!(m.len(), 1);
        assert!(m.iter().all(|x| x.point_a != "B" && x.point_b != "B"));
    }

    #[test]
    fn test_non_finite_point_skipped() {
        let m = detect_default(&pts(&[("A", 0.0), ("Bad", f64::NAN), ("C", 120.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Trine");
        assert_eq!(m[0].point_b, "C");
    }

    #[test]
    fn test_unnormalized_input() {
        let m = detect_default(&pts(&[("A", -30.0), ("B", 390.0)]));
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].aspect, "Sextile");
    }

    #[test]
    fn test_invalid_config() {
        let bad_orb = AspectConfig {
            orb: -1.0,
            ..AspectConfig::default()
        };
        assert!(bad_orb.to_detector().is_err());

        let dup = AspectConfig {
            aspects: vec![
                AspectDefinition::new("Square", 90.0),
                AspectDefinition::new("Square", 91.0),
            ],
            ..AspectConfig::default()
        };
        assert!(dup.to_detector().is_err());

        let wide = AspectConfig {
            aspects: vec![AspectDefinition::new("Reflex", 270.0)],
            ..AspectConfig::default()
        };
        assert!(wide.to_detector().is_err());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: AspectConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AspectConfig::default());
        assert_eq!(config.name(), "AspectConfig(aspects=5, orb=6°)");
    }
}
