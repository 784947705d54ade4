/// Natal chart derivation
///
/// Combines the classifiers, the aspect detector and the distribution
/// tallies into one pure computation over ephemeris output:
///
/// ```text
/// longitudes + cusps -> normalize -> sign / house -> positions
///                                 -> aspects (longitudes)
///                                 -> distribution (signs)
/// ```
///
/// Malformed input for a single point never aborts the chart; the point is
/// reported in `ChartOutput::errors` and left out of aspects and
/// distribution. Problems with the cusp set are reported in
/// `ChartOutput::warnings`.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::aspects::{default_exclusions, AspectConfig, AspectDetector, AspectMatch};
use crate::classify::house::{locate_checked, HouseCuspSet, FALLBACK_HOUSE};
use crate::classify::sign::classify;
use crate::distribution::{aggregate, Distribution};
use crate::error::{ChartError, Result};
use crate::points::{is_ascendant, is_standard_point, PointLongitude};
use crate::tables::{ChartTables, Sign, STANDARD_TABLES};
use crate::utils::angle::normalize;
use crate::utils::config::{ASCENDANT, ENV_ASPECT_EXCLUDE, ENV_DISTRIBUTION_EXCLUDE, ENV_ORB};

/// Configuration for chart derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Orb, aspect catalog and `aspect_exclusions`
    #[serde(flatten)]
    pub aspect: AspectConfig,
    /// Points excluded from the element/modality tallies
    #[serde(default = "default_exclusions")]
    pub distribution_exclusions: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            aspect: AspectConfig::default(),
            distribution_exclusions: default_exclusions(),
        }
    }
}

impl ChartConfig {
    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Defaults overridden by environment variables
    ///
    /// Loads a `.env` file from the working directory if one exists, then
    /// applies `RUST_CHART_ORB`, `RUST_CHART_ASPECT_EXCLUDE` and
    /// `RUST_CHART_DISTRIBUTION_EXCLUDE` (comma separated names; an empty
    /// value clears the list).
    ///
    /// # Errors
    /// Returns `ChartError::InvalidConfig` if `RUST_CHART_ORB` is not a number
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ORB) {
            self.aspect.orb = raw.trim().parse().map_err(|_| {
                ChartError::InvalidConfig(format!("{ENV_ORB} must be a number (got '{raw}')"))
            })?;
        }
        if let Some(raw) = lookup(ENV_ASPECT_EXCLUDE) {
            self.aspect.exclude = split_names(&raw);
        }
        if let Some(raw) = lookup(ENV_DISTRIBUTION_EXCLUDE) {
            self.distribution_exclusions = split_names(&raw);
        }
        Ok(self)
    }
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sign and house placement of one point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    pub name: String,
    /// Normalized longitude in degrees
    pub longitude: f64,
    pub sign: Sign,
    pub degree_in_sign: f64,
    /// House 1..=12; absent for the Ascendant or without a usable cusp set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
}

/// A point that could not be classified
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointError {
    pub name: String,
    pub message: String,
}

/// Everything derived for one chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutput {
    /// Classified points in input order, Ascendant last
    pub positions: Vec<PositionRecord>,
    pub aspects: Vec<AspectMatch>,
    #[serde(flatten)]
    pub distribution: Distribution,
    /// Longitudes as supplied by the ephemeris
    pub raw_longitudes: Vec<PointLongitude>,
    /// Normalized Ascendant, absent if it was not finite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascendant: Option<f64>,
    /// House cusps as supplied
    pub houses: Vec<f64>,
    pub warnings: Vec<String>,
    pub errors: Vec<PointError>,
}

impl ChartOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn position(&self, name: &str) -> Option<&PositionRecord> {
        self.positions.iter().find(|p| p.name == name)
    }
}

/// Derives charts with a fixed configuration and fixed tables
#[derive(Debug, Clone)]
pub struct ChartCalculator {
    tables: ChartTables,
    detector: AspectDetector,
    distribution_exclusions: HashSet<String>,
    config: ChartConfig,
}

impl ChartCalculator {
    /// Validate `config` and build a calculator over `tables`
    pub fn new(config: ChartConfig, tables: ChartTables) -> Result<Self> {
        let detector = config.aspect.to_detector()?;
        let distribution_exclusions = config.distribution_exclusions.iter().cloned().collect();
        Ok(ChartCalculator {
            tables,
            detector,
            distribution_exclusions,
            config,
        })
    }

    /// Calculator with the default configuration and standard tables
    pub fn standard() -> Self {
        ChartCalculator {
            tables: STANDARD_TABLES.clone(),
            detector: AspectDetector::standard(),
            distribution_exclusions: default_exclusions().into_iter().collect(),
            config: ChartConfig::default(),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn detector(&self) -> &AspectDetector {
        &self.detector
    }

    /// Derive positions, aspects and distribution for one chart
    ///
    /// # Arguments
    /// * `points` - Named body longitudes from the ephemeris, in output order
    /// * `cusps` - The 12 house cusp longitudes, house 1 first
    /// * `ascendant` - Ascendant longitude
    pub fn natal_chart(
        &self,
        points: &[PointLongitude],
        cusps: &[f64],
        ascendant: f64,
    ) -> ChartOutput {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let cusp_set = match HouseCuspSet::new(cusps) {
            Ok(set) => {
                if let Err(e) = set.check_span() {
                    warn!("Degraded house cusps: {}", e);
                    warnings.push(e.to_string());
                }
                Some(set)
            }
            Err(e) => {
                warn!("House placement skipped: {}", e);
                warnings.push(e.to_string());
                None
            }
        };

        let mut positions = Vec::with_capacity(points.len() + 1);
        let mut fallbacks = 0usize;
        let ascendant_point = PointLongitude::new(ASCENDANT, ascendant);
        let mut seen: HashSet<&str> = HashSet::with_capacity(points.len() + 1);
        let all_points = points
            .iter()
            .map(|p| (p, false))
            .chain(std::iter::once((&ascendant_point, true)));

        for (point, is_ascendant_arg) in all_points {
            if !is_standard_point(&point.name) && !is_ascendant(&point.name) {
                debug!("Classifying non-standard point {}", point.name);
            }
            let placed = Self::check_name(point, is_ascendant_arg, &mut seen)
                .and_then(|_| self.place(point, cusp_set.as_ref(), &mut fallbacks));
            match placed {
                Ok(record) => positions.push(record),
                Err(e) => {
                    warn!("Rejected {}: {}", point.name, e);
                    errors.push(PointError {
                        name: point.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if fallbacks > 0 {
            let msg = format!(
                "{fallbacks} point(s) matched no house and were assigned house {FALLBACK_HOUSE}"
            );
            warn!("{}", msg);
            warnings.push(msg);
        }

        let placed: Vec<PointLongitude> = positions
            .iter()
            .map(|p| PointLongitude::new(p.name.clone(), p.longitude))
            .collect();
        let aspects = self.detector.detect(&placed);

        let distribution = aggregate(
            positions.iter().map(|p| (p.name.as_str(), p.sign)),
            &self.distribution_exclusions,
            &self.tables,
        );

        debug!(
            "Chart derived: {} positions, {} aspects, {} errors",
            positions.len(),
            aspects.len(),
            errors.len()
        );

        ChartOutput {
            positions,
            aspects,
            distribution,
            raw_longitudes: points.to_vec(),
            ascendant: normalize(ascendant).ok(),
            houses: cusps.to_vec(),
            warnings,
            errors,
        }
    }

    /// Names key the output; the Ascendant only comes from its own argument
    fn check_name<'a>(
        point: &'a PointLongitude,
        is_ascendant_arg: bool,
        seen: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if !is_ascendant_arg && is_ascendant(&point.name) {
            return Err(ChartError::DuplicatePoint(format!(
                "{ASCENDANT} is supplied separately, not as a body"
            )));
        }
        if !seen.insert(point.name.as_str()) {
            return Err(ChartError::DuplicatePoint(format!(
                "{} already supplied earlier in the chart",
                point.name
            )));
        }
        Ok(())
    }

    fn place(
        &self,
        point: &PointLongitude,
        cusps: Option<&HouseCuspSet>,
        fallbacks: &mut usize,
    ) -> Result<PositionRecord> {
        let longitude = normalize(point.longitude).map_err(|_| {
            ChartError::non_finite(format!("{} longitude", point.name), point.longitude)
        })?;
        let placement = classify(longitude)?;

        let house = match cusps {
            Some(set) if !is_ascendant(&point.name) => Some(match locate_checked(longitude, set) {
                Some(h) => h,
                None => {
                    *fallbacks += 1;
                    FALLBACK_HOUSE
                }
            }),
            _ => None,
        };

        Ok(PositionRecord {
            name: point.name.clone(),
            longitude,
            sign: placement.sign,
            degree_in_sign: placement.degree_in_sign,
            house,
        })
    }
}

impl Default for ChartCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        let config = ChartConfig::default()
            .with_overrides(|key| match key {
                ENV_ORB => Some(" 8 ".to_string()),
                ENV_ASPECT_EXCLUDE => Some("Ascendant, Moon".to_string()),
                ENV_DISTRIBUTION_EXCLUDE => Some(String::new()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.aspect.orb, 8.0);
        assert_eq!(config.aspect.exclude, vec!["Ascendant", "Moon"]);
        assert!(config.distribution_exclusions.is_empty());
    }

    #[test]
    fn test_env_bad_orb() {
        let err = ChartConfig::default()
            .with_overrides(|key| (key == ENV_ORB).then(|| "wide".to_string()))
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_json_defaults() {
        let config = ChartConfig::from_json(r#"{"orb": 4.5}"#).unwrap();
        assert_eq!(config.aspect.orb, 4.5);
        assert_eq!(config.aspect.aspects.len(), 5);
        assert_eq!(config.aspect.exclude, vec!["Ascendant"]);
        let back = ChartConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_json_is_flat() {
        let json: serde_json::Value =
            serde_json::from_str(&ChartConfig::default().to_json().unwrap()).unwrap();
        assert_eq!(json["orb"], 6.0);
        assert_eq!(json["aspects"].as_array().unwrap().len(), 5);
        assert_eq!(json["aspect_exclusions"][0], "Ascendant");
        assert_eq!(json["distribution_exclusions"][0], "Ascendant");

        let config =
            ChartConfig::from_json(r#"{"aspect_exclusions": ["Moon"], "orb": 3}"#).unwrap();
        assert_eq!(config.aspect.exclude, vec!["Moon"]);
        assert_eq!(config.aspect.orb, 3.0);
        assert_eq!(config.distribution_exclusions, vec!["Ascendant"]);
    }

    #[test]
    fn test_ascendant_has_no_house() {
        let calc = ChartCalculator::standard();
        let cusps: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();
        let out = calc.natal_chart(&[PointLongitude::new("Sun", 45.0)], &cusps, 95.0);
        assert_eq!(out.position("Sun").unwrap().house, Some(2));
        let asc = out.position(ASCENDANT).unwrap();
        assert_eq!(asc.sign, Sign::Cancer);
        assert_eq!(asc.house, None);
        assert!(out.warnings.is_empty());
    }
}
