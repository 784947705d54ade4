/// Python wrapper for the chart calculator
use pyo3::prelude::*;

use crate::chart::{ChartCalculator, ChartConfig};
use crate::error::ChartError;
use crate::points::PointLongitude;
use crate::tables::STANDARD_TABLES;

fn to_points(points: Vec<(String, f64)>) -> Vec<PointLongitude> {
    points.into_iter().map(PointLongitude::from).collect()
}

/// Python-facing chart calculator
///
/// Construct from an optional JSON configuration, e.g.
/// `ChartCalculator('{"orb": 8, "aspect_exclusions": ["Ascendant", "Moon"]}')`.
#[pyclass(name = "ChartCalculator")]
pub struct PyChartCalculator {
    inner: ChartCalculator,
}

#[pymethods]
impl PyChartCalculator {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => ChartConfig::from_json(json)?,
            None => ChartConfig::default(),
        };
        Ok(PyChartCalculator {
            inner: ChartCalculator::new(config, STANDARD_TABLES.clone())?,
        })
    }

    /// Build from defaults overridden by `RUST_CHART_*` environment variables
    #[staticmethod]
    fn from_env() -> PyResult<Self> {
        let config = ChartConfig::from_env()?;
        Ok(PyChartCalculator {
            inner: ChartCalculator::new(config, STANDARD_TABLES.clone())?,
        })
    }

    /// Derive a natal chart and return it as a JSON string
    ///
    /// `points` is a list of (name, longitude) tuples in output order.
    fn natal_chart(
        &self,
        points: Vec<(String, f64)>,
        cusps: Vec<f64>,
        ascendant: f64,
    ) -> PyResult<String> {
        let output = self
            .inner
            .natal_chart(&to_points(points), &cusps, ascendant);
        Ok(output.to_json()?)
    }

    /// Detect aspects only and return them as a JSON list
    fn detect_aspects(&self, points: Vec<(String, f64)>) -> PyResult<String> {
        let matches = self.inner.detector().detect(&to_points(points));
        Ok(serde_json::to_string(&matches).map_err(ChartError::from)?)
    }

    /// The active configuration as JSON
    #[getter]
    fn config(&self) -> PyResult<String> {
        Ok(self.inner.config().to_json()?)
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "ChartCalculator(orb={}, aspects={}, aspect_exclusions={:?})",
            config.aspect.orb,
            config.aspect.aspects.len(),
            config.aspect.exclude
        )
    }
}
