// Module declarations
pub mod aspects;
pub mod chart;
#[cfg(feature = "python")]
mod chart_wrapper;
pub mod classify;
pub mod distribution;
pub mod error;
pub mod points; // Public for point-name lookups
pub mod tables;
pub mod utils;

// Re-export public API
pub use aspects::{detect_aspects, AspectConfig, AspectDefinition, AspectDetector, AspectMatch};
pub use chart::{ChartCalculator, ChartConfig, ChartOutput, PointError, PositionRecord};
pub use classify::{classify, locate, locate_checked, HouseCuspSet, SignPlacement};
pub use distribution::{aggregate, Distribution};
pub use error::ChartError;
pub use points::PointLongitude;
pub use tables::{ChartTables, Element, Modality, Sign};
pub use utils::angle::normalize;
pub use utils::logging::init_logging;

#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
    use pyo3::prelude::*;
    use pyo3::wrap_pyfunction;

    use crate::chart_wrapper::PyChartCalculator;
    use crate::classify::{classify, locate, HouseCuspSet};
    use crate::tables::STANDARD_TABLES;
    use crate::utils::angle::{normalize, normalize_batch};

    #[pyfunction]
    fn normalize_longitude(angle: f64) -> PyResult<f64> {
        Ok(normalize(angle)?)
    }

    #[pyfunction]
    fn normalize_longitudes<'py>(
        py: Python<'py>,
        angles: PyReadonlyArray1<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let normalized = normalize_batch(&angles.as_array().to_owned())?;
        Ok(normalized.into_pyarray(py))
    }

    /// Returns (sign name, degree in sign) for a longitude in any range
    #[pyfunction]
    fn classify_sign(longitude: f64) -> PyResult<(String, f64)> {
        let placement = classify(normalize(longitude)?)?;
        Ok((placement.sign.name().to_string(), placement.degree_in_sign))
    }

    #[pyfunction]
    fn locate_house(longitude: f64, cusps: Vec<f64>) -> PyResult<u8> {
        let cusp_set = HouseCuspSet::new(&cusps)?;
        Ok(locate(normalize(longitude)?, &cusp_set))
    }

    #[pyfunction]
    #[pyo3(signature = (level=None))]
    fn init_logging(level: Option<String>) -> bool {
        crate::utils::logging::init_logging(level.as_deref())
    }

    #[pymodule]
    fn _rust_chart(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Table defects must surface at import, before any chart is derived
        once_cell::sync::Lazy::force(&STANDARD_TABLES);
        m.add_class::<PyChartCalculator>()?;
        m.add_function(wrap_pyfunction!(normalize_longitude, m)?)?;
        m.add_function(wrap_pyfunction!(normalize_longitudes, m)?)?;
        m.add_function(wrap_pyfunction!(classify_sign, m)?)?;
        m.add_function(wrap_pyfunction!(locate_house, m)?)?;
        m.add_function(wrap_pyfunction!(init_logging, m)?)?;
        Ok(())
    }
}
