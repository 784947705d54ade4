//! Error types for chart derivation

use thiserror::Error;

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors raised while deriving chart relationships
#[derive(Error, Debug)]
pub enum ChartError {
    /// A longitude or other angle was NaN or infinite
    #[error("Invalid input: {what} must be finite (got {value})")]
    InvalidInput {
        /// Which quantity was rejected
        what: String,
        /// The offending value
        value: f64,
    },

    /// A point name was supplied more than once, or clashes with the Ascendant
    #[error("Duplicate point: {0}")]
    DuplicatePoint(String),

    /// House cusps are not a usable set of 12 boundaries
    #[error("Invalid cusp set: {0}")]
    InvalidCuspSet(String),

    /// Sign to element/modality tables do not partition the zodiac
    #[error("Invalid partition table: {0}")]
    InvalidPartitionTable(String),

    /// Chart configuration is malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or result (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    pub(crate) fn non_finite(what: impl Into<String>, value: f64) -> Self {
        ChartError::InvalidInput {
            what: what.into(),
            value,
        }
    }
}

#[cfg(feature = "python")]
impl From<ChartError> for pyo3::PyErr {
    fn from(err: ChartError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
