#[cfg(feature = "python")]
use pyo3::exceptions::{PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Empty table: {0}")]
    EmptyTable(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Unknown selection: {0}")]
    UnknownSelection(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Config: {0}")]
    Config(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(feature = "python")]
impl From<AtlasError> for PyErr {
    fn from(err: AtlasError) -> PyErr {
        match err {
            AtlasError::UnknownSelection(_) | AtlasError::UnknownRegion(_) => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}
