//! Zero-deviation outlier classifier.
//!
//! Fits a tolerance band around reference samples per identifier and labels
//! new samples as inliers (`+1`) or outliers (`-1`) with a confidence score.

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::{ClassifierConfig, ReferenceStatistic};
pub use error::{ClassifierError, Result};
pub use models::base_model::BaseModel;
pub use models::reference::ReferenceModel;
pub use models::zdc::{DeviationClassifier, FitReport, Label, Prediction};

#[cfg(feature = "python")]
use models::zdc::ZeroDeviationClassifier;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn zero_deviation(_py: Python, m: &PyModule) -> PyResult<()> {
    // ZeroDeviationClassifier:
    m.add_class::<ZeroDeviationClassifier>()?;
    Ok(())
}
