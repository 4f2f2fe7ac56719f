//! Classifier error types.

use thiserror::Error;

/// Errors raised by the deviation classifier.
///
/// All variants are raised at the offending call; a failed call never
/// modifies stored models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown model: no fitted model for identifier {id}")]
    UnknownModel { id: String },
}

impl ClassifierError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        ClassifierError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for classifier operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;

#[cfg(feature = "python")]
impl From<ClassifierError> for pyo3::PyErr {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::UnknownModel { .. } => {
                pyo3::exceptions::PyKeyError::new_err(err.to_string())
            }
            _ => pyo3::exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}
