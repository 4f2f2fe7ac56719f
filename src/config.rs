use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

pub const DEFAULT_DEVIATION_SCALE: f64 = 10.0;
pub const DEFAULT_MIN_TOLERANCE: f64 = 1.0;

/// Central tendency used as the reference vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceStatistic {
    /// Column mean, dispersion is the population standard deviation.
    #[default]
    Mean,
    /// Column median, dispersion is the scaled median absolute deviation.
    Median,
}

impl std::str::FromStr for ReferenceStatistic {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(ReferenceStatistic::Mean),
            "median" => Ok(ReferenceStatistic::Median),
            other => Err(ClassifierError::invalid_parameter(
                "reference",
                format!("expected 'mean' or 'median', got '{other}'"),
            )),
        }
    }
}

/// Shape of the tolerance band.
///
/// For feature `j` the band half-width is
/// `sensitivity * (deviation_scale * dispersion_j + max(|reference_j|, min_tolerance))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Dispersion units admitted per unit of sensitivity.
    pub deviation_scale: f64,
    /// Floor on the magnitude term, keeps the band open around a zero reference.
    pub min_tolerance: f64,
    pub reference: ReferenceStatistic,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            deviation_scale: DEFAULT_DEVIATION_SCALE,
            min_tolerance: DEFAULT_MIN_TOLERANCE,
            reference: ReferenceStatistic::Mean,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.deviation_scale.is_finite() || self.deviation_scale < 0.0 {
            return Err(ClassifierError::invalid_parameter(
                "deviation_scale",
                format!("must be finite and non-negative, got {}", self.deviation_scale),
            ));
        }
        if !self.min_tolerance.is_finite() || self.min_tolerance <= 0.0 {
            return Err(ClassifierError::invalid_parameter(
                "min_tolerance",
                format!("must be finite and positive, got {}", self.min_tolerance),
            ));
        }
        Ok(())
    }
}
