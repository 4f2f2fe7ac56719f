use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::models::base_model::BaseModel;
use crate::models::reference::ReferenceModel;
use crate::utils::evaluation::{inlier_fraction, outlier_indices};
use crate::utils::validation::{check_samples, samples_from_rows};
#[cfg(feature = "python")]
use crate::utils::validation::check_rank;

#[cfg(feature = "python")]
use crate::config::{DEFAULT_DEVIATION_SCALE, DEFAULT_MIN_TOLERANCE};
#[cfg(feature = "python")]
use numpy::{IntoPyArray, PyArray1, PyArray2};
#[cfg(feature = "python")]
use pyo3::exceptions::PyTypeError;
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Classification of one sample against a fitted band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Inlier,
    Outlier,
}

impl Label {
    /// Inside the band iff the normalised distance is at most 1.
    pub fn from_score(score: f64) -> Self {
        if score <= 1.0 {
            Label::Inlier
        } else {
            Label::Outlier
        }
    }

    /// `+1` for inliers, `-1` for outliers.
    pub fn value(self) -> i8 {
        match self {
            Label::Inlier => 1,
            Label::Outlier => -1,
        }
    }

    pub fn is_inlier(self) -> bool {
        self == Label::Inlier
    }
}

/// Result of fitting one identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Owned copy of the fitted samples.
    pub samples: Array2<f64>,
    /// Fraction of fitted rows that fall inside the fitted band.
    pub confidence: f64,
}

/// Result of classifying a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// One label per input row, in input order.
    pub labels: Vec<Label>,
    /// Normalised distance of each row from the reference.
    pub scores: Vec<f64>,
    /// Fraction of rows labelled inlier.
    pub confidence: f64,
}

impl Prediction {
    pub fn label_values(&self) -> Vec<i8> {
        self.labels.iter().map(|l| l.value()).collect()
    }

    pub fn outliers(&self) -> Vec<usize> {
        outlier_indices(&self.labels)
    }
}

/// Deviation-based outlier classifier holding one reference model per identifier.
///
/// `fit` replaces the model for an identifier; `predict` only reads it.
/// Models for different identifiers never interact.
#[derive(Debug, Clone)]
pub struct DeviationClassifier<K> {
    config: ClassifierConfig,
    models: HashMap<K, ReferenceModel>,
}

impl<K: Eq + Hash + Debug> Default for DeviationClassifier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Debug> DeviationClassifier<K> {
    pub fn new() -> Self {
        DeviationClassifier {
            config: ClassifierConfig::default(),
            models: HashMap::new(),
        }
    }

    pub fn with_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(DeviationClassifier {
            config,
            models: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fit the reference model for `id`, replacing any previous one.
    ///
    /// # Arguments
    /// * `id` - Identifier scoping the model.
    /// * `samples` - At least one row and one column, all finite.
    /// * `sensitivity` - Strictly inside (0, 1); smaller is tighter.
    pub fn fit(&mut self, id: K, samples: ArrayView2<f64>, sensitivity: f64) -> Result<FitReport> {
        let model = ReferenceModel::fit(samples, sensitivity, &self.config)?;

        let labels: Vec<Label> = model
            .score(samples)
            .into_iter()
            .map(Label::from_score)
            .collect();
        let confidence = inlier_fraction(&labels);

        debug!(
            id = ?id,
            rows = samples.nrows(),
            features = samples.ncols(),
            sensitivity,
            confidence,
            replaced = self.models.contains_key(&id),
            "fitted reference model"
        );
        self.models.insert(id, model);

        Ok(FitReport {
            samples: samples.to_owned(),
            confidence,
        })
    }

    /// Fit from row vectors; ragged rows are rejected.
    pub fn fit_rows(&mut self, id: K, rows: &[Vec<f64>], sensitivity: f64) -> Result<FitReport> {
        let samples = samples_from_rows(rows)?;
        self.fit(id, samples.view(), sensitivity)
    }

    /// Classify each row of `samples` against the model for `id`.
    pub fn predict(&self, id: &K, samples: ArrayView2<f64>) -> Result<Prediction> {
        let model = self.models.get(id).ok_or_else(|| ClassifierError::UnknownModel {
            id: format!("{id:?}"),
        })?;

        check_samples(samples)?;
        if samples.ncols() != model.n_features() {
            return Err(ClassifierError::InvalidInput(format!(
                "expected {} features, got {}",
                model.n_features(),
                samples.ncols()
            )));
        }

        let scores = model.score(samples);
        let labels: Vec<Label> = scores.iter().copied().map(Label::from_score).collect();
        let confidence = inlier_fraction(&labels);

        debug!(
            id = ?id,
            rows = samples.nrows(),
            outliers = labels.iter().filter(|l| !l.is_inlier()).count(),
            confidence,
            "classified batch"
        );

        Ok(Prediction {
            labels,
            scores,
            confidence,
        })
    }

    pub fn predict_rows(&self, id: &K, rows: &[Vec<f64>]) -> Result<Prediction> {
        let samples = samples_from_rows(rows)?;
        self.predict(id, samples.view())
    }

    pub fn model(&self, id: &K) -> Option<&ReferenceModel> {
        self.models.get(id)
    }

    pub fn is_fitted(&self, id: &K) -> bool {
        self.models.contains_key(id)
    }

    /// Number of fitted identifiers.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Identifier accepted from Python: an `int` or a `str`.
#[cfg(feature = "python")]
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromPyObject)]
pub enum PyModelKey {
    Int(i64),
    Str(String),
}

#[cfg(feature = "python")]
fn cast_matrix<T: numpy::Element>(x: &PyAny) -> Option<PyResult<Array2<f64>>> {
    x.extract::<&PyArray2<T>>()
        .ok()
        .map(|arr| Ok(arr.cast::<f64>(false)?.to_owned_array()))
}

// Helper function to get an f64 matrix from PyAny (handles casting)
//
// Shape problems raise ValueError through ClassifierError; only an
// unsupported element type raises TypeError.
#[cfg(feature = "python")]
fn get_matrix_f64(x: &PyAny) -> PyResult<Array2<f64>> {
    if x.hasattr("ndim")? {
        let ndim: usize = x.getattr("ndim")?.extract()?;
        let size: usize = x.getattr("size")?.extract()?;
        if let Some(empty) = check_rank(ndim, size)? {
            return Ok(empty);
        }
        return cast_matrix::<f64>(x)
            .or_else(|| cast_matrix::<i64>(x))
            .or_else(|| cast_matrix::<i32>(x))
            .or_else(|| cast_matrix::<f32>(x))
            .unwrap_or_else(|| {
                Err(PyTypeError::new_err(
                    "Unsupported array dtype for samples: expected f64 or compatible (e.g., i64, i32, f32)",
                ))
            });
    }

    // Plain Python sequences
    if let Ok(rows) = x.extract::<Vec<Vec<f64>>>() {
        return Ok(samples_from_rows(&rows)?);
    }
    // `[]` is taken by the branch above, so a flat list here is non-empty
    if let Ok(row) = x.extract::<Vec<f64>>() {
        check_rank(1, row.len())?;
    }
    Err(PyTypeError::new_err(
        "Unsupported samples: expected a 2-D numpy array or a list of numeric rows",
    ))
}

/// Python-exposed wrapper around DeviationClassifier
#[cfg(feature = "python")]
#[pyclass(name = "ZeroDeviationClassifier")]
pub struct ZeroDeviationClassifier {
    inner: DeviationClassifier<PyModelKey>,
}

#[cfg(feature = "python")]
#[pymethods]
impl ZeroDeviationClassifier {
    #[new]
    #[pyo3(signature = (deviation_scale=DEFAULT_DEVIATION_SCALE, min_tolerance=DEFAULT_MIN_TOLERANCE, reference="mean"))]
    fn new(deviation_scale: f64, min_tolerance: f64, reference: &str) -> PyResult<Self> {
        let config = ClassifierConfig {
            deviation_scale,
            min_tolerance,
            reference: reference.parse()?,
        };
        Ok(ZeroDeviationClassifier {
            inner: DeviationClassifier::with_config(config)?,
        })
    }

    fn fit_transform<'py>(
        &mut self,
        py: Python<'py>,
        id: PyModelKey,
        samples: &PyAny,
        sensitivity: f64,
    ) -> PyResult<(&'py PyArray2<f64>, f64)> {
        let xs = get_matrix_f64(samples)?;
        let report = self.inner.fit(id, xs.view(), sensitivity)?;
        Ok((report.samples.into_pyarray(py), report.confidence))
    }

    fn predict<'py>(
        &self,
        py: Python<'py>,
        id: PyModelKey,
        samples: &PyAny,
    ) -> PyResult<(&'py PyArray1<i64>, f64)> {
        let xs = get_matrix_f64(samples)?;
        let prediction = self.inner.predict(&id, xs.view())?;
        let labels: Vec<i64> = prediction
            .labels
            .iter()
            .map(|l| i64::from(l.value()))
            .collect();
        Ok((labels.into_pyarray(py), prediction.confidence))
    }

    fn is_fitted(&self, id: PyModelKey) -> bool {
        self.inner.is_fitted(&id)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}
