use ndarray::{Array1, ArrayView1, ArrayView2, Zip};

use crate::config::ClassifierConfig;
use crate::error::{ClassifierError, Result};
use crate::models::base_model::BaseModel;
use crate::utils::ss::ColumnStatistics;
use crate::utils::validation::{check_samples, check_sensitivity};

/// Fitted reference vector and per-feature tolerance band for one identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    reference: Array1<f64>,
    tolerance: Array1<f64>,
    sensitivity: f64,
    n_samples: usize,
}

impl ReferenceModel {
    /// Fit a band around `xs`.
    ///
    /// Each tolerance is
    /// `sensitivity * (deviation_scale * dispersion + max(|reference|, min_tolerance))`,
    /// so it is strictly positive and never grows as `sensitivity` shrinks.
    pub fn fit(xs: ArrayView2<f64>, sensitivity: f64, config: &ClassifierConfig) -> Result<Self> {
        check_sensitivity(sensitivity)?;
        check_samples(xs)?;

        let stats = ColumnStatistics::compute(xs, config.reference);
        let tolerance = Zip::from(&stats.centre)
            .and(&stats.dispersion)
            .map_collect(|&centre, &dispersion| {
                let magnitude = centre.abs().max(config.min_tolerance);
                sensitivity * (config.deviation_scale * dispersion + magnitude)
            });

        // finite samples can still overflow the sums behind mean and std
        if let Some((j, _)) = stats
            .centre
            .iter()
            .zip(tolerance.iter())
            .enumerate()
            .find(|(_, (c, t))| !c.is_finite() || !t.is_finite())
        {
            return Err(ClassifierError::InvalidInput(format!(
                "samples overflow the band statistics at column {j}"
            )));
        }

        Ok(ReferenceModel {
            reference: stats.centre,
            tolerance,
            sensitivity,
            n_samples: xs.nrows(),
        })
    }

    pub fn reference(&self) -> ArrayView1<f64> {
        self.reference.view()
    }

    pub fn tolerance(&self) -> ArrayView1<f64> {
        self.tolerance.view()
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Rows seen by `fit`.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Whether `x` lies inside the band on every feature.
    pub fn contains(&self, x: ArrayView1<f64>) -> bool {
        self.score_partial(x) <= 1.0
    }
}

impl BaseModel for ReferenceModel {
    fn n_features(&self) -> usize {
        self.reference.len()
    }

    /// Largest per-feature deviation in units of tolerance.
    /// A vector of the wrong length, or an undefined ratio, scores infinity.
    fn score_partial(&self, x: ArrayView1<f64>) -> f64 {
        if x.len() != self.reference.len() {
            return f64::INFINITY;
        }
        Zip::from(x)
            .and(&self.reference)
            .and(&self.tolerance)
            .fold(0.0, |acc: f64, &v, &centre, &tol| {
                let ratio = (v - centre).abs() / tol;
                if ratio.is_nan() {
                    f64::INFINITY
                } else {
                    acc.max(ratio)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceStatistic;
    use crate::error::ClassifierError;
    use ndarray::array;

    #[test]
    fn test_degenerate_band_scales_with_sensitivity() {
        let xs = array![[1.0, 7.0], [1.0, 7.0], [1.0, 7.0]];
        let model = ReferenceModel::fit(xs.view(), 0.2, &ClassifierConfig::default()).unwrap();
        assert_eq!(model.reference(), array![1.0, 7.0]);
        assert!((model.tolerance()[0] - 0.2).abs() < 1e-12);
        assert!((model.tolerance()[1] - 1.4).abs() < 1e-12);
        assert_eq!(model.n_samples(), 3);
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_zero_reference_keeps_open_band() {
        let xs = array![[0.0], [0.0]];
        let model = ReferenceModel::fit(xs.view(), 0.1, &ClassifierConfig::default()).unwrap();
        assert!(model.tolerance()[0] > 0.0);
        assert!(model.contains(array![0.0].view()));
        assert!(model.contains(array![0.05].view()));
        assert!(!model.contains(array![0.5].view()));
    }

    #[test]
    fn test_dispersion_widens_band() {
        let flat = array![[10.0], [10.0], [10.0], [10.0]];
        let spread = array![[8.0], [12.0], [8.0], [12.0]];
        let config = ClassifierConfig::default();
        let a = ReferenceModel::fit(flat.view(), 0.3, &config).unwrap();
        let b = ReferenceModel::fit(spread.view(), 0.3, &config).unwrap();
        assert_eq!(a.reference(), b.reference());
        assert!(b.tolerance()[0] > a.tolerance()[0]);
    }

    #[test]
    fn test_score_is_max_normalised_deviation() {
        let xs = array![[1.0, 7.0]];
        let model = ReferenceModel::fit(xs.view(), 0.5, &ClassifierConfig::default()).unwrap();
        // tolerances: 0.5 and 3.5
        let score = model.score_partial(array![1.25, 7.0].view());
        assert!((score - 0.5).abs() < 1e-12);
        let score = model.score_partial(array![1.0, 14.0].view());
        assert!((score - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_length_scores_infinity() {
        let xs = array![[1.0, 7.0]];
        let model = ReferenceModel::fit(xs.view(), 0.5, &ClassifierConfig::default()).unwrap();
        assert_eq!(model.score_partial(array![1.0].view()), f64::INFINITY);
    }

    #[test]
    fn test_median_reference() {
        let xs = array![[1.0], [2.0], [3.0], [100.0]];
        let config = ClassifierConfig {
            reference: ReferenceStatistic::Median,
            ..ClassifierConfig::default()
        };
        let model = ReferenceModel::fit(xs.view(), 0.2, &config).unwrap();
        assert_eq!(model.reference()[0], 2.5);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let config = ClassifierConfig::default();
        let xs = array![[1.0, 7.0]];
        assert!(matches!(
            ReferenceModel::fit(xs.view(), 1.0, &config),
            Err(ClassifierError::InvalidParameter { .. })
        ));
        let empty = ndarray::Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            ReferenceModel::fit(empty.view(), 0.2, &config),
            Err(ClassifierError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overflowing_statistics_rejected() {
        let config = ClassifierConfig::default();
        // mean overflows
        let xs = array![[1e308], [1e308]];
        assert!(matches!(
            ReferenceModel::fit(xs.view(), 0.01, &config),
            Err(ClassifierError::InvalidInput(_))
        ));
        // mean is zero but the squared deviations overflow
        let xs = array![[1e200], [-1e200]];
        assert!(matches!(
            ReferenceModel::fit(xs.view(), 0.01, &config),
            Err(ClassifierError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_undefined_ratio_scores_infinity() {
        let model = ReferenceModel {
            reference: array![0.0, f64::INFINITY],
            tolerance: array![1.0, f64::INFINITY],
            sensitivity: 0.5,
            n_samples: 1,
        };
        assert_eq!(model.score_partial(array![0.0, 0.0].view()), f64::INFINITY);
        assert!(!model.contains(array![0.0, 0.0].view()));
    }

    #[test]
    fn test_batch_score_preserves_order() {
        let xs = array![[0.0], [0.0]];
        let model = ReferenceModel::fit(xs.view(), 0.5, &ClassifierConfig::default()).unwrap();
        // tolerance 0.5
        let scores = model.score(array![[0.0], [1.0], [0.25], [-2.0]].view());
        assert_eq!(scores, vec![0.0, 2.0, 0.5, 4.0]);
    }
}
