use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use crate::config::ReferenceStatistic;

/// Scales a median absolute deviation to a standard deviation for normal data.
const MAD_TO_STD: f64 = 1.4826;

/// Per-column centre and dispersion of a sample matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    pub centre: Array1<f64>,
    pub dispersion: Array1<f64>,
}

impl ColumnStatistics {
    /// Computes statistics column by column.
    ///
    /// # Arguments
    /// * `xs` - Validated samples, at least one row and one column.
    /// * `statistic` - Mean with population std, or median with scaled MAD.
    pub fn compute(xs: ArrayView2<f64>, statistic: ReferenceStatistic) -> Self {
        match statistic {
            ReferenceStatistic::Mean => {
                let centre = xs
                    .mean_axis(Axis(0))
                    .unwrap_or_else(|| Array1::zeros(xs.ncols()));
                let dispersion = xs.std_axis(Axis(0), 0.0);
                ColumnStatistics { centre, dispersion }
            }
            ReferenceStatistic::Median => {
                let centre: Array1<f64> = xs.axis_iter(Axis(1)).map(median).collect();
                let dispersion = xs
                    .axis_iter(Axis(1))
                    .zip(centre.iter())
                    .map(|(column, &m)| {
                        let deviations = column.mapv(|v| (v - m).abs());
                        MAD_TO_STD * median(deviations.view())
                    })
                    .collect();
                ColumnStatistics { centre, dispersion }
            }
        }
    }
}

fn median(values: ArrayView1<f64>) -> f64 {
    let mut sorted = values.to_vec();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}
