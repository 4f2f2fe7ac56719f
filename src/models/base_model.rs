use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

/// A common trait for fitted deviation models.
pub trait BaseModel: Sync {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Score one instance. Larger is further from the fitted reference.
    fn score_partial(&self, x: ArrayView1<f64>) -> f64;

    /// Default: score a batch in parallel, preserving row order.
    fn score(&self, xs: ArrayView2<f64>) -> Vec<f64> {
        xs.axis_iter(Axis(0))
            .into_par_iter()
            .map(|x| self.score_partial(x))
            .collect()
    }
}
