use crate::models::zdc::Label;

/// Fraction of labels that are inliers; 0.0 for an empty slice.
pub fn inlier_fraction(labels: &[Label]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let inliers = labels.iter().filter(|l| l.is_inlier()).count();
    inliers as f64 / labels.len() as f64
}

/// Row indices labelled as outliers, in input order.
pub fn outlier_indices(labels: &[Label]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.is_inlier())
        .map(|(i, _)| i)
        .collect()
}
