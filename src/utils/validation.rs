//! Input checks applied at the classifier boundary.

use ndarray::{Array2, ArrayView2};

use crate::error::{ClassifierError, Result};

/// Sample matrices must be non-empty in both dimensions and fully finite.
pub fn check_samples(xs: ArrayView2<f64>) -> Result<()> {
    let (rows, cols) = xs.dim();
    if rows == 0 || cols == 0 {
        return Err(ClassifierError::InvalidInput(format!(
            "samples must have at least one row and one column, got shape ({rows}, {cols})"
        )));
    }
    if let Some(((row, col), value)) = xs.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(ClassifierError::InvalidInput(format!(
            "non-finite value {value} at row {row}, column {col}"
        )));
    }
    Ok(())
}

pub fn check_sensitivity(sensitivity: f64) -> Result<()> {
    // NaN fails both comparisons
    if sensitivity > 0.0 && sensitivity < 1.0 {
        Ok(())
    } else {
        Err(ClassifierError::invalid_parameter(
            "sensitivity",
            format!("must be in (0, 1), got {sensitivity}"),
        ))
    }
}

/// Checks the rank of an array-like input before it is read as samples.
///
/// An empty array of any rank reads as an empty matrix, which `check_samples`
/// then rejects; any other non-2-D input is malformed.
pub fn check_rank(ndim: usize, size: usize) -> Result<Option<Array2<f64>>> {
    if size == 0 {
        return Ok(Some(Array2::zeros((0, 0))));
    }
    if ndim != 2 {
        return Err(ClassifierError::InvalidInput(format!(
            "samples must be a 2-D array, got {ndim}-D"
        )));
    }
    Ok(None)
}

/// Builds a sample matrix from row vectors, rejecting ragged rows.
pub fn samples_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let n_features = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
        return Err(ClassifierError::InvalidInput(format!(
            "row {i} has {} features, expected {n_features}",
            row.len()
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_features), flat)
        .map_err(|e| ClassifierError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_empty_samples_rejected() {
        let xs = Array2::<f64>::zeros((0, 2));
        assert!(matches!(check_samples(xs.view()), Err(ClassifierError::InvalidInput(_))));
        let xs = Array2::<f64>::zeros((3, 0));
        assert!(matches!(check_samples(xs.view()), Err(ClassifierError::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let xs = array![[1.0, 2.0], [f64::NAN, 3.0]];
        let err = check_samples(xs.view()).unwrap_err();
        assert!(err.to_string().contains("row 1, column 0"));
        let xs = array![[f64::INFINITY]];
        assert!(check_samples(xs.view()).is_err());
    }

    #[test]
    fn test_sensitivity_bounds() {
        assert!(check_sensitivity(0.2).is_ok());
        for s in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(check_sensitivity(s).is_err(), "sensitivity {s} accepted");
        }
    }

    #[test]
    fn test_rank_checks() {
        assert!(check_rank(2, 6).unwrap().is_none());
        assert_eq!(check_rank(1, 0).unwrap().map(|xs| xs.dim()), Some((0, 0)));
        for ndim in [0, 1, 3] {
            let err = check_rank(ndim, 4).unwrap_err();
            assert_eq!(
                err,
                ClassifierError::InvalidInput(format!("samples must be a 2-D array, got {ndim}-D"))
            );
        }
    }

    #[test]
    fn test_rows_to_matrix() {
        let xs = samples_from_rows(&[vec![1.0, 7.0], vec![2.0, 8.0]]).unwrap();
        assert_eq!(xs, array![[1.0, 7.0], [2.0, 8.0]]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = samples_from_rows(&[vec![1.0, 7.0], vec![2.0]]).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::InvalidInput("row 1 has 1 features, expected 2".to_string())
        );
    }

    #[test]
    fn test_no_rows_gives_empty_matrix() {
        let xs = samples_from_rows(&[]).unwrap();
        assert_eq!(xs.dim(), (0, 0));
        assert!(check_samples(xs.view()).is_err());
    }
}
