use crate::errors::{Result, SurrogateError};
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// Check training data consistency: at least one sample, at least one input
/// component, as many outputs as inputs and only finite values.
pub(crate) fn check_training_data(
    x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    y: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(SurrogateError::InvalidValueError(format!(
            "Training inputs should not be empty, got shape {:?}",
            x.shape()
        )));
    }
    if x.nrows() != y.len() {
        return Err(SurrogateError::InvalidValueError(format!(
            "Training inputs and outputs mismatch: {} inputs vs {} outputs",
            x.nrows(),
            y.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(SurrogateError::InvalidValueError(
            "Training data should only contain finite values".to_string(),
        ));
    }
    Ok(())
}

/// Check prediction points have the dimension the model was trained with
pub(crate) fn check_input_dim(
    expected: usize,
    x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
) -> Result<()> {
    if x.ncols() != expected {
        return Err(SurrogateError::DimensionError {
            expected,
            actual: x.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    #[test]
    fn test_check_training_data() {
        assert!(check_training_data(&array![[0.], [1.]], &array![0., 1.]).is_ok());
        assert!(check_training_data(&array![[0.], [1.]], &array![0.]).is_err());
        assert!(check_training_data(&Array2::<f64>::zeros((0, 2)), &Array1::zeros(0)).is_err());
        assert!(check_training_data(&array![[0.], [f64::NAN]], &array![0., 1.]).is_err());
    }

    #[test]
    fn test_check_input_dim() {
        assert!(check_input_dim(2, &array![[0., 1.]]).is_ok());
        match check_input_dim(2, &array![[0., 1., 2.]]) {
            Err(SurrogateError::DimensionError { expected, actual }) => {
                assert_eq!((expected, actual), (2, 3))
            }
            _ => panic!("dimension error expected"),
        }
    }
}
