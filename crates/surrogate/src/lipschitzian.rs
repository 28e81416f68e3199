//! Lipschitzian regression.
//!
//! Given training data `(x_i, y_i)` and a Lipschitz constant `L`, the unknown
//! function is enclosed at any point `x` between
//!
//! * `lower(x) = max_i (y_i - L * ||x - x_i||)`
//! * `upper(x) = min_i (y_i + L * ||x - x_i||)`
//!
//! The prediction is the middle of the enclosure and the uncertainty its half-width.
//! When `L` is not given it is estimated as the steepest slope found between two
//! training samples.
use crate::errors::{Result, SurrogateError};
use crate::parameters::{LipschitzianParams, LipschitzianValidParams};
use crate::surrogates::Surrogate;
use crate::utils::{check_input_dim, check_training_data};

use linfa::prelude::{DatasetBase, Fit};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2, Zip};
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Lipschitzian regressor
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct LipschitzianRegressor {
    /// Lipschitz constant used for the enclosure
    lipschitz_constant: f64,
    /// Training inputs
    xt: Array2<f64>,
    /// Training outputs
    yt: Array1<f64>,
}

fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    Zip::from(a)
        .and(b)
        .fold(0., |acc, &ai, &bi| acc + (ai - bi) * (ai - bi))
        .sqrt()
}

/// Steepest slope `|y_i - y_j| / ||x_i - x_j||` over pairs of distinct training inputs,
/// 0 when there is no such pair.
pub fn estimate_lipschitz_constant(
    xt: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    yt: &ArrayBase<impl Data<Elem = f64>, Ix1>,
) -> f64 {
    let mut lipschitz_constant = 0.;
    for i in 0..xt.nrows() {
        for j in (i + 1)..xt.nrows() {
            let dist = euclidean_distance(&xt.row(i), &xt.row(j));
            if dist > 0. {
                lipschitz_constant = f64::max(lipschitz_constant, (yt[i] - yt[j]).abs() / dist);
            }
        }
    }
    lipschitz_constant
}

impl LipschitzianRegressor {
    /// Lipschitzian regressor parameters, the constant is estimated by default
    pub fn params() -> LipschitzianParams {
        LipschitzianParams::default()
    }

    /// Lipschitz constant used by the regressor
    pub fn lipschitz_constant(&self) -> f64 {
        self.lipschitz_constant
    }

    /// Lower and upper enclosure of the function at n given `x` points
    /// specified as a (n, nx) matrix.
    pub fn predict_bounds(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        check_input_dim(self.xt.ncols(), x)?;
        let mut lower = Array1::<f64>::zeros(x.nrows());
        let mut upper = Array1::<f64>::zeros(x.nrows());
        Zip::from(x.rows())
            .and(&mut lower)
            .and(&mut upper)
            .for_each(|xi, lo, up| {
                let (l, u) = Zip::from(self.xt.rows()).and(&self.yt).fold(
                    (f64::NEG_INFINITY, f64::INFINITY),
                    |(l, u), xt, &yt| {
                        let slack = self.lipschitz_constant * euclidean_distance(&xi, &xt);
                        (l.max(yt - slack), u.min(yt + slack))
                    },
                );
                *lo = l;
                *up = u;
            });
        Ok((lower, upper))
    }
}

impl<D: Data<Elem = f64>> Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, SurrogateError>
    for LipschitzianValidParams
{
    type Object = LipschitzianRegressor;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>,
    ) -> Result<LipschitzianRegressor> {
        let xt = dataset.records();
        let yt = dataset.targets();
        check_training_data(xt, yt)?;

        let lipschitz_constant = match self.lipschitz_constant {
            Some(l) => l,
            None => {
                let l = estimate_lipschitz_constant(xt, yt);
                debug!("Estimated Lipschitz constant = {l}");
                l
            }
        };
        Ok(LipschitzianRegressor {
            lipschitz_constant,
            xt: xt.to_owned(),
            yt: yt.to_owned(),
        })
    }
}

impl Surrogate for LipschitzianRegressor {
    fn dims(&self) -> (usize, usize) {
        (self.xt.ncols(), 1)
    }

    /// Predicted value is the middle of the enclosure, uncertainty its half-width.
    /// The half-width is negative when the given Lipschitz constant is smaller than
    /// the one of the training data.
    fn predict_with_uncertainty(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        let (lower, upper) = self.predict_bounds(x)?;
        let values = (&upper + &lower) / 2.;
        let deltas = (&upper - &lower) / 2.;
        Ok((values, deltas))
    }
}

impl fmt::Display for LipschitzianRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lipschitzian(L={}, n_samples={})",
            self.lipschitz_constant,
            self.xt.nrows()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linfa::prelude::Dataset;
    use ndarray::array;

    #[test]
    fn test_estimate_lipschitz_constant() {
        let xt = array![[0.], [1.], [3.]];
        let yt = array![0., 2., 3.];
        assert_abs_diff_eq!(estimate_lipschitz_constant(&xt, &yt), 2.);
    }

    #[test]
    fn test_estimate_lipschitz_constant_duplicates() {
        let xt = array![[1., 1.], [1., 1.]];
        let yt = array![0., 5.];
        assert_abs_diff_eq!(estimate_lipschitz_constant(&xt, &yt), 0.);
    }

    #[test]
    fn test_lipschitzian_abs() {
        let xt = array![[-1.], [0.], [1.]];
        let yt = array![1., 0., 1.];
        let model = LipschitzianRegressor::params()
            .fit(&Dataset::new(xt, yt))
            .expect("Lipschitzian fit");
        assert_abs_diff_eq!(model.lipschitz_constant(), 1.);

        let (values, deltas) = model
            .predict_with_uncertainty(&array![[0.5], [-1.]].view())
            .unwrap();
        assert_abs_diff_eq!(values, array![0.5, 1.]);
        assert_abs_diff_eq!(deltas, array![0., 0.]);
    }

    #[test]
    fn test_lipschitzian_enclosure() {
        let xt = array![[0., 0.], [1., 0.]];
        let yt = array![0., 1.];
        let model = LipschitzianRegressor::params()
            .lipschitz_constant(2.)
            .fit(&Dataset::new(xt, yt))
            .expect("Lipschitzian fit");
        let x = array![[0., 1.]];
        let (lower, upper) = model.predict_bounds(&x.view()).unwrap();
        // lower = max(0 - 2, 1 - 2*sqrt(2)), upper = min(0 + 2, 1 + 2*sqrt(2))
        let expected_lower = 1. - 2. * 2f64.sqrt();
        assert_abs_diff_eq!(lower[0], expected_lower, epsilon = 1e-12);
        assert_abs_diff_eq!(upper[0], 2., epsilon = 1e-12);
        assert_abs_diff_eq!(
            model.predict(&x.view()).unwrap()[0],
            (2. + expected_lower) / 2.,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            model.predict_uncertainty(&x.view()).unwrap()[0],
            (2. - expected_lower) / 2.,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lipschitzian_small_constant_gives_negative_uncertainty() {
        let xt = array![[0.], [1.]];
        let yt = array![0., 2.];
        let model = LipschitzianRegressor::params()
            .lipschitz_constant(1.)
            .fit(&Dataset::new(xt, yt))
            .expect("Lipschitzian fit");
        let (values, deltas) = model
            .predict_with_uncertainty(&array![[0.5]].view())
            .unwrap();
        assert_abs_diff_eq!(values[0], 1.);
        assert_abs_diff_eq!(deltas[0], -0.5);
    }

    #[test]
    fn test_lipschitzian_dimension_error() {
        let model = LipschitzianRegressor::params()
            .fit(&Dataset::new(array![[0.], [1.]], array![0., 1.]))
            .expect("Lipschitzian fit");
        assert_eq!(model.dims(), (1, 1));
        assert!(matches!(
            model.predict(&array![[0., 1.]].view()),
            Err(SurrogateError::DimensionError {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_lipschitzian_invalid_params() {
        let res = LipschitzianRegressor::params()
            .lipschitz_constant(-1.)
            .fit(&Dataset::new(array![[0.], [1.]], array![0., 1.]));
        assert!(matches!(res, Err(SurrogateError::InvalidConfigError(_))));
    }
}
