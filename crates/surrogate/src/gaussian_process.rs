use crate::errors::{Result, SurrogateError};
use crate::parameters::{
    CorrelationKind, GpSurrogateParams, GpSurrogateValidParams, RegressionKind,
};
use crate::surrogates::Surrogate;
use crate::utils::{check_input_dim, check_training_data};

use egobox_gp::{GaussianProcess, correlation_models::*, mean_models::*};
use linfa::prelude::{Dataset, DatasetBase, Fit};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, ArrayView2, Data, Ix1, Ix2};
use paste::paste;
use std::fmt;
use std::time::Instant;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A macro to declare the GP models wrapped by the surrogate, one variant
/// for each (regression model, correlation model) pair.
///
/// Regression model is either `Constant`, `Linear` or `Quadratic`.
/// Correlation model is either `SquaredExponential`, `AbsoluteExponential`, `Matern32` or `Matern52`.
macro_rules! declare_gp_models {
    ($(($regr:ident, $corr:ident)),+ $(,)?) => {
        paste! {
            #[derive(Clone, Debug)]
            #[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
            pub(crate) enum GpModel {
                $(
                    #[doc = "GP with `" $regr "` regression model and `" $corr "` correlation model"]
                    [<$regr $corr>](GaussianProcess<f64, [<$regr Mean>], [<$corr Corr>]>),
                )+
            }

            impl GpModel {
                fn fit(params: &GpSurrogateValidParams, dataset: &DatasetBase<Array2<f64>, Array1<f64>>) -> Result<GpModel> {
                    match (params.regression, params.correlation) {
                        $(
                            (RegressionKind::$regr, CorrelationKind::$corr) => {
                                let mut gp_params = GaussianProcess::<f64, [<$regr Mean>], [<$corr Corr>]>::params(
                                    [<$regr Mean>]::default(),
                                    [<$corr Corr>]::default(),
                                )
                                .n_start(params.n_start)
                                .max_eval(params.max_eval)
                                .kpls_dim(params.kpls_dim);
                                if let Some(nugget) = params.nugget {
                                    gp_params = gp_params.nugget(nugget);
                                }
                                Ok(GpModel::[<$regr $corr>](gp_params.fit(dataset)?))
                            }
                        )+
                    }
                }

                fn dims(&self) -> (usize, usize) {
                    match self {
                        $( GpModel::[<$regr $corr>](gp) => gp.dims(), )+
                    }
                }

                fn likelihood(&self) -> f64 {
                    match self {
                        $( GpModel::[<$regr $corr>](gp) => gp.likelihood(), )+
                    }
                }

                fn predict_valvar(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
                    match self {
                        $( GpModel::[<$regr $corr>](gp) => Ok(gp.predict_valvar(x)?), )+
                    }
                }
            }

            impl fmt::Display for GpModel {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match self {
                        $( GpModel::[<$regr $corr>](gp) => write!(f, "{}", gp), )+
                    }
                }
            }
        }
    };
}

declare_gp_models!(
    (Constant, SquaredExponential),
    (Constant, AbsoluteExponential),
    (Constant, Matern32),
    (Constant, Matern52),
    (Linear, SquaredExponential),
    (Linear, AbsoluteExponential),
    (Linear, Matern32),
    (Linear, Matern52),
    (Quadratic, SquaredExponential),
    (Quadratic, AbsoluteExponential),
    (Quadratic, Matern32),
    (Quadratic, Matern52),
);

/// Gaussian process surrogate backed by [egobox_gp::GaussianProcess].
///
/// The reported uncertainty is the predicted standard deviation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct GpSurrogate {
    /// Parameters used to fit this model
    params: GpSurrogateValidParams,
    /// Trained GP
    model: GpModel,
}

impl GpSurrogate {
    /// GP surrogate parameters with default `Constant` regression and
    /// `SquaredExponential` correlation models
    pub fn params() -> GpSurrogateParams {
        GpSurrogateParams::default()
    }

    /// Parameters used to fit this model
    pub fn fitted_params(&self) -> &GpSurrogateValidParams {
        &self.params
    }

    /// Reduced likelihood of the trained GP
    pub fn likelihood(&self) -> f64 {
        self.model.likelihood()
    }
}

impl<D: Data<Elem = f64>> Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, SurrogateError>
    for GpSurrogateValidParams
{
    type Object = GpSurrogate;

    /// Fit GP hyperparameters using maximum likelihood
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>) -> Result<GpSurrogate> {
        let x = dataset.records();
        let y = dataset.targets();
        check_training_data(x, y)?;

        let now = Instant::now();
        let model = GpModel::fit(self, &Dataset::new(x.to_owned(), y.to_owned()))?;
        debug!(
            "GP {}_{} trained on {} samples, elapsed = {:?}ms",
            self.regression,
            self.correlation,
            x.nrows(),
            now.elapsed().as_millis()
        );
        Ok(GpSurrogate {
            params: self.clone(),
            model,
        })
    }
}

impl Surrogate for GpSurrogate {
    fn dims(&self) -> (usize, usize) {
        self.model.dims()
    }

    fn predict_with_uncertainty(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        check_input_dim(self.dims().0, x)?;
        let (values, variances) = self.model.predict_valvar(x)?;
        let std_devs = variances.mapv(|v| if v < 0. { 0. } else { v.sqrt() });
        Ok((values, std_devs))
    }
}

impl fmt::Display for GpSurrogate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}{}_{}",
            self.params.regression,
            self.params.correlation,
            match self.params.kpls_dim {
                None => String::from(""),
                Some(dim) => format!("_PLS({dim})"),
            },
            self.model
        )
    }
}
