use crate::errors::Result;
use crate::gaussian_process::GpSurrogate;
use crate::lipschitzian::LipschitzianRegressor;
use crate::parameters::{GpSurrogateParams, LipschitzianParams};

use linfa::prelude::{Dataset, Fit};
use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "persistent")]
use crate::errors::SurrogateError;
#[cfg(feature = "persistent")]
use std::fs;
#[cfg(feature = "persistent")]
use std::io::Write;

/// A trait for a trained surrogate of a scalar function
pub trait Surrogate: fmt::Display + Sync + Send {
    /// Returns input/output dims
    fn dims(&self) -> (usize, usize);
    /// Predict output values at n points given as (n, xdim) matrix.
    fn predict(&self, x: &ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(self.predict_with_uncertainty(x)?.0)
    }
    /// Predict uncertainty of the output values at n points given as (n, xdim) matrix.
    fn predict_uncertainty(&self, x: &ArrayView2<f64>) -> Result<Array1<f64>> {
        Ok(self.predict_with_uncertainty(x)?.1)
    }
    /// Predict both output values and their uncertainty at n points given as (n, xdim) matrix.
    fn predict_with_uncertainty(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)>;
}

/// Surrogate variant with its parameters, the recipe to train a [SurrogateModel].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum SurrogateSpec {
    /// Gaussian process regression
    GaussianProcess(GpSurrogateParams),
    /// Lipschitzian regression
    Lipschitzian(LipschitzianParams),
}

impl Default for SurrogateSpec {
    fn default() -> Self {
        SurrogateSpec::GaussianProcess(GpSurrogateParams::default())
    }
}

impl From<GpSurrogateParams> for SurrogateSpec {
    fn from(params: GpSurrogateParams) -> Self {
        SurrogateSpec::GaussianProcess(params)
    }
}

impl From<LipschitzianParams> for SurrogateSpec {
    fn from(params: LipschitzianParams) -> Self {
        SurrogateSpec::Lipschitzian(params)
    }
}

impl SurrogateSpec {
    /// Gaussian process with default parameters
    pub fn gaussian_process() -> Self {
        SurrogateSpec::GaussianProcess(GpSurrogateParams::default())
    }

    /// Lipschitzian regressor with estimated Lipschitz constant
    pub fn lipschitzian() -> Self {
        SurrogateSpec::Lipschitzian(LipschitzianParams::default())
    }

    /// Name of the surrogate variant
    pub fn name(&self) -> &'static str {
        match self {
            SurrogateSpec::GaussianProcess(_) => "GaussianProcess",
            SurrogateSpec::Lipschitzian(_) => "Lipschitzian",
        }
    }

    /// Train a fresh surrogate on (n, xdim) inputs `x` and (n,) outputs `y`
    pub fn train(&self, x: &ArrayView2<f64>, y: &ArrayView1<f64>) -> Result<SurrogateModel> {
        debug!("Train {} surrogate on {} samples", self.name(), x.nrows());
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = match self {
            SurrogateSpec::GaussianProcess(params) => {
                SurrogateModel::GaussianProcess(params.fit(&dataset)?)
            }
            SurrogateSpec::Lipschitzian(params) => {
                SurrogateModel::Lipschitzian(params.fit(&dataset)?)
            }
        };
        Ok(model)
    }
}

/// A trained surrogate
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum SurrogateModel {
    /// Gaussian process regression
    GaussianProcess(GpSurrogate),
    /// Lipschitzian regression
    Lipschitzian(LipschitzianRegressor),
}

impl SurrogateModel {
    /// Name of the surrogate variant
    pub fn name(&self) -> &'static str {
        match self {
            SurrogateModel::GaussianProcess(_) => "GaussianProcess",
            SurrogateModel::Lipschitzian(_) => "Lipschitzian",
        }
    }

    /// Save model in given json file.
    #[cfg(feature = "persistent")]
    pub fn save(&self, path: &str) -> Result<()> {
        let mut file = fs::File::create(path)?;
        let bytes = serde_json::to_vec(self).map_err(SurrogateError::JsonError)?;
        file.write_all(&bytes)?;
        Ok(())
    }
}

impl Surrogate for SurrogateModel {
    fn dims(&self) -> (usize, usize) {
        match self {
            SurrogateModel::GaussianProcess(gp) => gp.dims(),
            SurrogateModel::Lipschitzian(lip) => lip.dims(),
        }
    }

    fn predict_with_uncertainty(&self, x: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
        match self {
            SurrogateModel::GaussianProcess(gp) => gp.predict_with_uncertainty(x),
            SurrogateModel::Lipschitzian(lip) => lip.predict_with_uncertainty(x),
        }
    }
}

impl fmt::Display for SurrogateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurrogateModel::GaussianProcess(gp) => write!(f, "{gp}"),
            SurrogateModel::Lipschitzian(lip) => write!(f, "{lip}"),
        }
    }
}

#[cfg(feature = "persistent")]
/// Load a trained surrogate from given json file.
pub fn load(path: &str) -> Result<SurrogateModel> {
    let data = fs::read(path)?;
    serde_json::from_slice::<SurrogateModel>(&data)
        .map_err(|err| SurrogateError::LoadError(format!("Error while loading from {path}: ({err})")))
}
