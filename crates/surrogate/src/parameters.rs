use crate::errors::{Result, SurrogateError};
use egobox_gp::{GP_COBYLA_MAX_EVAL, GP_COBYLA_MIN_EVAL, GP_OPTIM_N_START};
use linfa::ParamGuard;
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Regression models available for the GP mean
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum RegressionKind {
    /// Constant mean
    #[default]
    Constant,
    /// Linear mean
    Linear,
    /// 2-degree polynomial mean
    Quadratic,
}

/// Correlation models (kernels) available for the GP
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum CorrelationKind {
    /// Squared exponential kernel
    #[default]
    SquaredExponential,
    /// Absolute exponential kernel
    AbsoluteExponential,
    /// Matern 3/2 kernel
    Matern32,
    /// Matern 5/2 kernel
    Matern52,
}

impl fmt::Display for RegressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegressionKind::Constant => "Constant",
            RegressionKind::Linear => "Linear",
            RegressionKind::Quadratic => "Quadratic",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorrelationKind::SquaredExponential => "SquaredExponential",
            CorrelationKind::AbsoluteExponential => "AbsoluteExponential",
            CorrelationKind::Matern32 => "Matern32",
            CorrelationKind::Matern52 => "Matern52",
        };
        write!(f, "{name}")
    }
}

/// A set of validated GP surrogate parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct GpSurrogateValidParams {
    /// Regression model representing the mean(x)
    pub(crate) regression: RegressionKind,
    /// Correlation model representing the spatial correlation
    pub(crate) correlation: CorrelationKind,
    /// Number of internal likelihood optimization restart
    pub(crate) n_start: usize,
    /// Max number of internal likelihood evaluation during optimization
    pub(crate) max_eval: usize,
    /// Parameter to improve numerical stability, GP default when `None`
    pub(crate) nugget: Option<f64>,
    /// Optionally apply dimension reduction (KPLS) or not
    pub(crate) kpls_dim: Option<usize>,
}

impl Default for GpSurrogateValidParams {
    fn default() -> GpSurrogateValidParams {
        GpSurrogateValidParams {
            regression: RegressionKind::default(),
            correlation: CorrelationKind::default(),
            n_start: GP_OPTIM_N_START,
            max_eval: GP_COBYLA_MAX_EVAL,
            nugget: None,
            kpls_dim: None,
        }
    }
}

impl GpSurrogateValidParams {
    /// Get regression model kind
    pub fn regression(&self) -> RegressionKind {
        self.regression
    }

    /// Get correlation model kind
    pub fn correlation(&self) -> CorrelationKind {
        self.correlation
    }

    /// Get the number of internal optimization restart
    pub fn n_start(&self) -> usize {
        self.n_start
    }

    /// Get the max number of internal likelihood evaluations during one optimization
    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Get nugget if any
    pub fn nugget(&self) -> Option<f64> {
        self.nugget
    }

    /// Get number of components used by PLS
    pub fn kpls_dim(&self) -> Option<usize> {
        self.kpls_dim
    }
}

/// The set of hyperparameters that can be specified for a
/// [GP surrogate](crate::GpSurrogate).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct GpSurrogateParams(pub(crate) GpSurrogateValidParams);

impl GpSurrogateParams {
    /// A constructor for GP surrogate parameters given mean and correlation models
    pub fn new(regression: RegressionKind, correlation: CorrelationKind) -> GpSurrogateParams {
        Self(GpSurrogateValidParams {
            regression,
            correlation,
            ..Default::default()
        })
    }

    /// Set regression model.
    pub fn regression(mut self, regression: RegressionKind) -> Self {
        self.0.regression = regression;
        self
    }

    /// Set correlation model.
    pub fn correlation(mut self, correlation: CorrelationKind) -> Self {
        self.0.correlation = correlation;
        self
    }

    /// Set the number of internal GP hyperparameter theta optimization restarts
    pub fn n_start(mut self, n_start: usize) -> Self {
        self.0.n_start = n_start;
        self
    }

    /// Set the max number of internal likelihood evaluations during one optimization.
    /// Values lower than [GP_COBYLA_MIN_EVAL] are raised to it.
    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.0.max_eval = GP_COBYLA_MIN_EVAL.max(max_eval);
        self
    }

    /// Set nugget.
    ///
    /// Nugget is used to improve numerical stability
    pub fn nugget(mut self, nugget: f64) -> Self {
        self.0.nugget = Some(nugget);
        self
    }

    /// Set the number of PLS components.
    /// Should be 0 < n < pb size (i.e. x dimension)
    pub fn kpls_dim(mut self, kpls_dim: Option<usize>) -> Self {
        self.0.kpls_dim = kpls_dim;
        self
    }
}

impl From<GpSurrogateValidParams> for GpSurrogateParams {
    fn from(valid: GpSurrogateValidParams) -> Self {
        GpSurrogateParams(valid)
    }
}

impl ParamGuard for GpSurrogateParams {
    type Checked = GpSurrogateValidParams;
    type Error = SurrogateError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.kpls_dim == Some(0) {
            return Err(SurrogateError::InvalidConfigError(
                "`kpls_dim` cannot be 0!".to_string(),
            ));
        }
        if let Some(nugget) = self.0.nugget
            && (!nugget.is_finite() || nugget < 0.)
        {
            return Err(SurrogateError::InvalidConfigError(format!(
                "`nugget` should be a positive finite value, got {nugget}"
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A set of validated Lipschitzian regressor parameters.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct LipschitzianValidParams {
    /// Lipschitz constant, estimated from training data when `None`
    pub(crate) lipschitz_constant: Option<f64>,
}

impl LipschitzianValidParams {
    /// Get the user given Lipschitz constant if any
    pub fn lipschitz_constant(&self) -> Option<f64> {
        self.lipschitz_constant
    }
}

/// The set of hyperparameters that can be specified for a
/// [Lipschitzian regressor](crate::LipschitzianRegressor).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct LipschitzianParams(pub(crate) LipschitzianValidParams);

impl LipschitzianParams {
    /// Parameters estimating the Lipschitz constant from training data
    pub fn new() -> LipschitzianParams {
        Self::default()
    }

    /// Set the Lipschitz constant instead of estimating it.
    pub fn lipschitz_constant(mut self, lipschitz_constant: f64) -> Self {
        self.0.lipschitz_constant = Some(lipschitz_constant);
        self
    }
}

impl From<LipschitzianValidParams> for LipschitzianParams {
    fn from(valid: LipschitzianValidParams) -> Self {
        LipschitzianParams(valid)
    }
}

impl ParamGuard for LipschitzianParams {
    type Checked = LipschitzianValidParams;
    type Error = SurrogateError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if let Some(l) = self.0.lipschitz_constant
            && (!l.is_finite() || l < 0.)
        {
            return Err(SurrogateError::InvalidConfigError(format!(
                "Lipschitz constant should be a positive finite value, got {l}"
            )));
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
