use crate::errors::{ProblemError, Result};
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A continuous decision variable with an initial value and (possibly infinite) bounds
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Variable {
    name: String,
    initial_value: f64,
    lower_bound: f64,
    upper_bound: f64,
}

impl Variable {
    /// Constructor
    ///
    /// # Errors
    ///
    /// [ProblemError::ConfigurationError] when `lower_bound >= upper_bound`,
    /// when the initial value is not finite or lies outside the bounds.
    pub fn new(
        name: impl Into<String>,
        initial_value: f64,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<Self> {
        let name = name.into();
        if lower_bound.is_nan() || upper_bound.is_nan() || lower_bound >= upper_bound {
            return Err(ProblemError::ConfigurationError(format!(
                "Variable {name}: lower bound {lower_bound} should be less than upper bound {upper_bound}"
            )));
        }
        if !initial_value.is_finite() || initial_value < lower_bound || initial_value > upper_bound
        {
            return Err(ProblemError::ConfigurationError(format!(
                "Variable {name}: initial value {initial_value} out of bounds [{lower_bound}, {upper_bound}]"
            )));
        }
        Ok(Variable {
            name,
            initial_value,
            lower_bound,
            upper_bound,
        })
    }

    /// Variable without bounds
    pub fn unbounded(name: impl Into<String>, initial_value: f64) -> Result<Self> {
        Self::new(name, initial_value, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Name of the variable
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Initial value
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Lower bound, `-inf` when unbounded below
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Upper bound, `+inf` when unbounded above
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Whether `value` lies within bounds
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in [{}, {}] (initial {})",
            self.name, self.lower_bound, self.upper_bound, self.initial_value
        )
    }
}
