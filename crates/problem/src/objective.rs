use crate::errors::{ProblemError, Result};
use ndarray::{Array1, ArrayView1};
use std::fmt;
use std::sync::Arc;

/// A function computing one objective value from a decision vector
pub type ScalarObjectiveFn = Arc<dyn Fn(&ArrayView1<f64>) -> f64 + Send + Sync>;
/// A function computing several objective values at once from a decision vector
pub type VectorObjectiveFn = Arc<dyn Fn(&ArrayView1<f64>) -> Array1<f64> + Send + Sync>;

/// A single objective given as a function of the decision vector
#[derive(Clone)]
pub struct ScalarObjective {
    name: String,
    function: ScalarObjectiveFn,
    maximize: bool,
}

impl ScalarObjective {
    /// Objective to be minimized
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        ScalarObjective {
            name: name.into(),
            function: Arc::new(function),
            maximize: false,
        }
    }

    /// Set whether the objective is to be maximized
    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Name of the objective
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the objective is to be maximized
    pub fn is_maximized(&self) -> bool {
        self.maximize
    }

    /// Objective value at `x`
    pub fn evaluate(&self, x: &ArrayView1<f64>) -> f64 {
        (self.function)(x)
    }
}

impl fmt::Debug for ScalarObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarObjective")
            .field("name", &self.name)
            .field("maximize", &self.maximize)
            .finish()
    }
}

/// Several objectives computed together by one function of the decision vector
#[derive(Clone)]
pub struct VectorObjective {
    names: Vec<String>,
    function: VectorObjectiveFn,
    maximize: Vec<bool>,
}

impl VectorObjective {
    /// Objectives to be minimized, one per name
    pub fn new<F>(names: &[&str], function: F) -> Result<Self>
    where
        F: Fn(&ArrayView1<f64>) -> Array1<f64> + Send + Sync + 'static,
    {
        if names.is_empty() {
            return Err(ProblemError::ConfigurationError(
                "Vector objective should name at least one objective".to_string(),
            ));
        }
        Ok(VectorObjective {
            names: names.iter().map(|n| n.to_string()).collect(),
            function: Arc::new(function),
            maximize: vec![false; names.len()],
        })
    }

    /// Set which objectives are to be maximized, one flag per objective
    pub fn maximize(mut self, maximize: &[bool]) -> Result<Self> {
        if maximize.len() != self.names.len() {
            return Err(ProblemError::ConfigurationError(format!(
                "{} maximize flags given for {} objectives",
                maximize.len(),
                self.names.len()
            )));
        }
        self.maximize = maximize.to_vec();
        Ok(self)
    }

    /// Names of the objectives
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Maximization flag of each objective
    pub fn maximized(&self) -> &[bool] {
        &self.maximize
    }

    /// Number of objectives
    pub fn n_of_objectives(&self) -> usize {
        self.names.len()
    }

    /// Objective values at `x`
    ///
    /// # Errors
    ///
    /// [ProblemError::InvalidValueError] when the function does not return one value per objective.
    pub fn evaluate(&self, x: &ArrayView1<f64>) -> Result<Array1<f64>> {
        let values = (self.function)(x);
        if values.len() != self.names.len() {
            return Err(ProblemError::InvalidValueError(format!(
                "Vector objective returned {} values, expected {}",
                values.len(),
                self.names.len()
            )));
        }
        Ok(values)
    }
}

impl fmt::Debug for VectorObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorObjective")
            .field("names", &self.names)
            .field("maximize", &self.maximize)
            .finish()
    }
}

/// An objective of an analytical problem
#[derive(Clone, Debug)]
pub enum Objective {
    /// One objective
    Scalar(ScalarObjective),
    /// A block of objectives
    Vector(VectorObjective),
}

impl From<ScalarObjective> for Objective {
    fn from(obj: ScalarObjective) -> Self {
        Objective::Scalar(obj)
    }
}

impl From<VectorObjective> for Objective {
    fn from(obj: VectorObjective) -> Self {
        Objective::Vector(obj)
    }
}

impl Objective {
    /// Number of objective values produced
    pub fn n_of_objectives(&self) -> usize {
        match self {
            Objective::Scalar(_) => 1,
            Objective::Vector(obj) => obj.n_of_objectives(),
        }
    }

    /// Names of the produced objectives
    pub fn names(&self) -> Vec<String> {
        match self {
            Objective::Scalar(obj) => vec![obj.name.clone()],
            Objective::Vector(obj) => obj.names.clone(),
        }
    }

    /// Maximization flags of the produced objectives
    pub fn maximized(&self) -> Vec<bool> {
        match self {
            Objective::Scalar(obj) => vec![obj.maximize],
            Objective::Vector(obj) => obj.maximize.clone(),
        }
    }

    /// Objective values at `x`
    pub fn evaluate(&self, x: &ArrayView1<f64>) -> Result<Array1<f64>> {
        match self {
            Objective::Scalar(obj) => Ok(Array1::from_elem(1, obj.evaluate(x))),
            Objective::Vector(obj) => obj.evaluate(x),
        }
    }
}
