use crate::constraint::ScalarConstraint;
use crate::data_objective::{DataObjectiveEvaluator, ObjectiveModelSpec};
use crate::dataset::ObjectiveDataset;
use crate::errors::{ProblemError, Result};
use crate::problem::{Problem, evaluate_constraints};
use crate::types::EvaluationResults;

use log::info;
use ndarray::{Array1, Array2, ArrayView2};
use paretobox_surrogate::SurrogateSpec;

/// Default widening of data bounds so that stored decision vectors lie strictly inside
pub const DATA_BOUNDS_EPSILON: f64 = 1e-6;

/// A problem whose objectives are only known through a dataset of evaluated decision vectors.
///
/// Evaluation looks up the nearest stored decision vector unless surrogate evaluation
/// is switched on with [DataProblem::set_surrogate_evaluation] once surrogates are trained.
#[derive(Clone, Debug)]
pub struct DataProblem {
    evaluator: DataObjectiveEvaluator,
    constraints: Vec<ScalarConstraint>,
    epsilon: f64,
    use_surrogate: bool,
}

impl DataProblem {
    /// Constructor
    pub fn new(dataset: ObjectiveDataset) -> Result<Self> {
        Ok(DataProblem {
            evaluator: DataObjectiveEvaluator::new(dataset)?,
            constraints: vec![],
            epsilon: DATA_BOUNDS_EPSILON,
            use_surrogate: false,
        })
    }

    /// Set constraints on (decision vector, objective vector) pairs
    pub fn with_constraints(mut self, constraints: Vec<ScalarConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the widening of data bounds, 0 gives the exact data range
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0. {
            return Err(ProblemError::ConfigurationError(format!(
                "Bounds epsilon should be a non negative finite value, got {epsilon}"
            )));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    /// Bounds widening
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Switch between surrogate predictions and nearest sample lookup
    pub fn set_surrogate_evaluation(&mut self, use_surrogate: bool) {
        info!(
            "Data problem evaluation with {}",
            if use_surrogate {
                "surrogates"
            } else {
                "nearest sample lookup"
            }
        );
        self.use_surrogate = use_surrogate;
    }

    /// Whether evaluation goes through surrogates
    pub fn uses_surrogate(&self) -> bool {
        self.use_surrogate
    }

    /// Underlying evaluator
    pub fn evaluator(&self) -> &DataObjectiveEvaluator {
        &self.evaluator
    }

    /// Underlying dataset
    pub fn dataset(&self) -> &ObjectiveDataset {
        self.evaluator.dataset()
    }

    /// Constraints
    pub fn constraints(&self) -> &[ScalarConstraint] {
        &self.constraints
    }

    /// Train objective surrogates, see [DataObjectiveEvaluator::train]
    pub fn train(&mut self, specs: &[ObjectiveModelSpec]) -> Result<()> {
        self.evaluator.train(specs)
    }

    /// Train the same surrogate for every objective, see [DataObjectiveEvaluator::train_all]
    pub fn train_all(&mut self, surrogate: impl Into<SurrogateSpec>) -> Result<()> {
        self.evaluator.train_all(surrogate)
    }

    /// Constraint values of the stored samples as a (n_samples, n_constraints) matrix,
    /// `None` without constraints
    pub fn constraint_values(&self) -> Option<Array2<f64>> {
        evaluate_constraints(
            &self.constraints,
            &self.dataset().decision_vectors(),
            &self.dataset().objective_vectors(),
        )
    }
}

impl Problem for DataProblem {
    fn n_of_variables(&self) -> usize {
        self.evaluator.n_of_variables()
    }

    fn n_of_objectives(&self) -> usize {
        self.evaluator.n_of_objectives()
    }

    fn n_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn variable_bounds(&self) -> Option<Array2<f64>> {
        let mut bounds = self.dataset().variable_extent();
        bounds.column_mut(0).mapv_inplace(|lb| lb - self.epsilon);
        bounds.column_mut(1).mapv_inplace(|ub| ub + self.epsilon);
        Some(bounds)
    }

    fn ideal(&self) -> Option<Array1<f64>> {
        Some(self.dataset().ideal())
    }

    fn nadir(&self) -> Option<Array1<f64>> {
        Some(self.dataset().nadir())
    }

    fn evaluate(&self, x: &ArrayView2<f64>) -> Result<EvaluationResults> {
        let mut results = self.evaluator.evaluate(x, self.use_surrogate)?;
        results.constraints =
            evaluate_constraints(&self.constraints, x, &results.objectives.view());
        Ok(results)
    }
}
