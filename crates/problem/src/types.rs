use ndarray::Array2;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Output of a problem evaluation for a batch of n decision vectors
///
/// Uncertainty values are `NaN` when unknown, i.e. when objective values
/// do not come from a surrogate model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct EvaluationResults {
    /// Objective values as a (n, n_objectives) matrix
    pub objectives: Array2<f64>,
    /// Constraint values as a (n, n_constraints) matrix, `None` when unconstrained.
    /// Positive values mean the constraint is satisfied.
    pub constraints: Option<Array2<f64>>,
    /// Objective values as to be minimized: maximized objectives have their sign flipped
    pub fitness: Array2<f64>,
    /// Uncertainty on objective values as a (n, n_objectives) matrix
    pub uncertainty: Array2<f64>,
}

impl EvaluationResults {
    /// Results without constraints where fitness equals objectives and
    /// uncertainty is unknown.
    pub fn from_objectives(objectives: Array2<f64>) -> Self {
        let uncertainty = Array2::from_elem(objectives.raw_dim(), f64::NAN);
        EvaluationResults {
            fitness: objectives.clone(),
            objectives,
            constraints: None,
            uncertainty,
        }
    }

    /// Number of evaluated decision vectors
    pub fn len(&self) -> usize {
        self.objectives.nrows()
    }

    /// Whether no decision vector was evaluated
    pub fn is_empty(&self) -> bool {
        self.objectives.nrows() == 0
    }

    /// Whether every uncertainty value is known
    pub fn has_known_uncertainty(&self) -> bool {
        self.uncertainty.iter().all(|u| !u.is_nan())
    }

    /// Whether every constraint is satisfied for the ith decision vector,
    /// `None` when `i` is out of range
    pub fn is_feasible(&self, i: usize) -> Option<bool> {
        if i >= self.len() {
            return None;
        }
        match &self.constraints {
            None => Some(true),
            Some(cstrs) => Some(cstrs.row(i).iter().all(|c| *c >= 0.)),
        }
    }
}
