use crate::constraint::ScalarConstraint;
use crate::errors::{ProblemError, Result};
use crate::objective::Objective;
use crate::types::EvaluationResults;
use crate::variable::Variable;

use log::debug;
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip, s};

/// A multiobjective problem as seen by solvers
pub trait Problem: Send + Sync {
    /// Number of decision variables
    fn n_of_variables(&self) -> usize;
    /// Number of objectives
    fn n_of_objectives(&self) -> usize;
    /// Number of constraints
    fn n_of_constraints(&self) -> usize;
    /// Bounds of decision variables as a (n_of_variables, 2) matrix of \[lower, upper\] rows
    fn variable_bounds(&self) -> Option<Array2<f64>>;
    /// Best known value of each objective when known
    fn ideal(&self) -> Option<Array1<f64>>;
    /// Worst known value of each objective when known
    fn nadir(&self) -> Option<Array1<f64>>;
    /// Evaluate each row of the (n, n_of_variables) matrix `x`
    fn evaluate(&self, x: &ArrayView2<f64>) -> Result<EvaluationResults>;
}

/// Values of `constraints` for each (row of `x`, row of `f`) pair, `None` without constraints
pub(crate) fn evaluate_constraints(
    constraints: &[ScalarConstraint],
    x: &ArrayView2<f64>,
    f: &ArrayView2<f64>,
) -> Option<Array2<f64>> {
    if constraints.is_empty() {
        return None;
    }
    let mut values = Array2::zeros((x.nrows(), constraints.len()));
    Zip::from(values.rows_mut())
        .and(x.rows())
        .and(f.rows())
        .par_for_each(|mut c, x, f| {
            for (v, cstr) in c.iter_mut().zip(constraints) {
                *v = cstr.evaluate(&x, &f);
            }
        });
    Some(values)
}

/// A problem defined by analytical objectives over bounded variables
#[derive(Clone, Debug)]
pub struct MOProblem {
    objectives: Vec<Objective>,
    variables: Vec<Variable>,
    constraints: Vec<ScalarConstraint>,
    ideal: Option<Array1<f64>>,
    nadir: Option<Array1<f64>>,
}

impl MOProblem {
    /// Constructor
    ///
    /// # Errors
    ///
    /// [ProblemError::ConfigurationError] when objectives or variables are missing, or
    /// when `ideal` or `nadir` do not have one value per objective.
    pub fn new(
        objectives: Vec<Objective>,
        variables: Vec<Variable>,
        constraints: Vec<ScalarConstraint>,
        ideal: Option<Array1<f64>>,
        nadir: Option<Array1<f64>>,
    ) -> Result<Self> {
        if objectives.is_empty() {
            return Err(ProblemError::ConfigurationError(
                "Problem should have at least one objective".to_string(),
            ));
        }
        if variables.is_empty() {
            return Err(ProblemError::ConfigurationError(
                "Problem should have at least one variable".to_string(),
            ));
        }
        let n_of_objectives: usize = objectives.iter().map(|o| o.n_of_objectives()).sum();
        for (label, point) in [("ideal", &ideal), ("nadir", &nadir)] {
            if let Some(point) = point
                && point.len() != n_of_objectives
            {
                return Err(ProblemError::ConfigurationError(format!(
                    "The length of the {label} point ({}) does not match the number of objectives ({n_of_objectives})",
                    point.len()
                )));
            }
        }
        Ok(MOProblem {
            objectives,
            variables,
            constraints,
            ideal,
            nadir,
        })
    }

    /// Objectives
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Decision variables
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Constraints
    pub fn constraints(&self) -> &[ScalarConstraint] {
        &self.constraints
    }

    /// Names of decision variables
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name().to_string()).collect()
    }

    /// Names of objectives
    pub fn objective_names(&self) -> Vec<String> {
        self.objectives.iter().flat_map(|o| o.names()).collect()
    }

    /// Lower bounds of decision variables
    pub fn lower_bounds(&self) -> Array1<f64> {
        self.variables.iter().map(|v| v.lower_bound()).collect()
    }

    /// Upper bounds of decision variables
    pub fn upper_bounds(&self) -> Array1<f64> {
        self.variables.iter().map(|v| v.upper_bound()).collect()
    }

    /// Initial values of decision variables
    pub fn initial_values(&self) -> Array1<f64> {
        self.variables.iter().map(|v| v.initial_value()).collect()
    }

    fn check_bounds(&self, x: &ArrayView2<f64>) -> Result<()> {
        for (i, row) in x.rows().into_iter().enumerate() {
            for (value, var) in row.iter().zip(&self.variables) {
                if !var.contains(*value) {
                    return Err(ProblemError::BoundsViolationError(format!(
                        "Decision vector #{i}: value {value} of variable {var}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Problem for MOProblem {
    fn n_of_variables(&self) -> usize {
        self.variables.len()
    }

    fn n_of_objectives(&self) -> usize {
        self.objectives.iter().map(|o| o.n_of_objectives()).sum()
    }

    fn n_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn variable_bounds(&self) -> Option<Array2<f64>> {
        let mut bounds = Array2::zeros((self.n_of_variables(), 2));
        bounds.column_mut(0).assign(&self.lower_bounds());
        bounds.column_mut(1).assign(&self.upper_bounds());
        Some(bounds)
    }

    fn ideal(&self) -> Option<Array1<f64>> {
        self.ideal.clone()
    }

    fn nadir(&self) -> Option<Array1<f64>> {
        self.nadir.clone()
    }

    /// # Errors
    ///
    /// * [ProblemError::DimensionMismatchError]: if rows of `x` do not have n_of_variables values,
    /// * [ProblemError::BoundsViolationError]: if some value is out of its variable bounds,
    /// * [ProblemError::InvalidValueError]: if a vector objective returns a wrong number of values.
    fn evaluate(&self, x: &ArrayView2<f64>) -> Result<EvaluationResults> {
        if x.ncols() != self.n_of_variables() {
            return Err(ProblemError::DimensionMismatchError {
                expected: self.n_of_variables(),
                actual: x.ncols(),
            });
        }
        self.check_bounds(x)?;

        let mut objectives = Array2::zeros((x.nrows(), self.n_of_objectives()));
        let mut col = 0;
        for objective in self.objectives.iter() {
            let n = objective.n_of_objectives();
            let mut block = objectives.slice_mut(s![.., col..col + n]);
            for (mut values, row) in block.rows_mut().into_iter().zip(x.rows()) {
                values.assign(&objective.evaluate(&row)?);
            }
            col += n;
        }
        debug!("Objectives = {objectives}");

        let constraints = evaluate_constraints(&self.constraints, x, &objectives.view());

        let maximized: Array1<f64> = self
            .objectives
            .iter()
            .flat_map(|o| o.maximized())
            .map(|max| if max { -1. } else { 1. })
            .collect();
        let fitness = &objectives * &maximized.insert_axis(Axis(0));
        let uncertainty = Array2::from_elem(objectives.raw_dim(), f64::NAN);

        Ok(EvaluationResults {
            objectives,
            constraints,
            fitness,
            uncertainty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{ScalarObjective, VectorObjective};
    use ndarray::{ArrayView1, array};

    fn river_problem() -> MOProblem {
        let objectives: Vec<Objective> = vec![
            ScalarObjective::new("f1", |x: &ArrayView1<f64>| x[0] + x[1]).into(),
            VectorObjective::new(&["f2", "f3"], |x: &ArrayView1<f64>| {
                array![x[0] * x[1], x[0] - x[1]]
            })
            .unwrap()
            .maximize(&[true, false])
            .unwrap()
            .into(),
        ];
        let variables = vec![
            Variable::new("a", 0.5, 0., 1.).unwrap(),
            Variable::new("b", 0.5, 0., 1.).unwrap(),
        ];
        let constraints = vec![ScalarConstraint::new(
            "f1 <= 1.5",
            |_x: &ArrayView1<f64>, f: &ArrayView1<f64>| 1.5 - f[0],
        )];
        MOProblem::new(objectives, variables, constraints, None, None).unwrap()
    }

    #[test]
    fn test_evaluate() {
        let problem = river_problem();
        assert_eq!(problem.n_of_objectives(), 3);
        assert_eq!(problem.n_of_constraints(), 1);
        assert_eq!(problem.objective_names(), vec!["f1", "f2", "f3"]);
        assert_eq!(problem.variable_names(), vec!["a", "b"]);
        assert_eq!(
            problem.variable_bounds().unwrap(),
            array![[0., 1.], [0., 1.]]
        );

        let res = problem.evaluate(&array![[0.5, 0.25], [1., 1.]].view()).unwrap();
        assert_eq!(res.objectives, array![[0.75, 0.125, 0.25], [2., 1., 0.]]);
        assert_eq!(res.fitness, array![[0.75, -0.125, 0.25], [2., -1., 0.]]);
        assert_eq!(res.constraints, Some(array![[0.75], [-0.5]]));
        assert_eq!(res.is_feasible(0), Some(true));
        assert_eq!(res.is_feasible(1), Some(false));
        assert!(!res.has_known_uncertainty());
    }

    #[test]
    fn test_evaluate_errors() {
        let problem = river_problem();
        assert!(matches!(
            problem.evaluate(&array![[0.5]].view()),
            Err(ProblemError::DimensionMismatchError {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            problem.evaluate(&array![[0.5, 0.5], [0.5, 1.5]].view()),
            Err(ProblemError::BoundsViolationError(_))
        ));
    }

    #[test]
    fn test_ideal_nadir_lengths() {
        let objectives =
            || -> Vec<Objective> { vec![ScalarObjective::new("f", |x: &ArrayView1<f64>| x[0]).into()] };
        let variables = || vec![Variable::new("x", 0., -1., 1.).unwrap()];
        let problem = MOProblem::new(
            objectives(),
            variables(),
            vec![],
            Some(array![-1.]),
            Some(array![1.]),
        )
        .unwrap();
        assert_eq!(problem.ideal(), Some(array![-1.]));
        assert_eq!(problem.nadir(), Some(array![1.]));
        assert!(problem.evaluate(&array![[0.]].view()).unwrap().constraints.is_none());

        assert!(matches!(
            MOProblem::new(objectives(), variables(), vec![], Some(array![0., 0.]), None),
            Err(ProblemError::ConfigurationError(_))
        ));
        assert!(matches!(
            MOProblem::new(objectives(), vec![], vec![], None, None),
            Err(ProblemError::ConfigurationError(_))
        ));
    }
}
