use crate::dataset::ObjectiveDataset;
use crate::errors::{ProblemError, Result, TrainingFailure};
use crate::types::EvaluationResults;

use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2, Zip};
use paretobox_surrogate::{Surrogate, SurrogateModel, SurrogateSpec};
use rayon::prelude::*;
use std::collections::HashMap;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Surrogate to train for one objective
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct ObjectiveModelSpec {
    /// Index of the objective
    pub objective: usize,
    /// Surrogate variant and parameters
    pub surrogate: SurrogateSpec,
}

impl ObjectiveModelSpec {
    /// Constructor
    pub fn new(objective: usize, surrogate: impl Into<SurrogateSpec>) -> Self {
        ObjectiveModelSpec {
            objective,
            surrogate: surrogate.into(),
        }
    }

    /// The same surrogate for each of the `n_of_objectives` objectives
    pub fn broadcast(surrogate: impl Into<SurrogateSpec>, n_of_objectives: usize) -> Vec<Self> {
        let surrogate = surrogate.into();
        (0..n_of_objectives)
            .map(|objective| ObjectiveModelSpec::new(objective, surrogate.clone()))
            .collect()
    }
}

/// Objectives known through pre-computed data.
///
/// A decision vector is evaluated either by looking up the nearest stored
/// decision vector (Euclidean distance, lowest index wins ties) or, once
/// trained, by the surrogate model of each objective.
///
/// Training requires `&mut self` while evaluation only needs `&self`, so
/// evaluations may run concurrently but never during a training.
#[derive(Clone, Debug)]
pub struct DataObjectiveEvaluator {
    dataset: ObjectiveDataset,
    /// Trained surrogate of each objective, `None` when untrained
    models: Vec<Option<SurrogateModel>>,
}

/// Euclidean distance between `a` and `b`, scaled by the largest component
/// difference so that large finite inputs do not overflow.
fn euclidean_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    let scale = Zip::from(a)
        .and(b)
        .fold(0., |acc: f64, &u, &v| acc.max((u - v).abs()));
    if scale == 0. || !scale.is_finite() {
        return scale;
    }
    let sum = Zip::from(a).and(b).fold(0., |acc, &u, &v| {
        let d = (u - v) / scale;
        acc + d * d
    });
    scale * sum.sqrt()
}

/// Index of the row of `xt` nearest to `x`, the lowest index wins exact ties
fn nearest_row(xt: &ArrayView2<f64>, x: &ArrayView1<f64>) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, row) in xt.rows().into_iter().enumerate() {
        let dist = euclidean_distance(&row, x);
        if dist < best.1 {
            best = (i, dist);
        }
    }
    best.0
}

impl DataObjectiveEvaluator {
    /// Constructor given the dataset of (decision vector, objective vector) samples
    pub fn new(dataset: ObjectiveDataset) -> Result<Self> {
        if dataset.n_samples() == 0 || dataset.n_of_variables() == 0 {
            return Err(ProblemError::ConfigurationError(
                "Dataset should contain at least one sample with one variable".to_string(),
            ));
        }
        let models = vec![None; dataset.n_of_objectives()];
        Ok(DataObjectiveEvaluator { dataset, models })
    }

    /// Underlying dataset
    pub fn dataset(&self) -> &ObjectiveDataset {
        &self.dataset
    }

    /// Number of decision variables
    pub fn n_of_variables(&self) -> usize {
        self.dataset.n_of_variables()
    }

    /// Number of objectives
    pub fn n_of_objectives(&self) -> usize {
        self.dataset.n_of_objectives()
    }

    /// Trained surrogate of the ith objective if any
    pub fn model(&self, objective: usize) -> Option<&SurrogateModel> {
        self.models.get(objective).and_then(|m| m.as_ref())
    }

    /// Whether the ith objective has a trained surrogate
    pub fn is_trained(&self, objective: usize) -> bool {
        self.model(objective).is_some()
    }

    /// Indices of objectives with a trained surrogate
    pub fn trained_objectives(&self) -> Vec<usize> {
        (0..self.n_of_objectives())
            .filter(|&j| self.is_trained(j))
            .collect()
    }

    /// Training status by objective name
    pub fn trained(&self) -> HashMap<String, bool> {
        self.dataset
            .objective_names()
            .iter()
            .zip(self.models.iter())
            .map(|(name, model)| (name.clone(), model.is_some()))
            .collect()
    }

    /// Check every query row has `n_of_variables` finite values
    fn check_query(&self, query: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Result<()> {
        if query.ncols() != self.n_of_variables() {
            return Err(ProblemError::DimensionMismatchError {
                expected: self.n_of_variables(),
                actual: query.ncols(),
            });
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(ProblemError::InvalidValueError(
                "Decision vectors should only contain finite values".to_string(),
            ));
        }
        Ok(())
    }

    /// Indices of the stored samples nearest to each row of the (n, n_of_variables) query
    pub fn nearest_indices(
        &self,
        query: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<Array1<usize>> {
        self.check_query(query)?;
        let xt = self.dataset.decision_vectors();
        Ok(Zip::from(query.rows()).par_map_collect(|x| nearest_row(&xt, &x)))
    }

    /// Evaluate objectives at each row of the (n, n_of_variables) query.
    ///
    /// Without surrogate each row is mapped to the objective vector of the nearest
    /// stored sample and uncertainty is unknown. With surrogate every objective
    /// surrogate has to be trained.
    ///
    /// # Errors
    ///
    /// * [ProblemError::DimensionMismatchError]: if query rows do not have n_of_variables values,
    /// * [ProblemError::ModelNotTrainedError]: if some objectives lack a trained surrogate,
    /// * [ProblemError::SurrogateError]: if a surrogate prediction fails.
    pub fn evaluate(
        &self,
        query: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        use_surrogate: bool,
    ) -> Result<EvaluationResults> {
        self.check_query(query)?;
        if use_surrogate {
            self.evaluate_surrogates(&query.view())
        } else {
            self.evaluate_lookup(query)
        }
    }

    fn evaluate_lookup(
        &self,
        query: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<EvaluationResults> {
        let indices = self.nearest_indices(query)?;
        info!(
            "Approximate {} decision vectors with their nearest stored samples",
            query.nrows()
        );
        debug!("Nearest samples = {indices}");
        let objectives = self
            .dataset
            .objective_vectors()
            .select(Axis(0), &indices.to_vec());
        Ok(EvaluationResults::from_objectives(objectives))
    }

    fn evaluate_surrogates(&self, query: &ArrayView2<f64>) -> Result<EvaluationResults> {
        let missing: Vec<String> = self
            .models
            .iter()
            .zip(self.dataset.objective_names())
            .filter(|(model, _)| model.is_none())
            .map(|(_, name)| name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ProblemError::ModelNotTrainedError(missing));
        }

        let mut objectives = Array2::zeros((query.nrows(), self.n_of_objectives()));
        let mut uncertainty = Array2::zeros((query.nrows(), self.n_of_objectives()));
        for (j, model) in self.models.iter().enumerate() {
            if let Some(model) = model {
                let (values, deltas) = model.predict_with_uncertainty(query)?;
                objectives.column_mut(j).assign(&values);
                uncertainty.column_mut(j).assign(&deltas);
            }
        }
        // Negative uncertainties may come from numerical noise or from
        // too small Lipschitz constant: floored to 0.
        uncertainty.mapv_inplace(|u| if u < 0. { 0. } else { u });

        Ok(EvaluationResults {
            fitness: objectives.clone(),
            objectives,
            constraints: None,
            uncertainty,
        })
    }

    /// Predict values and uncertainties of the ith objective with its surrogate.
    ///
    /// Only that objective has to be trained.
    pub fn predict_objective(
        &self,
        objective: usize,
        query: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        if objective >= self.n_of_objectives() {
            return Err(ProblemError::ConfigurationError(format!(
                "Objective index {objective} out of range, problem has {} objectives",
                self.n_of_objectives()
            )));
        }
        self.check_query(query)?;
        let model = self.model(objective).ok_or_else(|| {
            ProblemError::ModelNotTrainedError(vec![
                self.dataset.objective_names()[objective].clone(),
            ])
        })?;
        let (values, deltas) = model.predict_with_uncertainty(&query.view())?;
        Ok((values, deltas.mapv(|u| if u < 0. { 0. } else { u })))
    }

    /// Check `specs` hold exactly one entry per objective
    fn check_specs(&self, specs: &[ObjectiveModelSpec]) -> Result<()> {
        if specs.len() != self.n_of_objectives() {
            return Err(ProblemError::ConfigurationError(format!(
                "{} surrogates given for {} objectives",
                specs.len(),
                self.n_of_objectives()
            )));
        }
        let mut seen = vec![false; self.n_of_objectives()];
        for spec in specs {
            match seen.get_mut(spec.objective) {
                None => {
                    return Err(ProblemError::ConfigurationError(format!(
                        "Objective index {} out of range",
                        spec.objective
                    )));
                }
                Some(true) => {
                    return Err(ProblemError::ConfigurationError(format!(
                        "Objective index {} specified twice",
                        spec.objective
                    )));
                }
                Some(flag) => *flag = true,
            }
        }
        Ok(())
    }

    /// Train one surrogate per objective against the stored samples.
    ///
    /// Objectives are fitted concurrently and independently: successful fits replace
    /// the previous surrogate, failed objectives become untrained. Failures are
    /// reported together once every fit is done.
    ///
    /// # Errors
    ///
    /// * [ProblemError::ConfigurationError]: if `specs` do not hold exactly one entry per objective,
    /// * [ProblemError::ModelTrainingError]: listing the objectives whose fit failed.
    pub fn train(&mut self, specs: &[ObjectiveModelSpec]) -> Result<()> {
        self.check_specs(specs)?;

        let xt = self.dataset.decision_vectors();
        let ft = self.dataset.objective_vectors();
        let mut fits: Vec<_> = specs
            .par_iter()
            .map(|spec| {
                let yt = ft.column(spec.objective);
                (spec.objective, spec.surrogate.train(&xt, &yt))
            })
            .collect();
        fits.sort_by_key(|(objective, _)| *objective);

        let mut failures = vec![];
        for (objective, fit) in fits {
            let name = self.dataset.objective_names()[objective].clone();
            match fit {
                Ok(model) => {
                    info!("Surrogate trained for objective {name}: {model}");
                    self.models[objective] = Some(model);
                }
                Err(cause) => {
                    warn!("Surrogate training failed for objective {name}: {cause}");
                    self.models[objective] = None;
                    failures.push(TrainingFailure {
                        objective,
                        name,
                        cause,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ProblemError::ModelTrainingError(failures))
        }
    }

    /// Train the same surrogate variant with the same parameters for every objective
    pub fn train_all(&mut self, surrogate: impl Into<SurrogateSpec>) -> Result<()> {
        let specs = ObjectiveModelSpec::broadcast(surrogate, self.n_of_objectives());
        self.train(&specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use egobox_doe::{Random, SamplingMethod};
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use paretobox_surrogate::{GpSurrogateParams, LipschitzianParams};
    use rand_xoshiro::Xoshiro256Plus;

    fn two_points() -> DataObjectiveEvaluator {
        let dataset =
            ObjectiveDataset::from_records(&[(vec![0., 0.], vec![0., 0.]), (vec![1., 1.], vec![2., 1.])])
                .unwrap();
        DataObjectiveEvaluator::new(dataset).unwrap()
    }

    /// f1 = a + b and f2 = a * b sampled at 100 random points of [0, 1]^2
    fn sum_prod() -> DataObjectiveEvaluator {
        let xlimits = array![[0., 1.], [0., 1.]];
        let xt = Random::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(100);
        let mut ft = Array2::zeros((xt.nrows(), 2));
        Zip::from(ft.rows_mut()).and(xt.rows()).for_each(|mut f, x| {
            f[0] = x[0] + x[1];
            f[1] = x[0] * x[1];
        });
        DataObjectiveEvaluator::new(ObjectiveDataset::new(xt, ft).unwrap()).unwrap()
    }

    #[test]
    fn test_nearest_lookup() {
        let evaluator = two_points();
        let res = evaluator.evaluate(&array![[0.4, 0.4]], false).unwrap();
        assert_eq!(res.objectives, array![[0., 0.]]);
        assert_eq!(res.fitness, res.objectives);
        assert!(res.constraints.is_none());
        assert!(res.uncertainty.iter().all(|u| u.is_nan()));

        let res = evaluator.evaluate(&array![[0.6, 0.6], [-3., 0.]], false).unwrap();
        assert_eq!(res.objectives, array![[2., 1.], [0., 0.]]);
    }

    #[test]
    fn test_exact_match() {
        let evaluator = sum_prod();
        let xt = evaluator.dataset().decision_vectors().to_owned();
        let res = evaluator.evaluate(&xt, false).unwrap();
        assert_eq!(res.objectives, evaluator.dataset().objective_vectors());
    }

    #[test]
    fn test_nearest_tie_break_lowest_index() {
        let dataset = ObjectiveDataset::new(
            array![[1., 0.], [-1., 0.], [1., 0.]],
            array![[10.], [20.], [30.]],
        )
        .unwrap();
        let evaluator = DataObjectiveEvaluator::new(dataset).unwrap();
        let indices = evaluator.nearest_indices(&array![[0., 0.], [1., 0.]]).unwrap();
        assert_eq!(indices, array![0, 0]);
        let res = evaluator.evaluate(&array![[0., 0.]], false).unwrap();
        assert_eq!(res.objectives, array![[10.]]);
    }

    #[test]
    fn test_nearest_is_minimal_distance() {
        let evaluator = sum_prod();
        let xlimits = array![[-0.5, 1.5], [-0.5, 1.5]];
        let query = Random::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .sample(20);
        let indices = evaluator.nearest_indices(&query).unwrap();
        let xt = evaluator.dataset().decision_vectors();
        for (q, &idx) in query.rows().into_iter().zip(indices.iter()) {
            let dist = |row: ArrayView1<f64>| (&row - &q).mapv(|v| v * v).sum().sqrt();
            let best = dist(xt.row(idx));
            for (i, row) in xt.rows().into_iter().enumerate() {
                let d = dist(row);
                assert!(best <= d);
                if d == best {
                    assert!(idx <= i);
                }
            }
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let evaluator = two_points();
        for use_surrogate in [false, true] {
            assert!(matches!(
                evaluator.evaluate(&array![[0., 0., 0.]], use_surrogate),
                Err(ProblemError::DimensionMismatchError {
                    expected: 2,
                    actual: 3
                })
            ));
        }
        assert!(matches!(
            evaluator.evaluate(&array![[0., f64::NAN]], false),
            Err(ProblemError::InvalidValueError(_))
        ));
    }

    #[test]
    fn test_surrogate_before_training() {
        let evaluator = two_points();
        match evaluator.evaluate(&array![[0.4, 0.4]], true) {
            Err(ProblemError::ModelNotTrainedError(names)) => assert_eq!(names, vec!["f1", "f2"]),
            res => panic!("model not trained error expected, got {res:?}"),
        }
        // lookup is still available
        let res = evaluator.evaluate(&array![[0.4, 0.4]], false).unwrap();
        assert_eq!(res.objectives, array![[0., 0.]]);
    }

    #[test]
    fn test_nearest_with_large_values() {
        let dataset = ObjectiveDataset::new(array![[3e200], [-1e200]], array![[10.], [20.]]).unwrap();
        let evaluator = DataObjectiveEvaluator::new(dataset).unwrap();
        let res = evaluator.evaluate(&array![[0.]], false).unwrap();
        assert_eq!(res.objectives, array![[20.]]);
        assert_eq!(
            evaluator.nearest_indices(&array![[1e300], [-2e200]]).unwrap(),
            array![0, 1]
        );
    }

    #[test]
    fn test_model_not_trained() {
        let mut evaluator = two_points();
        evaluator
            .train(&[
                ObjectiveModelSpec::new(0, LipschitzianParams::new()),
                ObjectiveModelSpec::new(
                    1,
                    LipschitzianParams::new().lipschitz_constant(f64::NAN),
                ),
            ])
            .unwrap_err();
        assert_eq!(evaluator.trained_objectives(), vec![0]);
        match evaluator.evaluate(&array![[0.4, 0.4]], true) {
            Err(ProblemError::ModelNotTrainedError(names)) => assert_eq!(names, vec!["f2"]),
            res => panic!("model not trained error expected, got {res:?}"),
        }
        // trained objective is still usable
        let (values, deltas) = evaluator
            .predict_objective(0, &array![[0.5, 0.5]])
            .unwrap();
        assert_abs_diff_eq!(values[0], 1., epsilon = 1e-12);
        assert!(deltas[0] >= 0.);
        assert!(matches!(
            evaluator.predict_objective(1, &array![[0.5, 0.5]]),
            Err(ProblemError::ModelNotTrainedError(_))
        ));
    }

    #[test]
    fn test_training_failures_are_collected() {
        let mut evaluator = two_points();
        evaluator.train_all(LipschitzianParams::new()).unwrap();
        assert_eq!(evaluator.trained_objectives(), vec![0, 1]);

        let err = evaluator
            .train_all(LipschitzianParams::new().lipschitz_constant(-1.))
            .unwrap_err();
        match err {
            ProblemError::ModelTrainingError(failures) => {
                let objectives: Vec<_> = failures.iter().map(|f| f.objective).collect();
                assert_eq!(objectives, vec![0, 1]);
                assert_eq!(failures[1].name, "f2");
            }
            err => panic!("model training error expected, got {err:?}"),
        }
        assert!(evaluator.trained_objectives().is_empty());
        assert_eq!(
            evaluator.trained(),
            HashMap::from([("f1".to_string(), false), ("f2".to_string(), false)])
        );
    }

    #[test]
    fn test_invalid_specs() {
        let mut evaluator = two_points();
        let lip = SurrogateSpec::lipschitzian();
        for specs in [
            vec![ObjectiveModelSpec::new(0, lip.clone())],
            vec![
                ObjectiveModelSpec::new(0, lip.clone()),
                ObjectiveModelSpec::new(0, lip.clone()),
            ],
            vec![
                ObjectiveModelSpec::new(0, lip.clone()),
                ObjectiveModelSpec::new(2, lip.clone()),
            ],
        ] {
            assert!(matches!(
                evaluator.train(&specs),
                Err(ProblemError::ConfigurationError(_))
            ));
        }
        assert!(evaluator.trained_objectives().is_empty());
    }

    #[test]
    fn test_lipschitzian_uncertainty_is_clipped() {
        let dataset = ObjectiveDataset::new(array![[0.], [1.]], array![[0.], [2.]]).unwrap();
        let mut evaluator = DataObjectiveEvaluator::new(dataset).unwrap();
        evaluator
            .train_all(LipschitzianParams::new().lipschitz_constant(1.))
            .unwrap();
        let res = evaluator.evaluate(&array![[0.5]], true).unwrap();
        assert_abs_diff_eq!(res.objectives[[0, 0]], 1., epsilon = 1e-12);
        assert_eq!(res.uncertainty[[0, 0]], 0.);
    }

    #[test]
    fn test_gp_sum_prod() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut evaluator = sum_prod();
        evaluator.train_all(GpSurrogateParams::default()).unwrap();
        assert!(evaluator.trained().values().all(|trained| *trained));

        let res = evaluator.evaluate(&array![[0.5, 0.3]], true).unwrap();
        assert_abs_diff_eq!(res.objectives, array![[0.8, 0.15]], epsilon = 1e-3);
        assert_eq!(res.fitness, res.objectives);
        assert!(res.uncertainty.iter().all(|u| *u >= 0.));

        let xlimits = array![[0., 1.], [0., 1.]];
        let query = Random::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(7))
            .sample(50);
        let res = evaluator.evaluate(&query, true).unwrap();
        assert!(res.uncertainty.iter().all(|u| *u >= 0.));
    }

    #[test]
    fn test_mixed_surrogates() {
        let mut evaluator = sum_prod();
        evaluator
            .train(&[
                ObjectiveModelSpec::new(1, LipschitzianParams::new()),
                ObjectiveModelSpec::new(0, GpSurrogateParams::default().n_start(2)),
            ])
            .unwrap();
        assert_eq!(evaluator.model(0).unwrap().name(), "GaussianProcess");
        assert_eq!(evaluator.model(1).unwrap().name(), "Lipschitzian");
        let res = evaluator.evaluate(&array![[0.5, 0.3]], true).unwrap();
        assert_abs_diff_eq!(res.objectives[[0, 0]], 0.8, epsilon = 1e-3);
        assert_abs_diff_eq!(res.objectives[[0, 1]], 0.15, epsilon = 1e-1);
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_serde_model_specs() {
        let specs = vec![
            ObjectiveModelSpec::new(0, GpSurrogateParams::default().n_start(2)),
            ObjectiveModelSpec::new(1, LipschitzianParams::new().lipschitz_constant(2.)),
        ];
        let json = serde_json::to_string(&specs).expect("specs serialized");
        let loaded: Vec<ObjectiveModelSpec> = serde_json::from_str(&json).expect("specs deserialized");
        assert_eq!(loaded, specs);
    }
}
