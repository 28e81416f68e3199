//! `paretobox` gathers the building blocks of data-driven multiobjective problems:
//!
//! * [surrogate]: surrogate regression models (Gaussian process, Lipschitzian regression)
//!   predicting an objective value together with an uncertainty estimate,
//! * [problem]: datasets of evaluated decision vectors, the data objective evaluator
//!   (nearest sample lookup or surrogate predictions) and problem definitions
//!   evaluated by multiobjective solvers.
//!
//! # Example
//!
//! ```no_run
//! use paretobox::prelude::*;
//! use ndarray::array;
//!
//! let dataset = ObjectiveDataset::from_records(&[
//!     (vec![0., 0.], vec![0., 0.]),
//!     (vec![1., 1.], vec![2., 1.]),
//! ])
//! .expect("valid dataset");
//! let evaluator = DataObjectiveEvaluator::new(dataset).expect("evaluator");
//! let res = evaluator.evaluate(&array![[0.4, 0.4]], false).expect("lookup");
//! assert_eq!(res.objectives, array![[0., 0.]]);
//! ```
//!
//! # Features
//!
//! * `serializable`: serde serialization of parameters, datasets, results and trained models,
//! * `persistent`: json save/load of trained surrogate models,
//! * `blas`: BLAS/LAPACK backend for Gaussian process computations.
#![warn(missing_docs)]

pub use paretobox_problem as problem;
pub use paretobox_surrogate as surrogate;

/// Common imports
pub mod prelude {
    pub use paretobox_problem::{
        DataObjectiveEvaluator, DataProblem, EvaluationResults, MOProblem, ObjectiveDataset,
        ObjectiveModelSpec, Problem, ProblemError,
    };
    pub use paretobox_surrogate::{
        GpSurrogateParams, LipschitzianParams, Surrogate, SurrogateModel, SurrogateSpec,
    };
}
