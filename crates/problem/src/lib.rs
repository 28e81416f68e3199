//! This library implements multiobjective problem definitions, either analytical or
//! known only through data.
//!
//! A [DataProblem] stores a dataset of evaluated decision vectors. Any decision vector
//! is evaluated by looking up the nearest stored one or, once objective surrogates are
//! trained (see [paretobox_surrogate]), by predicting each objective together with an
//! uncertainty estimate.
//!
//! A [MOProblem] evaluates analytical objectives ([ScalarObjective], [VectorObjective])
//! over bounded [Variable]s with optional [ScalarConstraint]s.
//!
//! Solvers see both through the [Problem] trait which evaluates a batch of decision
//! vectors into [EvaluationResults].
//!
//! # Example
//!
//! ```no_run
//! use ndarray::array;
//! use paretobox_problem::{DataProblem, ObjectiveDataset, Problem};
//! use paretobox_surrogate::GpSurrogateParams;
//!
//! let dataset = ObjectiveDataset::new(
//!     array![[0., 0.], [1., 0.], [0., 1.], [1., 1.], [0.5, 0.5]],
//!     array![[0., 0.], [1., 0.], [1., 0.], [2., 1.], [1., 0.25]],
//! )
//! .expect("valid dataset");
//! let mut problem = DataProblem::new(dataset).expect("data problem");
//!
//! // nearest stored sample lookup
//! let res = problem.evaluate(&array![[0.4, 0.4]].view()).expect("lookup");
//!
//! // surrogate predictions
//! problem.train_all(GpSurrogateParams::default()).expect("GP training");
//! problem.set_surrogate_evaluation(true);
//! let res = problem.evaluate(&array![[0.4, 0.4]].view()).expect("prediction");
//! println!("f = {}, uncertainty = {}", res.objectives, res.uncertainty);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod constraint;
mod data_objective;
mod data_problem;
mod dataset;
mod errors;
mod objective;
mod problem;
mod types;
mod variable;

pub use constraint::*;
pub use data_objective::*;
pub use data_problem::*;
pub use dataset::*;
pub use errors::*;
pub use objective::*;
pub use problem::Problem;
pub use problem::MOProblem;
pub use types::*;
pub use variable::*;
