use paretobox_surrogate::SurrogateError;
use std::fmt;
use thiserror::Error;

/// A result type for problem definition and evaluation
pub type Result<T> = std::result::Result<T, ProblemError>;

/// A surrogate training failure of one objective
#[derive(Debug)]
pub struct TrainingFailure {
    /// Index of the objective
    pub objective: usize,
    /// Name of the objective
    pub name: String,
    /// Underlying regression error
    pub cause: SurrogateError,
}

impl fmt::Display for TrainingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{}): {}", self.name, self.objective, self.cause)
    }
}

fn join_failures(failures: &[TrainingFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// An error when defining, training or evaluating a problem
#[derive(Error, Debug)]
pub enum ProblemError {
    /// When construction inputs are malformed or inconsistent
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
    /// When a decision vector does not have the expected number of variables
    #[error("Dimension mismatch: expected {expected} variables, got {actual}")]
    DimensionMismatchError {
        /// Number of variables of the problem
        expected: usize,
        /// Length of the given vector
        actual: usize,
    },
    /// When surrogate evaluation is requested for untrained objectives
    #[error("Surrogate models not trained for objectives: {}", .0.join(", "))]
    ModelNotTrainedError(Vec<String>),
    /// When surrogate training fails for some objectives
    #[error("Surrogate training failed for {}", join_failures(.0))]
    ModelTrainingError(Vec<TrainingFailure>),
    /// When decision variable values are out of bounds
    #[error("Bounds violation: {0}")]
    BoundsViolationError(String),
    /// When a value is invalid
    #[error("Value error: {0}")]
    InvalidValueError(String),
    /// When a surrogate error occurs
    #[error(transparent)]
    SurrogateError(#[from] SurrogateError),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When csv data read fails
    #[error(transparent)]
    CsvError(#[from] csv::Error),
}
