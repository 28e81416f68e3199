use thiserror::Error;

/// A result type for surrogate models
pub type Result<T> = std::result::Result<T, SurrogateError>;

/// An error when training or using a surrogate model
#[derive(Error, Debug)]
pub enum SurrogateError {
    /// When Gaussian Process fails
    #[error("GP error: {0}")]
    GpError(#[from] egobox_gp::GpError),
    /// When parameters are invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When training data or a computed value is invalid
    #[error("InvalidValue error: {0}")]
    InvalidValueError(String),
    /// When prediction points do not match the training input dimension
    #[error("Dimension error: expected {expected} input components, got {actual}")]
    DimensionError {
        /// Input dimension of the trained model
        expected: usize,
        /// Given input dimension
        actual: usize,
    },
    /// When a linfa error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
    /// When error during saving or loading
    #[cfg(feature = "persistent")]
    #[error("Save error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// When error during loading
    #[error("Load IO error")]
    IoError(#[from] std::io::Error),
    /// When error during loading
    #[error("Load error: {0}")]
    LoadError(String),
}
