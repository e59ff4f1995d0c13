//! Error handling for task storage and configuration.

use paintshop_core::PaintshopError;
use thiserror::Error;

/// Result type for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

/// Errors that can occur while storing tasks or loading configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CollectError {
    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A task directory already holds different parameters.
    #[error("Parameters of task {0} differ from the stored ones")]
    ParamsMismatch(String),

    /// Task parameters or names that cannot be stored.
    #[error("Invalid task parameters: {0}")]
    InvalidParams(String),

    /// Configuration values failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the paintshop core.
    #[error(transparent)]
    Core(#[from] PaintshopError),
}
