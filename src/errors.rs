use thiserror::Error;

use crate::space::Configuration;

pub type TuneResult<T> = Result<T, TuneError>;

/// Top-level error type for a hyperparameter search.
///
/// Only `UnknownModelType` and `TrainingFailure` abort a running search;
/// rejected configurations are absorbed by the optimization loop and
/// persistence failures leave the in-memory result intact.
#[derive(Debug, Error)]
pub enum TuneError {
    #[error("no search space registered for model type `{0}`")]
    UnknownModelType(String),

    #[error("invalid search space: {0}")]
    InvalidSpace(String),

    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfiguration),

    #[error("training failed for configuration {parameters}: {source}")]
    TrainingFailure {
        parameters: Configuration,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A proposed configuration cannot be legally applied to the model, e.g. an
/// incompatible solver/parameter combination that the per-dimension bounds do
/// not forbid.
#[derive(Debug, Error)]
#[error("configuration rejected: {reason}")]
pub struct InvalidConfiguration {
    pub reason: String,
}

impl InvalidConfiguration {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure modes of a single objective evaluation.
///
/// `Invalid` is recovered inside the optimization loop by recording a penalty
/// score; `Failed` aborts the whole search as a `TrainingFailure`.
#[derive(Debug, Error)]
pub enum ObjectiveError {
    #[error(transparent)]
    Invalid(#[from] InvalidConfiguration),

    #[error("model training or prediction failed: {0}")]
    Failed(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
