//! Surrogate-driven hyperparameter search for trainable classifiers.
//!
//! Wraps a model and a fixed train/validation split into a minimizable
//! objective (negated ROC-AUC by default), then drives a Gaussian-process
//! surrogate over a mixed continuous/integer/categorical search space until
//! the proposals converge or the budget runs out. Trial histories are
//! serialized per classifier family.

pub mod config;
pub mod errors;
pub mod history;
pub mod model;
pub mod objective;
pub mod persist;
pub mod registry;
pub mod search;
pub mod space;
mod surrogate;

pub use anyhow;

pub use config::SearchConfig;
pub use errors::{
    InvalidConfiguration, ObjectiveError, PersistenceError, TuneError, TuneResult,
};
pub use history::{TrialHistory, TrialRecord};
pub use model::{Estimator, ModelHandle, Preprocessor};
pub use objective::{make_objective, make_objective_with, roc_auc};
pub use persist::{load_history, persist, persist_to, DEFAULT_OUTPUT_DIR};
pub use registry::{ClassifierFamily, SpaceRegistry};
pub use search::{Optimizer, SearchOutcome, StopReason};
pub use space::{Configuration, Domain, ParamDef, ParamValue, Scale, SearchSpace};
