use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::errors::PersistenceError;
use crate::history::TrialHistory;
use crate::registry::ClassifierFamily;

/// Default directory search artifacts are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "artifacts";

/// Artifact filename for a classifier family. Deterministic, so repeated
/// runs for the same family overwrite rather than accumulate.
pub fn artifact_name(family: ClassifierFamily) -> String {
    format!("{family}_results.json")
}

/// Writes the trial history under [`DEFAULT_OUTPUT_DIR`], creating the
/// directory if absent. Only configurations and scores are durable; a failure
/// here does not invalidate the in-memory search outcome.
pub fn persist(
    family: ClassifierFamily,
    history: &TrialHistory,
) -> Result<PathBuf, PersistenceError> {
    persist_to(DEFAULT_OUTPUT_DIR, family, history)
}

/// [`persist`] with an explicit output directory.
pub fn persist_to(
    dir: impl AsRef<Path>,
    family: ClassifierFamily,
    history: &TrialHistory,
) -> Result<PathBuf, PersistenceError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(artifact_name(family));
    let writer = File::options()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)?;
    serde_json::to_writer_pretty(writer, history)?;
    log::debug!("wrote {} trials to {}", history.len(), path.display());
    Ok(path)
}

/// Reads a previously persisted trial history.
pub fn load_history(path: impl AsRef<Path>) -> Result<TrialHistory, PersistenceError> {
    let reader = File::open(path)?;
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::TrialRecord;
    use crate::space::{Configuration, ParamValue, SearchSpace};

    fn sample_history() -> TrialHistory {
        let space = SearchSpace::new().add_f64("C", 0.0, 100.0);
        let mut history = TrialHistory::new(space);
        for (iteration, score) in [0.8, 0.3, 0.5].into_iter().enumerate() {
            history.push(TrialRecord {
                iteration,
                params: Configuration::from_entries(vec![(
                    "C".into(),
                    ParamValue::Float(iteration as f64 * 10.0),
                )]),
                score,
            });
        }
        history
    }

    #[test]
    fn creates_directory_and_derives_filename() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("artifacts");
        let history = sample_history();
        let path = persist_to(&nested, ClassifierFamily::SupportVector, &history).unwrap();
        assert!(path.ends_with("support_vector_results.json"));
        assert!(path.is_file());
    }

    #[test]
    fn repeated_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let history = sample_history();
        let path =
            persist_to(dir.path(), ClassifierFamily::RandomForest, &history).unwrap();
        let first = fs::read(&path).unwrap();
        persist_to(dir.path(), ClassifierFamily::RandomForest, &history).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let history = sample_history();
        let path =
            persist_to(dir.path(), ClassifierFamily::LogisticRegression, &history).unwrap();
        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.space, history.space);
        assert_eq!(loaded.trials, history.trials);
        assert_eq!(loaded.best_score(), Some(0.3));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_history(&missing),
            Err(PersistenceError::Io(_))
        ));
    }
}
