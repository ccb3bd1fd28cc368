use serde::{Deserialize, Serialize};

use crate::space::{Configuration, SearchSpace};

/// One evaluated trial: the configuration, its score, and the evaluation
/// order it arrived in. Appended to the history, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    pub iteration: usize,
    pub params: Configuration,
    pub score: f64,
}

/// Append-only record of one search, in evaluation order, plus the running
/// best. Owned by a single search; handed to persistence on completion.
///
/// The running best is not serialized; a stored artifact is chronological
/// and the best is derivable by scanning, which `best()` falls back to for
/// deserialized histories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialHistory {
    pub space: SearchSpace,
    pub trials: Vec<TrialRecord>,
    #[serde(skip)]
    best: Option<usize>,
}

impl TrialHistory {
    pub fn new(space: SearchSpace) -> Self {
        Self {
            space,
            trials: Vec::new(),
            best: None,
        }
    }

    pub fn push(&mut self, record: TrialRecord) {
        let improved = match self.best {
            None => true,
            Some(index) => record.score < self.trials[index].score,
        };
        if improved {
            self.best = Some(self.trials.len());
        }
        self.trials.push(record);
    }

    /// The minimum-score trial, first-come on ties.
    pub fn best(&self) -> Option<&TrialRecord> {
        match self.best {
            Some(index) => self.trials.get(index),
            None => self
                .trials
                .iter()
                .min_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best().map(|record| record.score)
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::ParamValue;

    fn record(iteration: usize, score: f64) -> TrialRecord {
        TrialRecord {
            iteration,
            params: Configuration::from_entries(vec![(
                "x".into(),
                ParamValue::Float(iteration as f64),
            )]),
            score,
        }
    }

    fn space() -> SearchSpace {
        SearchSpace::new().add_f64("x", 0.0, 100.0)
    }

    #[test]
    fn best_is_none_when_empty() {
        assert!(TrialHistory::new(space()).best().is_none());
    }

    #[test]
    fn push_tracks_running_best() {
        let mut history = TrialHistory::new(space());
        history.push(record(0, 0.4));
        history.push(record(1, 0.7));
        history.push(record(2, 0.1));
        history.push(record(3, 0.3));
        let best = history.best().unwrap();
        assert_eq!(best.iteration, 2);
        assert_eq!(history.best_score(), Some(0.1));
    }

    #[test]
    fn ties_keep_the_earlier_trial() {
        let mut history = TrialHistory::new(space());
        history.push(record(0, 0.2));
        history.push(record(1, 0.2));
        assert_eq!(history.best().unwrap().iteration, 0);
    }

    #[test]
    fn prefix_best_is_monotonic() {
        let mut history = TrialHistory::new(space());
        let scores = [0.9, 0.5, 0.8, 0.2, 0.6, 0.2, 0.1];
        for (iteration, &score) in scores.iter().enumerate() {
            history.push(record(iteration, score));
        }
        let mut previous = f64::INFINITY;
        for prefix in 1..=history.len() {
            let best = history.trials[..prefix]
                .iter()
                .map(|t| t.score)
                .fold(f64::INFINITY, f64::min);
            assert!(best <= previous);
            previous = best;
        }
    }

    #[test]
    fn deserialized_history_recovers_best_by_scanning() {
        let mut history = TrialHistory::new(space());
        history.push(record(0, 0.4));
        history.push(record(1, 0.1));
        let json = serde_json::to_string(&history).unwrap();
        let loaded: TrialHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.best().unwrap().iteration, 1);
    }
}
