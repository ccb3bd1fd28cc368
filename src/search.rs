use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SearchConfig;
use crate::errors::{ObjectiveError, TuneError, TuneResult};
use crate::history::{TrialHistory, TrialRecord};
use crate::space::{Configuration, SearchSpace};
use crate::surrogate::GpSurrogate;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Consecutive surrogate proposals collapsed onto one neighborhood.
    Converged,
    /// The iteration budget ran out.
    BudgetExhausted,
    /// The defensive hard ceiling was hit.
    CeilingReached,
}

/// Result of a completed search: the minimum-score configuration, the full
/// chronological trial history, and why the loop stopped.
#[derive(Debug)]
pub struct SearchOutcome {
    pub best_params: Configuration,
    pub best_score: f64,
    pub stop_reason: StopReason,
    pub history: TrialHistory,
}

/// Drives the propose, evaluate, and update cycle over one objective.
///
/// Each `run` is a fresh search from an empty history: uniform seeding first,
/// then surrogate proposals with an exploration probability, until the
/// convergence criterion, the budget, or the hard ceiling ends it. Rejected
/// configurations are recorded with the penalty score and the search keeps
/// going; any other objective failure aborts the run.
pub struct Optimizer<F> {
    objective: F,
}

impl<F> Optimizer<F>
where
    F: FnMut(&Configuration) -> Result<f64, ObjectiveError>,
{
    pub fn new(objective: F) -> Self {
        Self { objective }
    }

    pub fn run(mut self, space: &SearchSpace, config: &SearchConfig) -> TuneResult<SearchOutcome> {
        space.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let budget = config.budget.max(1);
        let hard_limit = config.hard_limit.max(1);
        let init_samples = config.init_samples.max(1);

        let mut history = TrialHistory::new(space.clone());
        let mut surrogate: Option<GpSurrogate> = None;
        let mut last_proposal: Option<Vec<f64>> = None;

        let stop_reason = loop {
            let evaluated = history.len() as u64;
            if evaluated >= budget {
                break StopReason::BudgetExhausted;
            }
            if evaluated >= hard_limit {
                break StopReason::CeilingReached;
            }

            let exploring =
                evaluated < init_samples || rng.gen::<f64>() < config.exploration;
            let params = if exploring {
                space.sample(&mut rng)
            } else {
                let proposer = surrogate.get_or_insert_with(|| {
                    GpSurrogate::fit(
                        space,
                        &history,
                        config.acquisition_k,
                        config.acq_iterations,
                    )
                });
                space.decode(&proposer.propose())
            };
            let point = space.normalize(&space.encode(&params));

            log::debug!("trial {}/{}: {}", evaluated + 1, budget, params);
            let score = match (self.objective)(&params) {
                Ok(score) => score,
                Err(ObjectiveError::Invalid(rejection)) => {
                    log::warn!("trial {}: {rejection}", evaluated + 1);
                    config.invalid_penalty
                }
                Err(ObjectiveError::Failed(source)) => {
                    return Err(TuneError::TrainingFailure {
                        parameters: params,
                        source,
                    });
                }
            };

            if let Some(proposer) = surrogate.as_mut() {
                proposer.observe(&point, score);
            }
            history.push(TrialRecord {
                iteration: history.len(),
                params,
                score,
            });

            if !exploring {
                if let Some(previous) = &last_proposal {
                    let moved = euclidean(previous, &point);
                    if moved < config.convergence_tol {
                        log::debug!("proposals converged (moved {moved:.2e})");
                        last_proposal = Some(point);
                        break StopReason::Converged;
                    }
                }
                last_proposal = Some(point);
            }
        };

        let best = history
            .best()
            .expect("search evaluates at least one trial");
        let best_params = best.params.clone();
        let best_score = best.score;
        log::info!(
            "search finished after {} trials ({stop_reason:?}): best score {best_score:.6} at {best_params}",
            history.len(),
        );

        Ok(SearchOutcome {
            best_params,
            best_score,
            stop_reason,
            history,
        })
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InvalidConfiguration;

    fn space() -> SearchSpace {
        SearchSpace::new().add_f64("x", 0.0, 1.0)
    }

    #[test]
    fn empty_space_is_rejected() {
        let result = Optimizer::new(|_: &Configuration| Ok(0.0))
            .run(&SearchSpace::new(), &SearchConfig::default());
        assert!(matches!(result, Err(TuneError::InvalidSpace(_))));
    }

    #[test]
    fn budget_bounds_the_trial_count() {
        let config = SearchConfig::default()
            .with_budget(7)
            .with_init_samples(7)
            .with_seed(1);
        let outcome = Optimizer::new(|c: &Configuration| Ok(c.get("x").unwrap().to_f64()))
            .run(&space(), &config)
            .unwrap();
        assert_eq!(outcome.history.len(), 7);
        assert_eq!(outcome.stop_reason, StopReason::BudgetExhausted);
    }

    #[test]
    fn hard_ceiling_caps_a_larger_budget() {
        let config = SearchConfig::default()
            .with_budget(50)
            .with_hard_limit(5)
            .with_init_samples(5)
            .with_seed(1);
        let outcome = Optimizer::new(|c: &Configuration| Ok(c.get("x").unwrap().to_f64()))
            .run(&space(), &config)
            .unwrap();
        assert_eq!(outcome.history.len(), 5);
        assert_eq!(outcome.stop_reason, StopReason::CeilingReached);
    }

    #[test]
    fn best_is_the_minimum_score_trial() {
        let config = SearchConfig::default()
            .with_budget(12)
            .with_init_samples(12)
            .with_seed(9);
        let outcome = Optimizer::new(|c: &Configuration| Ok(c.get("x").unwrap().to_f64()))
            .run(&space(), &config)
            .unwrap();
        let scanned = outcome
            .history
            .trials
            .iter()
            .map(|t| t.score)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.best_score, scanned);
    }

    #[test]
    fn rejections_are_recorded_with_the_penalty() {
        let config = SearchConfig::default()
            .with_budget(6)
            .with_init_samples(6)
            .with_invalid_penalty(5.0)
            .with_seed(3);
        let mut calls = 0usize;
        let outcome = Optimizer::new(|c: &Configuration| {
            calls += 1;
            if calls % 2 == 0 {
                Err(InvalidConfiguration::new("every other call").into())
            } else {
                Ok(c.get("x").unwrap().to_f64())
            }
        })
        .run(&space(), &config)
        .unwrap();
        assert_eq!(outcome.history.len(), 6);
        let penalized = outcome
            .history
            .trials
            .iter()
            .filter(|t| t.score == 5.0)
            .count();
        assert_eq!(penalized, 3);
        assert!(outcome.best_score < 5.0);
    }

    #[test]
    fn training_failure_aborts_with_the_configuration_attached() {
        let config = SearchConfig::default().with_budget(6).with_seed(3);
        let result = Optimizer::new(|_: &Configuration| {
            Err(ObjectiveError::Failed(anyhow::anyhow!("out of memory")))
        })
        .run(&space(), &config);
        match result {
            Err(TuneError::TrainingFailure { parameters, .. }) => {
                assert!(parameters.get("x").is_some());
            }
            other => panic!("expected TrainingFailure, got {other:?}"),
        }
    }
}
