/// Stopping and proposal settings for one search.
///
/// The defaults are deliberate: a 40-trial budget with a 100-trial defensive
/// ceiling, ten uniform seeding trials, and the convergence threshold the
/// search inherits from delta-x stopping (1e-2 in normalized coordinates).
/// Set the ceiling low to bound worst-case wall-clock cost; it is the
/// practical cancellation mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Iteration budget; exhausting it ends the search normally.
    pub budget: u64,
    /// Hard maximum trial count regardless of convergence or budget.
    pub hard_limit: u64,
    /// Uniform random trials evaluated before the surrogate takes over.
    pub init_samples: u64,
    /// Per-iteration probability of sampling uniformly instead of asking the
    /// surrogate.
    pub exploration: f64,
    /// Search stops once two consecutive surrogate proposals lie closer than
    /// this in the normalized space.
    pub convergence_tol: f64,
    /// Exploration weight of the lower-confidence-bound acquisition.
    pub acquisition_k: f64,
    /// Acquisition-minimizer iterations per proposal.
    pub acq_iterations: usize,
    /// Sentinel score recorded when the model rejects a configuration. Must
    /// exceed every legitimate objective value for the rejection to be
    /// unattractive to the surrogate.
    pub invalid_penalty: f64,
    /// Fixed RNG seed; identical seeds reproduce identical trial histories.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: 40,
            hard_limit: 100,
            init_samples: 10,
            exploration: 0.1,
            convergence_tol: 1e-2,
            acquisition_k: 2.0,
            acq_iterations: 100,
            invalid_penalty: 1.0,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_hard_limit(mut self, hard_limit: u64) -> Self {
        self.hard_limit = hard_limit;
        self
    }

    pub fn with_init_samples(mut self, init_samples: u64) -> Self {
        self.init_samples = init_samples;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_convergence_tol(mut self, convergence_tol: f64) -> Self {
        self.convergence_tol = convergence_tol;
        self
    }

    pub fn with_acquisition_k(mut self, acquisition_k: f64) -> Self {
        self.acquisition_k = acquisition_k;
        self
    }

    pub fn with_invalid_penalty(mut self, invalid_penalty: f64) -> Self {
        self.invalid_penalty = invalid_penalty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
