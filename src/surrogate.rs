use friedrich::gaussian_process::{GaussianProcess, GaussianProcessBuilder};
use friedrich::kernel::SquaredExp;
use friedrich::prior::ConstantPrior;

use crate::history::TrialHistory;
use crate::space::SearchSpace;

/// Gaussian-process surrogate over the search space's transformed
/// coordinates. Inputs are kept in the unit cube so the kernel length scale
/// is comparable across dimensions.
pub(crate) struct GpSurrogate {
    gp: GaussianProcess<SquaredExp, ConstantPrior>,
    k: f64,
    intervals: Vec<(f64, f64)>,
    rounded_dims: Vec<usize>,
    acq_iterations: usize,
}

impl GpSurrogate {
    /// Fits a fresh surrogate on every (configuration, score) pair observed
    /// so far. At least one observation is required.
    pub(crate) fn fit(
        space: &SearchSpace,
        history: &TrialHistory,
        k: f64,
        acq_iterations: usize,
    ) -> Self {
        let (training_inputs, training_outputs): (Vec<_>, Vec<_>) = history
            .trials
            .iter()
            .map(|trial| (space.normalize(&space.encode(&trial.params)), trial.score))
            .unzip();

        let gp = GaussianProcessBuilder::<SquaredExp, ConstantPrior>::new(
            training_inputs,
            training_outputs,
        )
        .set_cholesky_epsilon(Some(0.01f64.powi(2)))
        .set_noise(0.01)
        .fit_kernel()
        .fit_prior()
        .train();

        let rounded_dims = space
            .params
            .iter()
            .enumerate()
            .filter(|(_, param)| param.domain.decodes_by_rounding())
            .map(|(index, _)| index)
            .collect();

        Self {
            gp,
            k,
            intervals: space.intervals(),
            rounded_dims,
            acq_iterations,
        }
    }

    /// Folds a new observation into the surrogate. `point` must be in the
    /// unit cube, matching the training inputs.
    pub(crate) fn observe(&mut self, point: &[f64], score: f64) {
        self.gp.add_samples(&point.to_vec(), &score);
    }

    /// Minimizes the acquisition function over the transformed intervals and
    /// returns the proposed point in transformed coordinates.
    pub(crate) fn propose(&self) -> Vec<f64> {
        let acquisition = |input: &[f64]| {
            let mut point = input.to_vec();
            self.blended_bound(&mut point, self.rounded_dims.iter().copied())
        };

        let (_expected, guess) = simplers_optimization::Optimizer::minimize(
            &acquisition,
            &self.intervals,
            self.acq_iterations,
        );
        guess.to_vec()
    }

    /// Lower confidence bound, linearly interpolated over dimensions that
    /// decode by rounding so the acquisition reflects the values actually
    /// evaluated.
    fn blended_bound(
        &self,
        point: &mut Vec<f64>,
        mut rounded: impl Iterator<Item = usize> + Clone,
    ) -> f64 {
        if let Some(index) = rounded.next() {
            let value = point[index];
            if (value.round() - value).abs() < 0.05 {
                return self.blended_bound(point, rounded);
            }
            let lower = value.floor();
            point[index] = lower;
            let at_lower = self.blended_bound(point, rounded.clone());
            point[index] = lower + 1.0;
            let at_upper = self.blended_bound(point, rounded);
            point[index] = value;
            let weight = 1.0 - (value - lower);
            return at_lower * weight + at_upper * (1.0 - weight);
        }

        let normalized = normalize(point, &self.intervals);
        let (mean, variance) = self.gp.predict_mean_variance(&normalized);
        mean - self.k * variance.abs().sqrt()
    }
}

fn normalize(point: &[f64], intervals: &[(f64, f64)]) -> Vec<f64> {
    point
        .iter()
        .zip(intervals)
        .map(|(&x, &(low, high))| {
            if high > low {
                (x - low) / (high - low)
            } else {
                0.0
            }
        })
        .collect()
}
