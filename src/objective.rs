use crate::errors::ObjectiveError;
use crate::model::ModelHandle;
use crate::space::Configuration;

/// Area under the ROC curve via the tie-corrected rank statistic.
///
/// `labels` are 0/1 class labels, `scores` the positive-class probability
/// estimates. Degenerate inputs with a single class score 0.5.
pub fn roc_auc(labels: &[f64], scores: &[f64]) -> f64 {
    debug_assert_eq!(labels.len(), scores.len());
    let n = labels.len();
    if n == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average ranks over tied scores.
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = rank;
        }
        i = j + 1;
    }

    let positives = labels.iter().filter(|&&y| y > 0.5).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return 0.5;
    }

    let rank_sum: f64 = labels
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y > 0.5)
        .map(|(_, &rank)| rank)
        .sum();
    let u = rank_sum - (positives * (positives + 1)) as f64 / 2.0;
    u / (positives as f64 * negatives as f64)
}

/// Wraps a model handle and a fixed train/validation split into an objective
/// suitable for minimization: each call applies the configuration to the
/// classifier stage, refits, predicts on the validation portion, and returns
/// the negated validation metric.
///
/// The handle is mutated on every call; reusing it across trials avoids
/// reconstruction cost.
pub fn make_objective_with<'a, M>(
    model: &'a mut ModelHandle,
    x_train: &'a [Vec<f64>],
    y_train: &'a [f64],
    x_val: &'a [Vec<f64>],
    y_val: &'a [f64],
    metric: M,
) -> impl FnMut(&Configuration) -> Result<f64, ObjectiveError> + 'a
where
    M: Fn(&[f64], &[f64]) -> f64 + 'a,
{
    move |params| {
        model.apply(params)?;
        model.fit(x_train, y_train).map_err(ObjectiveError::Failed)?;
        let scores = model
            .predict_proba(x_val)
            .map_err(ObjectiveError::Failed)?;
        Ok(-metric(y_val, &scores))
    }
}

/// [`make_objective_with`] specialized to negated ROC-AUC, the default
/// validation metric.
pub fn make_objective<'a>(
    model: &'a mut ModelHandle,
    x_train: &'a [Vec<f64>],
    y_train: &'a [f64],
    x_val: &'a [Vec<f64>],
    y_val: &'a [f64],
) -> impl FnMut(&Configuration) -> Result<f64, ObjectiveError> + 'a {
    make_objective_with(model, x_train, y_train, x_val, y_val, roc_auc)
}
