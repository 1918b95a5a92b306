//! K-fold partitioning and cross-validation with micro/macro averaging.

use serde::Serialize;
use tracing::Level;

use crate::classifier::Classifier;
use crate::data::Dataset;
use crate::error::{EvalError, EvalResult};
use crate::report::Reporter;
use crate::stats::{Metrics, OutcomeRecorder, PrecisionRecall, StatsSummary};

use super::evaluate::Accumulators;
use super::train::train_and_test;

/// One fold: the test slice and everything else as training data.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub fold: usize,
    pub train: Dataset,
    pub test: Dataset,
}

/// Split `dataset` into `folds` contiguous partitions.
///
/// Fold `i` tests on `[i*n/k, (i+1)*n/k)`. Every sample lands in exactly one
/// test slice.
pub fn partitions(dataset: &Dataset, folds: usize) -> EvalResult<Vec<Partition>> {
    let n = dataset.len();
    if folds == 0 || folds > n {
        return Err(EvalError::invalid_input(format!(
            "cannot split {n} samples into {folds} folds"
        )));
    }

    let subset = |samples: Vec<_>| Dataset {
        samples,
        all_classes: dataset.all_classes.clone(),
    };

    Ok((0..folds)
        .map(|fold| {
            let start = fold * n / folds;
            let end = (fold + 1) * n / folds;
            let test = dataset.samples[start..end].to_vec();
            let train = dataset.samples[..start]
                .iter()
                .chain(&dataset.samples[end..])
                .cloned()
                .collect();
            Partition {
                fold,
                train: subset(train),
                test: subset(test),
            }
        })
        .collect())
}

/// Outcome of a cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidation {
    pub folds: usize,
    /// Every test case of every fold pooled into one recorder.
    pub micro: StatsSummary,
    /// Per-fold metrics summed and divided by the fold count.
    pub macro_avg: Metrics,
    pub per_fold: Vec<StatsSummary>,
}

/// Train and test a fresh classifier on each fold.
pub fn cross_validate<F, C>(
    mut factory: F,
    dataset: &Dataset,
    folds: usize,
    verbosity: u8,
    reporter: &mut dyn Reporter,
) -> EvalResult<CrossValidation>
where
    F: FnMut() -> C,
    C: Classifier,
{
    let parts = partitions(dataset, folds)?;
    let mut micro = PrecisionRecall::new();
    let mut macro_sum = StatsSummary::default();
    let mut per_fold = Vec::with_capacity(folds);

    for part in &parts {
        if verbosity > 0 {
            reporter.report(Level::INFO, &format!("fold {}/{}", part.fold + 1, folds));
        }
        let stats: PrecisionRecall = train_and_test(
            &mut factory,
            &part.train,
            &part.test,
            verbosity,
            reporter,
            Accumulators::new(Some(&mut micro), Some(&mut macro_sum)),
        )?;
        per_fold.push(stats.full_stats());
    }

    micro.calculate_stats();
    let result = CrossValidation {
        folds,
        micro: micro.full_stats(),
        macro_avg: macro_sum.averaged(folds),
        per_fold,
    };
    if verbosity > 0 {
        reporter.report(
            Level::INFO,
            &format!("MICRO AVERAGE: {}", micro.short_stats()),
        );
        let m = &result.macro_avg;
        reporter.report(
            Level::INFO,
            &format!(
                "MACRO AVERAGE: Accuracy={:.3} HammingGain={:.3} Precision={:.3} Recall={:.3} F1={:.3}",
                m.accuracy, m.hamming_gain, m.precision, m.recall, m.f1
            ),
        );
    }
    Ok(result)
}
