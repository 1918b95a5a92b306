//! Outcome recording and precision/recall statistics.
//!
//! The harness only talks to the [`OutcomeRecorder`] trait. [`PrecisionRecall`]
//! is the recorder shipped with the crate: it counts true positives, false
//! positives and false negatives over label sets, overall and per label.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Additive merge of one finalized summary into another.
pub trait MergeSummary {
    fn merge_from(&mut self, other: &Self);
}

/// Accumulator fed with (expected, actual) label pairs.
pub trait OutcomeRecorder {
    type Summary: MergeSummary + Serialize;

    /// Record one sample. Returns human-readable explanation lines when
    /// `want_explanations` is set, an empty vector otherwise.
    fn add_cases(
        &mut self,
        expected: &[String],
        actual: &[String],
        want_explanations: bool,
    ) -> Vec<String>;

    /// Compute the derived statistics from the counts seen so far.
    fn calculate_stats(&mut self) -> &mut Self;

    /// One-line summary. Only meaningful after [`calculate_stats`](Self::calculate_stats).
    fn short_stats(&self) -> String;

    fn full_stats(&self) -> Self::Summary;
}

/// Ratios derived from the raw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub hamming_loss: f64,
    pub hamming_gain: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Metrics {
    fn add(&mut self, other: &Metrics) {
        self.accuracy += other.accuracy;
        self.hamming_loss += other.hamming_loss;
        self.hamming_gain += other.hamming_gain;
        self.precision += other.precision;
        self.recall += other.recall;
        self.f1 += other.f1;
    }

    fn scaled(&self, factor: f64) -> Metrics {
        Metrics {
            accuracy: self.accuracy * factor,
            hamming_loss: self.hamming_loss * factor,
            hamming_gain: self.hamming_gain * factor,
            precision: self.precision * factor,
            recall: self.recall * factor,
            f1: self.f1 * factor,
        }
    }
}

/// Counts and scores for a single label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl LabelStats {
    fn finalize(&mut self) {
        self.precision = ratio(self.true_positives, self.true_positives + self.false_positives);
        self.recall = ratio(self.true_positives, self.true_positives + self.false_negatives);
        self.f1 = f1(self.precision, self.recall);
    }
}

/// Full statistics of one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Samples recorded.
    pub count: usize,
    /// Samples whose actual labels matched the expected labels exactly.
    pub exact: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    #[serde(flatten)]
    pub metrics: Metrics,
    pub labels: BTreeMap<String, LabelStats>,
}

impl StatsSummary {
    /// Turn a macro-sum over `runs` summaries into macro-averaged metrics.
    pub fn averaged(&self, runs: usize) -> Metrics {
        if runs == 0 {
            return Metrics::default();
        }
        self.metrics.scaled(1.0 / runs as f64)
    }
}

impl MergeSummary for StatsSummary {
    fn merge_from(&mut self, other: &Self) {
        self.count += other.count;
        self.exact += other.exact;
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
        self.metrics.add(&other.metrics);
        for (label, theirs) in &other.labels {
            let ours = self.labels.entry(label.clone()).or_default();
            ours.true_positives += theirs.true_positives;
            ours.false_positives += theirs.false_positives;
            ours.false_negatives += theirs.false_negatives;
            ours.precision += theirs.precision;
            ours.recall += theirs.recall;
            ours.f1 += theirs.f1;
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Multi-label precision/recall recorder.
///
/// Label lists are compared as sets, so duplicate labels count once.
#[derive(Debug, Clone, Default)]
pub struct PrecisionRecall {
    summary: StatsSummary,
}

impl PrecisionRecall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.summary.count
    }

    pub fn metrics(&self) -> &Metrics {
        &self.summary.metrics
    }
}

impl OutcomeRecorder for PrecisionRecall {
    type Summary = StatsSummary;

    fn add_cases(
        &mut self,
        expected: &[String],
        actual: &[String],
        want_explanations: bool,
    ) -> Vec<String> {
        let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
        let actual: BTreeSet<&str> = actual.iter().map(String::as_str).collect();
        let mut explanations = Vec::new();
        let mut all_true = true;

        for &label in &actual {
            let entry = self.summary.labels.entry(label.to_string()).or_default();
            if expected.contains(label) {
                entry.true_positives += 1;
                self.summary.true_positives += 1;
                if want_explanations {
                    explanations.push(format!("+++ TRUE POSITIVE: {label}"));
                }
            } else {
                entry.false_positives += 1;
                self.summary.false_positives += 1;
                all_true = false;
                if want_explanations {
                    explanations.push(format!("--- FALSE POSITIVE: {label}"));
                }
            }
        }

        for &label in expected.difference(&actual) {
            self.summary
                .labels
                .entry(label.to_string())
                .or_default()
                .false_negatives += 1;
            self.summary.false_negatives += 1;
            all_true = false;
            if want_explanations {
                explanations.push(format!("--- FALSE NEGATIVE: {label}"));
            }
        }

        if all_true {
            self.summary.exact += 1;
            if want_explanations {
                explanations.push("*** ALL TRUE!".to_string());
            }
        }
        self.summary.count += 1;
        explanations
    }

    fn calculate_stats(&mut self) -> &mut Self {
        let s = &mut self.summary;
        let errors = s.false_negatives + s.false_positives;
        let expected_total = s.false_negatives + s.true_positives;
        let hamming_loss = if expected_total == 0 {
            if errors == 0 { 0.0 } else { 1.0 }
        } else {
            errors as f64 / expected_total as f64
        };
        let precision = ratio(s.true_positives, s.true_positives + s.false_positives);
        let recall = ratio(s.true_positives, expected_total);
        s.metrics = Metrics {
            accuracy: ratio(s.exact, s.count),
            hamming_loss,
            hamming_gain: 1.0 - hamming_loss,
            precision,
            recall,
            f1: f1(precision, recall),
        };
        for label in s.labels.values_mut() {
            label.finalize();
        }
        self
    }

    fn short_stats(&self) -> String {
        let s = &self.summary;
        let m = &s.metrics;
        let mut out = String::new();
        let _ = write!(
            out,
            "Accuracy={:.3} ({}/{}) HammingGain={:.3} Precision={:.3} Recall={:.3} F1={:.3}",
            m.accuracy, s.exact, s.count, m.hamming_gain, m.precision, m.recall, m.f1
        );
        out
    }

    fn full_stats(&self) -> StatsSummary {
        self.summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let mut pr = PrecisionRecall::new();
        let explanations = pr.add_cases(&labels(&["A"]), &labels(&["A"]), false);
        assert!(explanations.is_empty());
        pr.calculate_stats();
        assert_eq!(
            pr.short_stats(),
            "Accuracy=1.000 (1/1) HammingGain=1.000 Precision=1.000 Recall=1.000 F1=1.000"
        );
    }

    #[test]
    fn test_partial_match_counts() {
        let mut pr = PrecisionRecall::new();
        pr.add_cases(&labels(&["A", "B"]), &labels(&["B", "C"]), false);
        let summary = pr.calculate_stats().full_stats();
        assert_eq!(summary.true_positives, 1);
        assert_eq!(summary.false_positives, 1);
        assert_eq!(summary.false_negatives, 1);
        assert_eq!(summary.exact, 0);
        assert_eq!(summary.metrics.precision, 0.5);
        assert_eq!(summary.metrics.recall, 0.5);
        assert_eq!(summary.metrics.hamming_loss, 1.0);
        assert_eq!(summary.labels["A"].false_negatives, 1);
        assert_eq!(summary.labels["C"].false_positives, 1);
        assert_eq!(summary.labels["B"].f1, 1.0);
    }

    #[test]
    fn test_explanations_only_on_request() {
        let mut pr = PrecisionRecall::new();
        assert!(pr.add_cases(&labels(&["A"]), &labels(&["B"]), false).is_empty());
        let lines = pr.add_cases(&labels(&["A", "B"]), &labels(&["B", "C"]), true);
        assert_eq!(
            lines,
            vec![
                "+++ TRUE POSITIVE: B",
                "--- FALSE POSITIVE: C",
                "--- FALSE NEGATIVE: A",
            ]
        );
        let lines = pr.add_cases(&labels(&["A"]), &labels(&["A"]), true);
        assert_eq!(lines, vec!["+++ TRUE POSITIVE: A", "*** ALL TRUE!"]);
    }

    #[test]
    fn test_duplicates_count_once() {
        let mut pr = PrecisionRecall::new();
        pr.add_cases(&labels(&["A", "A"]), &labels(&["A"]), false);
        let summary = pr.calculate_stats().full_stats();
        assert_eq!(summary.true_positives, 1);
        assert_eq!(summary.exact, 1);
    }

    #[test]
    fn test_empty_recorder_is_all_zero() {
        let mut pr = PrecisionRecall::new();
        let summary = pr.calculate_stats().full_stats();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.metrics.accuracy, 0.0);
        assert_eq!(summary.metrics.hamming_gain, 1.0);
        assert!(summary.labels.is_empty());
    }

    #[test]
    fn test_false_positive_without_expected_labels() {
        let mut pr = PrecisionRecall::new();
        pr.add_cases(&[], &labels(&["X"]), false);
        let metrics = *pr.calculate_stats().metrics();
        assert_eq!(metrics.hamming_loss, 1.0);
        assert_eq!(metrics.hamming_gain, 0.0);
        assert_eq!(metrics.precision, 0.0);
    }

    #[test]
    fn test_merge_adds_fields_and_labels() {
        let mut a = PrecisionRecall::new();
        a.add_cases(&labels(&["A"]), &labels(&["A"]), false);
        let mut b = PrecisionRecall::new();
        b.add_cases(&labels(&["B"]), &labels(&["A"]), false);
        let a = a.calculate_stats().full_stats();
        let b = b.calculate_stats().full_stats();

        let mut sum = StatsSummary::default();
        sum.merge_from(&a);
        sum.merge_from(&b);
        assert_eq!(sum.count, 2);
        assert_eq!(sum.exact, 1);
        assert_eq!(sum.metrics.accuracy, 1.0);
        assert_eq!(sum.labels["A"].true_positives, 1);
        assert_eq!(sum.labels["A"].false_positives, 1);
        assert_eq!(sum.labels["B"].false_negatives, 1);
        assert_eq!(sum.averaged(2).accuracy, 0.5);
        assert_eq!(sum.averaged(0), Metrics::default());
    }

    #[test]
    fn test_summary_serializes_flat_metrics() {
        let mut pr = PrecisionRecall::new();
        pr.add_cases(&labels(&["A"]), &labels(&["A"]), false);
        pr.add_cases(&labels(&["B"]), &labels(&["C"]), false);
        let value = serde_json::to_value(pr.calculate_stats().full_stats()).unwrap();
        assert_eq!(value["accuracy"], 0.5);
        assert_eq!(value["true_positives"], 1);
        assert_eq!(value["false_positives"], 1);
        assert_eq!(value["false_negatives"], 1);
        assert!(value.get("metrics").is_none());
        assert_eq!(value["labels"]["A"]["true_positives"], 1);
        assert_eq!(value["labels"]["B"]["false_negatives"], 1);
        assert_eq!(value["labels"]["C"]["false_positives"], 1);
    }
}
