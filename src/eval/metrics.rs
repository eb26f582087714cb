/// Index of the maximum element in a slice; ties resolve to the first
/// maximal index. 0 for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x > v[best] {
            best = i;
        }
    }
    best
}

/// Classification quality over a labeled evaluation set.
///
/// All per-class vectors are indexed by class; zero-division cases
/// (no predictions or no samples for a class) yield 0.0, matching the usual
/// `zero_division=0` reporting convention.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub n_classes: usize,
    pub total: usize,
    pub correct: usize,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    pub support: Vec<usize>,
    /// confusion[true][predicted], raw counts.
    pub confusion: Vec<Vec<usize>>,
}

impl Metrics {
    /// Builds all metrics from parallel truth/prediction slices.
    pub fn compute(truths: &[usize], predictions: &[usize], n_classes: usize) -> Metrics {
        assert_eq!(truths.len(), predictions.len(), "length mismatch");

        let mut confusion = vec![vec![0usize; n_classes]; n_classes];
        let mut correct = 0usize;
        for (&t, &p) in truths.iter().zip(predictions.iter()) {
            confusion[t][p] += 1;
            if t == p {
                correct += 1;
            }
        }

        let support: Vec<usize> = (0..n_classes).map(|c| confusion[c].iter().sum()).collect();
        let predicted_totals: Vec<usize> = (0..n_classes)
            .map(|c| confusion.iter().map(|row| row[c]).sum())
            .collect();

        let mut precision = vec![0.0; n_classes];
        let mut recall = vec![0.0; n_classes];
        let mut f1 = vec![0.0; n_classes];
        for c in 0..n_classes {
            let tp = confusion[c][c] as f64;
            if predicted_totals[c] > 0 {
                precision[c] = tp / predicted_totals[c] as f64;
            }
            if support[c] > 0 {
                recall[c] = tp / support[c] as f64;
            }
            if precision[c] + recall[c] > 0.0 {
                f1[c] = 2.0 * precision[c] * recall[c] / (precision[c] + recall[c]);
            }
        }

        Metrics {
            n_classes,
            total: truths.len(),
            correct,
            precision,
            recall,
            f1,
            support,
            confusion,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    /// Per-class accuracy: fraction of a class's samples predicted as that
    /// class (identical to recall; reported separately with counts). `None`
    /// for classes with no validation samples.
    pub fn per_class_accuracy(&self, class: usize) -> Option<f64> {
        if self.support[class] == 0 {
            return None;
        }
        Some(self.confusion[class][class] as f64 / self.support[class] as f64)
    }

    /// Row-normalized confusion matrix in percent. A row with no samples is
    /// `None`; every populated row sums to 100 within floating-point error.
    pub fn confusion_percentages(&self) -> Vec<Option<Vec<f64>>> {
        self.confusion
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                if total == 0 {
                    None
                } else {
                    Some(row.iter().map(|&v| v as f64 * 100.0 / total as f64).collect())
                }
            })
            .collect()
    }

    /// Unweighted mean of a per-class metric.
    pub fn macro_avg(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Support-weighted mean of a per-class metric.
    pub fn weighted_avg(&self, values: &[f64]) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        values
            .iter()
            .zip(self.support.iter())
            .map(|(v, &s)| v * s as f64)
            .sum::<f64>()
            / self.total as f64
    }
}
