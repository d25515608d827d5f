// ============================================================
// Layer 6 — Classification Metrics
// ============================================================
// Scores a set of predictions against the true labels:
//
//   accuracy   — fraction of rows predicted exactly right
//   f1_score   — per-class F1, averaged (Macro or Weighted)
//   ClassificationReport
//              — per-class precision / recall / F1 / support
//                plus accuracy, macro avg and weighted avg rows
//
// Per class c (the "positive" class, all others negative):
//   precision = TP / (TP + FP)      0 when c is never predicted
//   recall    = TP / (TP + FN)      0 when c never occurs
//   F1        = 2·P·R / (P + R)     0 when P + R = 0
//
// The classes considered are the sorted union of the labels
// seen in y_true and y_pred. Weighted averages weight each
// class by its support (number of true rows), so a class that
// is only ever predicted contributes nothing to them.
//
// The report renders in the familiar scikit-learn text layout:
//
//                 precision    recall  f1-score   support
//
//              0       1.00      1.00      1.00        33
//              1       0.97      1.00      0.98        28
//            ...
//       accuracy                           0.97       360
//      macro avg       0.97      0.97      0.97       360
//   weighted avg       0.97      0.97      0.97       360
//
// Metrics are printed, never persisted.

use std::fmt;

/// Averaging strategy for multi-class F1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Average {
    /// Unweighted mean over classes
    Macro,
    /// Mean weighted by support (number of true rows per class)
    Weighted,
}

/// Fraction of positions where `y_pred` equals `y_true`; 0 when empty.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    debug_assert_eq!(y_true.len(), y_pred.len(), "label slices must have the same length");
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

pub fn f1_score(y_true: &[usize], y_pred: &[usize], average: Average) -> f64 {
    let per_class = per_class_scores(y_true, y_pred);
    average_of(&per_class, average).f1
}

// ─── Per-class scores ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScores {
    pub label:     usize,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedScores {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

fn per_class_scores(y_true: &[usize], y_pred: &[usize]) -> Vec<ClassScores> {
    let mut labels: Vec<usize> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    labels
        .into_iter()
        .map(|label| {
            let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
            for (&t, &p) in y_true.iter().zip(y_pred) {
                match (t == label, p == label) {
                    (true, true)   => tp += 1,
                    (false, true)  => fp += 1,
                    (true, false)  => fn_ += 1,
                    (false, false) => {}
                }
            }
            let precision = ratio(tp, tp + fp);
            let recall    = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassScores { label, precision, recall, f1, support: tp + fn_ }
        })
        .collect()
}

fn average_of(scores: &[ClassScores], average: Average) -> AveragedScores {
    let weights: Vec<f64> = match average {
        Average::Macro    => vec![1.0; scores.len()],
        Average::Weighted => scores.iter().map(|s| s.support as f64).collect(),
    };
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return AveragedScores { precision: 0.0, recall: 0.0, f1: 0.0 };
    }

    let mean = |value: fn(&ClassScores) -> f64| -> f64 {
        scores.iter().zip(&weights).map(|(s, w)| value(s) * w).sum::<f64>() / total
    };
    AveragedScores {
        precision: mean(|s| s.precision),
        recall:    mean(|s| s.recall),
        f1:        mean(|s| s.f1),
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

// ─── ClassificationReport ─────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes:      Vec<ClassScores>,
    pub accuracy:     f64,
    pub macro_avg:    AveragedScores,
    pub weighted_avg: AveragedScores,
    pub total:        usize,
}

impl ClassificationReport {
    pub fn new(y_true: &[usize], y_pred: &[usize]) -> Self {
        let classes = per_class_scores(y_true, y_pred);
        Self {
            accuracy:     accuracy(y_true, y_pred),
            macro_avg:    average_of(&classes, Average::Macro),
            weighted_avg: average_of(&classes, Average::Weighted),
            total:        y_true.len(),
            classes,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LAST_LINE: &str = "weighted avg";
        let width = self
            .classes
            .iter()
            .map(|c| c.label.to_string().len())
            .max()
            .unwrap_or(0)
            .max(LAST_LINE.len());

        writeln!(f, "{:>width$}  {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;

        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support,
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        for (name, avg) in [("macro avg", &self.macro_avg), (LAST_LINE, &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.total,
            )?;
        }
        Ok(())
    }
}
