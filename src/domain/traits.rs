// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Two seams separate the workflows from concrete collaborators:
//
//   SampleSource  — anything that yields labelled digit images
//                   (the bundled CSV, a CSV on disk, a test fixture)
//
//   Classifier    — anything fitted that maps pixels → digit labels
//                   (linfa L-BFGS model, burn softmax regression)
//
// The application layer only talks to these traits, so the
// workflows read the same whichever solver produced the model.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sample::DigitSample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
pub trait SampleSource {
    /// Load every labelled sample from this source, in source order.
    fn load_all(&self) -> Result<Vec<DigitSample>>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted multiclass classifier.
pub trait Classifier {
    /// One predicted label per input row, in input order.
    fn predict(&self, samples: &[DigitSample]) -> Result<Vec<usize>>;

    /// Fraction of rows whose predicted label equals the true label.
    fn score(&self, samples: &[DigitSample]) -> Result<f64> {
        if samples.is_empty() {
            return Ok(0.0);
        }
        let predictions = self.predict(samples)?;
        let correct = predictions
            .iter()
            .zip(samples)
            .filter(|(p, s)| **p == s.label)
            .count();
        Ok(correct as f64 / samples.len() as f64)
    }
}
