// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits them into:
//   - Training set:   used to fit the classifier
//   - Test set:       held out to measure accuracy / F1
//
// The same seed always yields the same partition, so two
// training runs on the same data evaluate on the same rows.
//
// Partition sizes follow the usual convention:
//   n_test  = ceil(total × test_fraction)
//   n_train = total − n_test
// e.g. 1797 samples, 0.2 → 360 test, 1437 train.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom over a
// StdRng seeded from a u64.
//
// Reference: rand crate documentation (SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` deterministically and split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out, clamped to [0, 1]
/// * `seed`          - RNG seed; equal seeds give equal partitions
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let fraction = test_fraction.clamp(0.0, 1.0);
    let n_test   = ((total as f64) * fraction).ceil() as usize;
    let split_at = total - n_test.min(total);

    // split_off(n) removes elements [n..] and returns them
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        samples.len(),
        test.len(),
        seed,
    );

    (samples, test)
}
