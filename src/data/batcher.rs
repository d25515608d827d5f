// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements burn's Batcher trait to stack a Vec<DigitSample>
// into the two tensors a softmax-regression step needs.
//
// How batching works here:
//   Input:  N samples, each with F pixel values
//   Output: features [N, F] (float), targets [N] (int)
//
//   All pixel rows are flattened into one Vec<f32>:
//   [s1_p1, s1_p2, ..., s1_pF, s2_p1, ..., sN_pF] → [N, F]
//
// The `label` of each sample is expected to already be a class
// *index* (0..n_classes), which is what cross-entropy wants.
// The trainer encodes labels before building the dataset.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::sample::DigitSample;

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A mini-batch ready for the forward pass.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Pixel intensities, shape [batch_size, n_features]
    pub features: Tensor<B, 2>,

    /// Class indices, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct DigitBatcher;

impl DigitBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, DigitSample, DigitBatch<B>> for DigitBatcher {
    fn batch(&self, items: Vec<DigitSample>, device: &B::Device) -> DigitBatch<B> {
        let features = features_tensor::<B>(&items, device);

        let targets: Vec<i64> = items.iter().map(|s| s.label as i64).collect();
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(targets, [items.len()]),
            device,
        );

        DigitBatch { features, targets }
    }
}

/// Stack sample pixels into a [rows, n_features] float tensor.
/// Also used at prediction time, where labels are irrelevant.
pub fn features_tensor<B: Backend>(samples: &[DigitSample], device: &B::Device) -> Tensor<B, 2> {
    let rows       = samples.len();
    let n_features = samples.first().map_or(0, DigitSample::n_features);

    let flat: Vec<f32> = samples
        .iter()
        .flat_map(|s| s.pixels.iter().copied())
        .collect();

    Tensor::<B, 2>::from_data(TensorData::new(flat, [rows, n_features]), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let items = vec![
            DigitSample::new(vec![0.0, 1.0, 2.0], 0),
            DigitSample::new(vec![3.0, 4.0, 5.0], 2),
        ];

        let batch: DigitBatch<TestBackend> = DigitBatcher::new().batch(items, &device);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2]);

        let targets = batch.targets.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(targets, vec![0, 2]);
    }

    #[test]
    fn test_features_are_row_major() {
        let device = Default::default();
        let samples = vec![
            DigitSample::new(vec![1.0, 2.0], 0),
            DigitSample::new(vec![3.0, 4.0], 0),
        ];
        let t = features_tensor::<TestBackend>(&samples, &device);
        let values = t.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
