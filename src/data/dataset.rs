use burn::data::dataset::Dataset;

use crate::domain::error::PipelineError;
use crate::domain::sample::DigitSample;

/// An in-memory collection of labelled digit images.
/// Sequence order is source order; the splitter reorders it.
#[derive(Debug, Clone)]
pub struct DigitsDataset {
    samples: Vec<DigitSample>,
}

impl DigitsDataset {
    pub fn new(samples: Vec<DigitSample>) -> Self { Self { samples } }

    pub fn samples(&self) -> &[DigitSample] { &self.samples }

    /// (rows, features per row)
    pub fn shape(&self) -> (usize, usize) {
        let n_features = self.samples.first().map_or(0, DigitSample::n_features);
        (self.samples.len(), n_features)
    }

    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Distinct labels present, ascending
    pub fn classes(&self) -> Vec<usize> {
        distinct_labels(&self.samples)
    }

    pub fn sample(&self, index: usize) -> Result<&DigitSample, PipelineError> {
        self.samples.get(index).ok_or(PipelineError::IndexOutOfRange {
            index,
            len: self.samples.len(),
        })
    }
}

impl Dataset<DigitSample> for DigitsDataset {
    fn get(&self, index: usize) -> Option<DigitSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Sorted distinct labels of a sample slice
pub fn distinct_labels(samples: &[DigitSample]) -> Vec<usize> {
    let mut classes: Vec<usize> = samples.iter().map(|s| s.label).collect();
    classes.sort_unstable();
    classes.dedup();
    classes
}
