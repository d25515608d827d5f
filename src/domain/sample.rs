// ============================================================
// Layer 3 — DigitSample Domain Type
// ============================================================
// One labelled example from the digits collection:
//   - 64 pixel intensities (a flattened 8×8 image, values 0..=16)
//   - the digit it depicts (0..=9)
//
// Example (row 0 of the bundled data, a handwritten "0"):
//   . . 5 13 9 1 . .
//   . . 13 15 10 15 5 .
//   ...
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Number of pixel features per image (8 × 8)
pub const PIXELS_PER_IMAGE: usize = 64;

/// A single labelled image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitSample {
    /// Row-major pixel intensities
    pub pixels: Vec<f32>,

    /// The digit class, 0..=9 for the bundled data
    pub label: usize,
}

impl DigitSample {
    pub fn new(pixels: Vec<f32>, label: usize) -> Self {
        Self { pixels, label }
    }

    pub fn n_features(&self) -> usize {
        self.pixels.len()
    }
}
