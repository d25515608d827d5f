// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw digits CSV and tensor batches:
//
//   digits.csv (bundled, or a path)
//       │
//       ▼
//   DigitsLoader      → parses rows into DigitSample values
//       │
//       ▼
//   split_train_test  → seeded 80/20 partition
//       │
//       ▼
//   DigitsDataset     → implements burn's Dataset trait
//       │
//       ▼
//   DigitBatcher      → stacks samples into tensor batches
//
// The L-BFGS solver skips the last two steps; it takes the
// whole training partition as one ndarray matrix.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads the bundled digits or a CSV override
pub mod loader;

/// In-memory dataset implementing burn's Dataset trait
pub mod dataset;

/// Implements burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and train/test split
pub mod splitter;
