// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles the concerns both workflows share but that don't
// belong to any one of them:
//
//   config_loader.rs — Reads the hyperparameter JSON file
//                      into an untyped mapping.
//
//   checkpoint.rs    — ModelStore: writes the fitted model as a
//                      single bincode artifact and rebuilds it
//                      for inference.
//
//   metrics.rs       — Accuracy, F1 and the per-class
//                      classification report.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Hyperparameter file loading
pub mod config_loader;

/// Model artifact saving and loading
pub mod checkpoint;

/// Classification metrics and report
pub mod metrics;
