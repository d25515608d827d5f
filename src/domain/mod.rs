// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system works
// with: labelled digit images, validated hyperparameters, the
// error taxonomy, and the seams the workflows program against.
//
// Rules for this layer:
//   - NO burn or linfa types
//   - NO file I/O
//   - Only structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Failure kinds shared by every layer
pub mod error;

// Typed, validated view of the configuration file
pub mod hyperparams;

// A labelled 8×8 digit image
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
