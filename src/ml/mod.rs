// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All model-fitting code lives here: burn for the mini-batch
// solvers, linfa-logistic for L-BFGS.
//
// What's in this layer:
//
//   model.rs      — SoftmaxRegression, a single Linear layer
//                   (64 pixels → one logit per class)
//
//   trainer.rs    — Mini-batch loop for SGD / Adam / RMSProp:
//                   forward pass, L2-penalised cross-entropy,
//                   backward pass, optimiser step
//
//   lbfgs.rs      — Full-batch L-BFGS fit through linfa
//
//   classifier.rs — TrainedClassifier, the fitted model the
//                   workflows predict with and persist
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            linfa-logistic documentation

/// Softmax regression module
pub mod model;

/// Mini-batch training loop
pub mod trainer;

/// L-BFGS logistic regression
pub mod lbfgs;

/// Fitted classifier shared by both workflows
pub mod classifier;
