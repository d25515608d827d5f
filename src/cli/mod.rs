// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// this layer only turns the returned reports into text.
//
// Two commands are supported:
//   1. `train` — fits the classifier and saves the artifact
//   2. `infer` — loads the artifact and evaluates it
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InferArgs, TrainArgs};

use crate::application::{
    infer_use_case::{InferOutcome, InferUseCase, InferenceReport},
    train_use_case::{TrainSummary, TrainUseCase},
};

#[derive(Parser, Debug)]
#[command(
    name = "digits-mlops",
    version,
    about = "Train a logistic-regression digits classifier, then evaluate the saved model."
)]
pub struct Cli {
    /// The subcommand to run (train or infer)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Infer(args) => run_infer(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training with config '{}'", args.config.display());

    let summary = TrainUseCase::new(args.into()).execute()?;
    tracing::info!(
        "{} fitted on {} rows, evaluated on {}",
        summary.hyperparameters.solver, summary.n_train, summary.n_test,
    );
    print!("{}", render_train(&summary));
    Ok(())
}

/// A missing artifact is reported and treated as success.
fn run_infer(args: InferArgs) -> Result<()> {
    match InferUseCase::new(args.into()).execute()? {
        InferOutcome::ModelMissing(path) => {
            println!("Error: {} not found. Please run training first.", path.display());
        }
        InferOutcome::Completed(report) => {
            tracing::info!("Evaluated {} model on {} rows", report.solver, report.shape.0);
            print!("{}", render_inference(&report));
        }
    }
    Ok(())
}

fn render_train(summary: &TrainSummary) -> String {
    format!(
        "Training completed!\nAccuracy: {:.4}\nF1-Score: {:.4}\nModel saved as {}\n",
        summary.accuracy,
        summary.f1,
        summary.model_path.display(),
    )
}

fn render_inference(r: &InferenceReport) -> String {
    let mut out = String::new();
    out.push_str("Model loaded successfully!\n");
    out.push_str(&format!("Dataset shape: ({}, {})\n", r.shape.0, r.shape.1));
    out.push_str(&format!("Number of classes: {}\n", r.n_classes));

    out.push_str("\n=== Inference Results ===\n");
    out.push_str(&format!("Accuracy: {:.4}\n", r.accuracy));
    out.push_str(&format!("F1-Score: {:.4}\n", r.f1));

    out.push_str("\n=== Sample Predictions ===\n");
    for s in &r.samples {
        out.push_str(&format!("Sample {}: True={}, Predicted={}\n", s.index, s.truth, s.predicted));
    }

    out.push_str("\n=== Classification Report ===\n");
    out.push_str(&r.report.to_string());

    out.push_str("\nInference completed successfully!\n");
    out
}
