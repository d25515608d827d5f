// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `infer`
// and all their configurable flags.
//
// Every flag defaults to the fixed value the workflows use
// when run bare, so `digits-mlops train` followed by
// `digits-mlops infer` needs no arguments at all.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    infer_use_case::{InferConfig, DEFAULT_SAMPLE_INDICES},
    train_use_case::{TrainConfig, DEFAULT_CONFIG_PATH, DEFAULT_SEED, DEFAULT_TEST_SIZE},
};
use crate::infra::checkpoint::DEFAULT_MODEL_PATH;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a classifier on the digits and save it
    Train(TrainArgs),

    /// Evaluate a saved classifier on the full digits dataset
    Infer(InferArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON file with C, solver and max_iter
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Where to write the model artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// CSV of `pixels...,label` rows to use instead of the bundled digits
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    pub test_size: f64,

    /// Seed for the split and for any stochastic solver behaviour
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            config_path:  a.config,
            model_path:   a.model_path,
            dataset_path: a.dataset,
            test_size:    a.test_size,
            seed:         a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct InferArgs {
    /// Model artifact written by `train`
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// CSV of `pixels...,label` rows to use instead of the bundled digits
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Row indices to show individual predictions for
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SAMPLE_INDICES)]
    pub samples: Vec<usize>,
}

impl From<InferArgs> for InferConfig {
    fn from(a: InferArgs) -> Self {
        InferConfig {
            model_path:     a.model_path,
            dataset_path:   a.dataset,
            sample_indices: a.samples,
        }
    }
}
