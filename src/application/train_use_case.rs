// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load hyperparameters      (Layer 6 - infra, Layer 3 - domain)
//   Step 2: Load the digits dataset   (Layer 4 - data)
//   Step 3: Split train/test (80/20)  (Layer 4 - data)
//   Step 4: Fit the classifier        (Layer 5 - ml)
//   Step 5: Score the test partition  (Layer 6 - infra)
//   Step 6: Save the model artifact   (Layer 6 - infra)
//
// Nothing is printed here; the CLI layer renders TrainSummary.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Context, Result};
use std::path::PathBuf;

use crate::data::{loader::DigitsLoader, splitter::split_train_test};
use crate::domain::hyperparams::Hyperparameters;
use crate::domain::traits::{Classifier, SampleSource};
use crate::infra::{
    checkpoint::{ModelStore, DEFAULT_MODEL_PATH},
    config_loader::load_config,
    metrics::{accuracy, f1_score, Average},
};
use crate::ml::classifier::TrainedClassifier;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

// ─── Training Configuration ──────────────────────────────────────────────────
// Where to read from and write to, plus the split settings.
// Model hyperparameters come from the JSON file at config_path.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub config_path:  PathBuf,
    pub model_path:   PathBuf,
    /// CSV override; None uses the bundled digits
    pub dataset_path: Option<PathBuf>,
    pub test_size:    f64,
    pub seed:         u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            config_path:  PathBuf::from(DEFAULT_CONFIG_PATH),
            model_path:   PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: None,
            test_size:    DEFAULT_TEST_SIZE,
            seed:         DEFAULT_SEED,
        }
    }
}

/// What a training run produced
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub hyperparameters: Hyperparameters,
    pub n_train:         usize,
    pub n_test:          usize,
    /// Accuracy on the held-out partition
    pub accuracy:        f64,
    /// Support-weighted F1 on the held-out partition
    pub f1:              f64,
    pub model_path:      PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;
        ensure!(
            cfg.test_size > 0.0 && cfg.test_size < 1.0,
            "test size must be strictly between 0 and 1, got {}",
            cfg.test_size
        );

        // ── Step 1: Load and validate hyperparameters ─────────────────────────
        let raw = load_config(&cfg.config_path)?;
        let hp  = Hyperparameters::from_config(&raw)
            .with_context(|| format!("Invalid hyperparameters in '{}'", cfg.config_path.display()))?;
        tracing::info!("Hyperparameters: C={}, solver={}, max_iter={}", hp.c, hp.solver, hp.max_iter);

        // ── Step 2: Load the dataset ──────────────────────────────────────────
        let samples = DigitsLoader::new(cfg.dataset_path.clone()).load_all()?;
        tracing::info!("Loaded {} samples", samples.len());

        // ── Step 3: Train / test split ────────────────────────────────────────
        // Seeded shuffle so repeated runs evaluate on the same rows
        let (train, test) = split_train_test(samples, cfg.test_size, cfg.seed);
        ensure!(
            !train.is_empty() && !test.is_empty(),
            "dataset too small to split: {} train, {} test",
            train.len(),
            test.len()
        );
        tracing::info!("Split: {} train, {} test", train.len(), test.len());

        // ── Step 4: Fit the classifier (Layer 5) ──────────────────────────────
        let classifier = TrainedClassifier::fit(&train, &hp, cfg.seed)
            .with_context(|| format!("Failed to fit the {} classifier", hp.solver))?;

        // ── Step 5: Evaluate on the held-out partition ────────────────────────
        let y_true: Vec<usize> = test.iter().map(|s| s.label).collect();
        let y_pred = classifier.predict(&test)?;
        let acc = accuracy(&y_true, &y_pred);
        let f1  = f1_score(&y_true, &y_pred, Average::Weighted);
        tracing::info!("Test accuracy={:.4}, weighted F1={:.4}", acc, f1);

        // ── Step 6: Persist the artifact ──────────────────────────────────────
        ModelStore::new(&cfg.model_path).save(&classifier)?;
        tracing::info!("Model written to '{}'", cfg.model_path.display());

        Ok(TrainSummary {
            hyperparameters: hp,
            n_train:         train.len(),
            n_test:          test.len(),
            accuracy:        acc,
            f1,
            model_path:      cfg.model_path.clone(),
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use std::fs;

    fn config_in(dir: &tempfile::TempDir, body: &str) -> TrainConfig {
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, body).unwrap();
        TrainConfig {
            config_path,
            model_path: dir.path().join("models").join("model_train.bin"),
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_default_paths() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.config_path, PathBuf::from("config/config.json"));
        assert_eq!(cfg.model_path, PathBuf::from("models/model_train.bin"));
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn test_train_lbfgs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(&dir, r#"{"C": 1.0, "solver": "lbfgs", "max_iter": 1000}"#);

        let summary = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.n_train, 1437);
        assert_eq!(summary.n_test, 360);
        assert!(summary.accuracy > 0.9, "accuracy {}", summary.accuracy);
        assert!(summary.f1 > 0.9, "f1 {}", summary.f1);
        assert!((0.0..=1.0).contains(&summary.accuracy));
        assert!(cfg.model_path.exists());
    }

    #[test]
    fn test_training_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(&dir, r#"{"C": 0.5, "solver": "sgd", "max_iter": 3}"#);

        let a = TrainUseCase::new(cfg.clone()).execute().unwrap();
        let b = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.f1, b.f1);
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            config_path: dir.path().join("nope.json"),
            model_path:  dir.path().join("model.bin"),
            ..TrainConfig::default()
        };

        let err = TrainUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<PipelineError>(), Some(PipelineError::ConfigNotFound(_))));
        assert!(!cfg.model_path.exists());
    }

    #[test]
    fn test_unknown_solver_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(&dir, r#"{"C": 1.0, "solver": "newton-cg", "max_iter": 10}"#);

        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::UnsupportedSolver(_))
        ));
    }

    #[test]
    fn test_bad_test_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(&dir, r#"{"C": 1.0, "solver": "lbfgs", "max_iter": 10}"#);
        cfg.test_size = 1.0;
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
