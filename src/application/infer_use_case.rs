// ============================================================
// Layer 2 — Infer Use Case
// ============================================================
// Loads the persisted model and scores it on the full dataset:
//
//   1. Load the artifact (missing → InferOutcome::ModelMissing)
//   2. Load every sample, no split
//   3. Predict all rows
//   4. Accuracy, weighted F1, classification report
//   5. Pick out a few individual predictions by row index
//
// A missing artifact is an expected state (training has not
// run yet), so it is returned as an outcome rather than an
// error. Every other failure propagates.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::{dataset::DigitsDataset, loader::DigitsLoader};
use crate::domain::error::PipelineError;
use crate::domain::hyperparams::Solver;
use crate::domain::traits::{Classifier, SampleSource};
use crate::infra::{
    checkpoint::{ModelStore, DEFAULT_MODEL_PATH},
    metrics::{accuracy, f1_score, Average, ClassificationReport},
};

pub const DEFAULT_SAMPLE_INDICES: [usize; 5] = [0, 100, 200, 300, 400];

#[derive(Debug, Clone)]
pub struct InferConfig {
    pub model_path:     PathBuf,
    pub dataset_path:   Option<PathBuf>,
    pub sample_indices: Vec<usize>,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            model_path:     PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path:   None,
            sample_indices: DEFAULT_SAMPLE_INDICES.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePrediction {
    pub index:     usize,
    pub truth:     usize,
    pub predicted: usize,
}

#[derive(Debug, Clone)]
pub struct InferenceReport {
    pub solver:    Solver,
    /// (rows, features)
    pub shape:     (usize, usize),
    /// Distinct labels in the dataset
    pub n_classes: usize,
    pub accuracy:  f64,
    pub f1:        f64,
    pub samples:   Vec<SamplePrediction>,
    pub report:    ClassificationReport,
}

#[derive(Debug, Clone)]
pub enum InferOutcome {
    Completed(InferenceReport),
    /// No artifact at this path; training has to run first
    ModelMissing(PathBuf),
}

pub struct InferUseCase {
    config: InferConfig,
}

impl InferUseCase {
    pub fn new(config: InferConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InferOutcome> {
        let cfg = &self.config;

        let classifier = match ModelStore::new(&cfg.model_path).load() {
            Ok(classifier) => classifier,
            Err(PipelineError::ArtifactNotFound(path)) => {
                tracing::warn!("No model artifact at '{}'", path.display());
                return Ok(InferOutcome::ModelMissing(path));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!("Loaded {} model from '{}'", classifier.solver(), cfg.model_path.display());

        let dataset = DigitsDataset::new(DigitsLoader::new(cfg.dataset_path.clone()).load_all()?);
        let y_true  = dataset.labels();
        let y_pred  = classifier
            .predict(dataset.samples())
            .context("Prediction over the dataset failed")?;

        let samples = cfg
            .sample_indices
            .iter()
            .map(|&index| {
                let sample = dataset.sample(index)?;
                Ok(SamplePrediction { index, truth: sample.label, predicted: y_pred[index] })
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;

        let report = InferenceReport {
            solver:    classifier.solver(),
            shape:     dataset.shape(),
            n_classes: dataset.classes().len(),
            accuracy:  accuracy(&y_true, &y_pred),
            f1:        f1_score(&y_true, &y_pred, Average::Weighted),
            samples,
            report:    ClassificationReport::new(&y_true, &y_pred),
        };
        tracing::info!("Accuracy={:.4}, weighted F1={:.4}", report.accuracy, report.f1);

        Ok(InferOutcome::Completed(report))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use std::fs;

    /// Train a quick model into `dir` and return its path
    fn train_into(dir: &tempfile::TempDir) -> PathBuf {
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"C": 1.0, "solver": "lbfgs", "max_iter": 300}"#).unwrap();
        let model_path = dir.path().join("models").join("model_train.bin");

        TrainUseCase::new(TrainConfig {
            config_path,
            model_path: model_path.clone(),
            ..TrainConfig::default()
        })
        .execute()
        .unwrap();
        model_path
    }

    #[test]
    fn test_missing_model_is_an_outcome() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_train.bin");
        let cfg  = InferConfig { model_path: path.clone(), ..InferConfig::default() };

        match InferUseCase::new(cfg).execute().unwrap() {
            InferOutcome::ModelMissing(p) => assert_eq!(p, path),
            InferOutcome::Completed(_)    => panic!("expected ModelMissing"),
        }
    }

    #[test]
    fn test_infer_after_training() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = InferConfig { model_path: train_into(&dir), ..InferConfig::default() };

        let InferOutcome::Completed(report) = InferUseCase::new(cfg).execute().unwrap() else {
            panic!("expected a completed inference");
        };

        assert_eq!(report.solver, Solver::Lbfgs);
        assert_eq!(report.shape, (1797, 64));
        assert_eq!(report.n_classes, 10);
        assert!(report.accuracy > 0.9);
        assert_eq!(report.report.total, 1797);
        assert_eq!(report.report.classes.len(), 10);

        let all = DigitsLoader::bundled().load_all().unwrap();
        let indices: Vec<usize> = report.samples.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 100, 200, 300, 400]);
        for s in &report.samples {
            assert_eq!(s.truth, all[s.index].label);
            assert!(s.predicted <= 9);
        }
    }

    #[test]
    fn test_sample_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = InferConfig {
            model_path:     train_into(&dir),
            sample_indices: vec![0, 5000],
            ..InferConfig::default()
        };

        let err = InferUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::IndexOutOfRange { index: 5000, len: 1797 })
        ));
    }

    #[test]
    fn test_corrupt_model_is_fatal() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_train.bin");
        fs::write(&path, [0u8; 3]).unwrap();

        let cfg = InferConfig { model_path: path, ..InferConfig::default() };
        let err = InferUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ArtifactCorrupt { .. })
        ));
    }
}
