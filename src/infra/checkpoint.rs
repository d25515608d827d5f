// ============================================================
// Layer 6 — Model Store
// ============================================================
// Persists a TrainedClassifier as one binary artifact so the
// inference run can rebuild exactly the model training produced.
//
// What gets saved:
//
//   ModelArtifact (bincode)
//     format_version  — bumped when the layout changes
//     solver          — which fitting routine produced it
//     n_features      — input width, needed to rebuild the module
//     classes         — sorted labels the model can output
//     weights
//       Lbfgs(..)     — linfa's fitted model via its serde impl
//       Gradient(..)  — burn module record, BinBytesRecorder
//                       at full precision
//
// The burn module must be rebuilt with the right architecture
// before its record is loaded into it, which is why n_features
// and the class count travel alongside the weights.
//
// Default location: models/model_train.bin
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use burn::{
    module::Module,
    record::{BinBytesRecorder, FullPrecisionSettings, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

use crate::domain::error::PipelineError;
use crate::domain::hyperparams::Solver;
use crate::ml::classifier::TrainedClassifier;
use crate::ml::lbfgs::LbfgsModel;
use crate::ml::model::SoftmaxRegressionConfig;
use crate::ml::trainer::InferBackend;

pub const DEFAULT_MODEL_PATH: &str = "models/model_train.bin";

const FORMAT_VERSION: u32 = 1;

type WeightsRecorder = BinBytesRecorder<FullPrecisionSettings>;

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    solver:         Solver,
    n_features:     usize,
    classes:        Vec<usize>,
    weights:        StoredWeights,
}

#[derive(Serialize, Deserialize)]
enum StoredWeights {
    Lbfgs(LbfgsModel),
    Gradient(Vec<u8>),
}

/// Reads and writes the model artifact at a single file path.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the artifact, replacing any previous one.
    /// Creates the parent directory if it doesn't already exist.
    pub fn save(&self, classifier: &TrainedClassifier) -> Result<()> {
        let artifact = to_artifact(classifier)?;
        let bytes = bincode::serialize(&artifact).context("Failed to encode model artifact")?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            // create_dir_all is a no-op when the directory exists, like `mkdir -p`
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create model directory '{}'", dir.display()))?;
        }

        fs::write(&self.path, &bytes)
            .with_context(|| format!("Failed to write model to '{}'", self.path.display()))?;

        tracing::debug!("Saved {} byte artifact to '{}'", bytes.len(), self.path.display());
        Ok(())
    }

    /// Read the artifact back into a ready-to-predict classifier.
    pub fn load(&self) -> Result<TrainedClassifier, PipelineError> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PipelineError::ArtifactNotFound(self.path.clone()),
            _ => PipelineError::Io(e),
        })?;

        let artifact: ModelArtifact = bincode::deserialize(&bytes)
            .map_err(|e| self.corrupt(format!("cannot decode: {e}")))?;

        if artifact.format_version != FORMAT_VERSION {
            return Err(self.corrupt(format!(
                "format version {} is not supported (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }

        let classifier = from_artifact(artifact).map_err(|e| self.corrupt(format!("{e:#}")))?;
        tracing::debug!("Loaded {} model from '{}'", classifier.solver(), self.path.display());
        Ok(classifier)
    }

    fn corrupt(&self, reason: String) -> PipelineError {
        PipelineError::ArtifactCorrupt { path: self.path.clone(), reason }
    }
}

fn to_artifact(classifier: &TrainedClassifier) -> Result<ModelArtifact> {
    let weights = match classifier {
        TrainedClassifier::Lbfgs { model, .. } => StoredWeights::Lbfgs(model.clone()),
        TrainedClassifier::Gradient { model, .. } => {
            let bytes = Recorder::<InferBackend>::record(&WeightsRecorder::default(), model.clone().into_record(), ())
                .map_err(|e| anyhow!("Failed to encode model weights: {e}"))?;
            StoredWeights::Gradient(bytes)
        }
    };

    Ok(ModelArtifact {
        format_version: FORMAT_VERSION,
        solver:         classifier.solver(),
        n_features:     classifier.n_features(),
        classes:        classifier.classes().to_vec(),
        weights,
    })
}

fn from_artifact(artifact: ModelArtifact) -> Result<TrainedClassifier> {
    let ModelArtifact { solver, n_features, classes, weights, .. } = artifact;

    match weights {
        StoredWeights::Lbfgs(model) => Ok(TrainedClassifier::Lbfgs { model, classes, n_features }),
        StoredWeights::Gradient(bytes) => {
            let device = Default::default();
            let model = SoftmaxRegressionConfig::new(n_features, classes.len()).init::<InferBackend>(&device);
            let record = Recorder::<InferBackend>::load(&WeightsRecorder::default(), bytes, &device)
                .map_err(|e| anyhow!("model weights do not load: {e}"))?;
            Ok(TrainedClassifier::Gradient {
                solver,
                model: model.load_record(record),
                classes,
                n_features,
            })
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{loader::DigitsLoader, splitter::split_train_test};
    use crate::domain::hyperparams::Hyperparameters;
    use crate::domain::sample::DigitSample;
    use crate::domain::traits::{Classifier, SampleSource};

    fn hp(solver: Solver, max_iter: usize) -> Hyperparameters {
        Hyperparameters {
            c:             1.0,
            solver,
            max_iter,
            tol:           1e-4,
            learning_rate: 0.01,
            batch_size:    32,
        }
    }

    fn small_split() -> (Vec<DigitSample>, Vec<DigitSample>) {
        let mut samples = DigitsLoader::bundled().load_all().unwrap();
        samples.truncate(400);
        split_train_test(samples, 0.25, 42)
    }

    fn assert_round_trip(solver: Solver, max_iter: usize) {
        let (train, test) = small_split();
        let original = TrainedClassifier::fit(&train, &hp(solver, max_iter), 42).unwrap();

        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("models").join("model_train.bin"));
        store.save(&original).unwrap();
        let restored = store.load().unwrap();

        assert_eq!(restored.solver(), solver);
        assert_eq!(restored.classes(), original.classes());
        assert_eq!(restored.n_features(), original.n_features());
        assert_eq!(restored.coefficients().unwrap(), original.coefficients().unwrap());
        assert_eq!(restored.predict(&test).unwrap(), original.predict(&test).unwrap());
    }

    #[test]
    fn test_lbfgs_round_trip() {
        assert_round_trip(Solver::Lbfgs, 200);
    }

    #[test]
    fn test_gradient_round_trip() {
        assert_round_trip(Solver::Adam, 3);
    }

    #[test]
    fn test_save_overwrites() {
        let (train, _) = small_split();
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.bin"));

        store.save(&TrainedClassifier::fit(&train, &hp(Solver::Sgd, 1), 42).unwrap()).unwrap();
        store.save(&TrainedClassifier::fit(&train, &hp(Solver::Lbfgs, 50), 42).unwrap()).unwrap();
        assert_eq!(store.load().unwrap().solver(), Solver::Lbfgs);
    }

    #[test]
    fn test_missing_artifact() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model_train.bin"));
        assert!(matches!(store.load(), Err(PipelineError::ArtifactNotFound(_))));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_train.bin");
        fs::write(&path, b"definitely not a model").unwrap();
        assert!(matches!(
            ModelStore::new(&path).load(),
            Err(PipelineError::ArtifactCorrupt { .. })
        ));
    }

    #[test]
    fn test_unknown_format_version() {
        let (train, _) = small_split();
        let clf = TrainedClassifier::fit(&train, &hp(Solver::Lbfgs, 50), 42).unwrap();
        let mut artifact = to_artifact(&clf).unwrap();
        artifact.format_version = FORMAT_VERSION + 1;

        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.bin");
        fs::write(&path, bincode::serialize(&artifact).unwrap()).unwrap();

        let err = ModelStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("format version"));
    }
}
