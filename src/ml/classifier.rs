// ============================================================
// Layer 5 — Trained Classifier
// ============================================================
// The one type the workflows hold after fitting or loading:
//
//   TrainedClassifier::Lbfgs     → linfa MultiFittedLogisticRegression
//   TrainedClassifier::Gradient  → burn SoftmaxRegression<NdArray>
//
// Both predict digit *labels*. The burn model works on class
// indices internally, so the Gradient variant keeps the sorted
// class list and maps index k back to classes[k].

use anyhow::{bail, ensure, Context, Result};

use crate::data::{batcher::features_tensor, dataset::distinct_labels};
use crate::domain::hyperparams::{Hyperparameters, Solver};
use crate::domain::sample::DigitSample;
use crate::domain::traits::Classifier;
use crate::ml::lbfgs::{fit_lbfgs, predict_lbfgs, LbfgsModel};
use crate::ml::model::SoftmaxRegression;
use crate::ml::trainer::{fit_gradient, InferBackend};

#[derive(Debug)]
pub enum TrainedClassifier {
    Lbfgs {
        model:      LbfgsModel,
        classes:    Vec<usize>,
        n_features: usize,
    },
    Gradient {
        solver:     Solver,
        model:      SoftmaxRegression<InferBackend>,
        classes:    Vec<usize>,
        n_features: usize,
    },
}

impl TrainedClassifier {
    /// Fit a new classifier on labelled samples with the given hyperparameters.
    pub fn fit(samples: &[DigitSample], hp: &Hyperparameters, seed: u64) -> Result<Self> {
        let classes = distinct_labels(samples);
        ensure!(
            classes.len() >= 2,
            "training data must contain at least two classes, found {}",
            classes.len()
        );
        let n_features = samples.first().map_or(0, DigitSample::n_features);

        match hp.solver {
            Solver::Lbfgs => {
                let model = fit_lbfgs(samples, hp)?;
                Ok(Self::Lbfgs { model, classes, n_features })
            }
            solver => {
                let encoded = encode_labels(samples, &classes)?;
                let model   = fit_gradient(encoded, classes.len(), hp, seed)?;
                Ok(Self::Gradient { solver, model, classes, n_features })
            }
        }
    }

    pub fn solver(&self) -> Solver {
        match self {
            Self::Lbfgs { .. }              => Solver::Lbfgs,
            Self::Gradient { solver, .. }   => *solver,
        }
    }

    /// Labels this classifier can output, ascending
    pub fn classes(&self) -> &[usize] {
        match self {
            Self::Lbfgs { classes, .. } | Self::Gradient { classes, .. } => classes,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            Self::Lbfgs { n_features, .. } | Self::Gradient { n_features, .. } => *n_features,
        }
    }

    /// Learned weights, row-major [n_features, n_classes].
    pub fn coefficients(&self) -> Result<Vec<f64>> {
        match self {
            Self::Lbfgs { model, .. } => Ok(model.params().iter().copied().collect()),
            Self::Gradient { model, .. } => Ok(model
                .coefficients()?
                .into_iter()
                .map(f64::from)
                .collect()),
        }
    }
}

impl Classifier for TrainedClassifier {
    fn predict(&self, samples: &[DigitSample]) -> Result<Vec<usize>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = samples.iter().find(|s| s.n_features() != self.n_features()) {
            bail!(
                "model expects {} features per sample, got {}",
                self.n_features(),
                bad.n_features()
            );
        }

        match self {
            Self::Lbfgs { model, .. } => predict_lbfgs(model, samples),
            Self::Gradient { model, classes, .. } => {
                let device  = Default::default();
                let indices = model.predict_indices(features_tensor::<InferBackend>(samples, &device))?;
                indices
                    .into_iter()
                    .map(|k| {
                        classes
                            .get(k)
                            .copied()
                            .with_context(|| format!("predicted class index {k} has no label"))
                    })
                    .collect()
            }
        }
    }
}

/// Replace each label with its position in `classes`.
fn encode_labels(samples: &[DigitSample], classes: &[usize]) -> Result<Vec<DigitSample>> {
    samples
        .iter()
        .map(|s| {
            let index = classes
                .binary_search(&s.label)
                .ok()
                .with_context(|| format!("label {} is not in the class list", s.label))?;
            Ok(DigitSample::new(s.pixels.clone(), index))
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{loader::DigitsLoader, splitter::split_train_test};
    use crate::domain::traits::SampleSource;

    fn hp(solver: Solver, max_iter: usize) -> Hyperparameters {
        Hyperparameters {
            c:             1.0,
            solver,
            max_iter,
            tol:           1e-4,
            learning_rate: 0.01,
            batch_size:    64,
        }
    }

    fn digits_split() -> (Vec<DigitSample>, Vec<DigitSample>) {
        let samples = DigitsLoader::bundled().load_all().unwrap();
        split_train_test(samples, 0.2, 42)
    }

    #[test]
    fn test_lbfgs_on_digits() {
        let (train, test) = digits_split();
        let clf = TrainedClassifier::fit(&train, &hp(Solver::Lbfgs, 1000), 42).unwrap();

        assert_eq!(clf.classes(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(clf.n_features(), 64);
        assert_eq!(clf.coefficients().unwrap().len(), 640);
        assert!(clf.score(&train).unwrap() > 0.95);
        assert!(clf.score(&test).unwrap() > 0.90);
    }

    #[test]
    fn test_adam_on_digits() {
        let (train, test) = digits_split();
        let clf = TrainedClassifier::fit(&train, &hp(Solver::Adam, 20), 42).unwrap();

        assert_eq!(clf.solver(), Solver::Adam);
        assert!(clf.score(&test).unwrap() > 0.85);

        let predicted = clf.predict(&test).unwrap();
        assert_eq!(predicted.len(), test.len());
        assert!(predicted.iter().all(|p| *p <= 9));
    }

    #[test]
    fn test_gradient_maps_indices_back_to_labels() {
        // Labels 3 and 7 train as indices 0 and 1
        let samples: Vec<DigitSample> = (0..16)
            .map(|i| {
                if i % 2 == 0 {
                    DigitSample::new(vec![-3.0, 0.0], 3)
                } else {
                    DigitSample::new(vec![3.0, 0.0], 7)
                }
            })
            .collect();
        let mut params = hp(Solver::Sgd, 30);
        params.learning_rate = 0.1;
        params.batch_size = 4;

        let clf = TrainedClassifier::fit(&samples, &params, 42).unwrap();
        assert_eq!(clf.classes(), &[3, 7]);
        assert_eq!(clf.predict(&samples[..2]).unwrap(), vec![3, 7]);
    }

    #[test]
    fn test_single_class_rejected() {
        let samples = vec![DigitSample::new(vec![1.0], 4); 3];
        assert!(TrainedClassifier::fit(&samples, &hp(Solver::Lbfgs, 10), 42).is_err());
    }

    #[test]
    fn test_feature_count_mismatch_rejected() {
        let (train, _) = digits_split();
        let clf = TrainedClassifier::fit(&train[..200], &hp(Solver::Lbfgs, 50), 42).unwrap();
        let wrong = vec![DigitSample::new(vec![0.0; 3], 0)];
        assert!(clf.predict(&wrong).is_err());
        assert!(clf.predict(&[]).unwrap().is_empty());
    }
}
