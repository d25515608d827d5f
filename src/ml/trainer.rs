// ============================================================
// Layer 5 — Mini-batch Training Loop
// ============================================================
// Fits a SoftmaxRegression with one of burn's first-order
// optimisers (SGD, Adam, RMSProp). L-BFGS lives in lbfgs.rs.
//
// Key Burn 0.20 insight:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on InferBackend (NdArray)
//   - The optimiser type differs per solver, so the epoch loop
//     is generic over Optimizer<M, B>
//
// Objective per batch (scaled sklearn form, C · Σ loss + ½‖W‖²):
//   mean cross-entropy + ‖W‖² / (2 · C · n_train)
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer, RmsPropConfig, SgdConfig},
    prelude::*,
};

use crate::data::{
    batcher::{DigitBatch, DigitBatcher},
    dataset::DigitsDataset,
};
use crate::domain::hyperparams::{Hyperparameters, Solver};
use crate::domain::sample::DigitSample;
use crate::ml::model::{SoftmaxRegression, SoftmaxRegressionConfig};

pub type TrainBackend = Autodiff<NdArray<f32>>;
pub type InferBackend = NdArray<f32>;

/// Fit a softmax regression on samples whose labels are already
/// class indices in `0..n_classes`.
pub fn fit_gradient(
    encoded:   Vec<DigitSample>,
    n_classes: usize,
    hp:        &Hyperparameters,
    seed:      u64,
) -> Result<SoftmaxRegression<InferBackend>> {
    let Some(n_features) = encoded.first().map(DigitSample::n_features) else {
        bail!("cannot fit a classifier on an empty training set");
    };

    let device = NdArrayDevice::default();
    TrainBackend::seed(&device, seed);

    let model: SoftmaxRegression<TrainBackend> =
        SoftmaxRegressionConfig::new(n_features, n_classes).init(&device);
    let l2_scale = hp.alpha() / (2.0 * encoded.len() as f64);
    let dataset  = DigitsDataset::new(encoded);

    tracing::info!(
        "Fitting softmax regression: solver={}, epochs={}, lr={}, batch_size={}",
        hp.solver, hp.max_iter, hp.learning_rate, hp.batch_size,
    );

    let trained = match hp.solver {
        Solver::Sgd     => epoch_loop(model, SgdConfig::new().init(), dataset, hp, l2_scale, seed, &device)?,
        Solver::Adam    => epoch_loop(model, AdamConfig::new().init(), dataset, hp, l2_scale, seed, &device)?,
        Solver::RmsProp => epoch_loop(model, RmsPropConfig::new().init(), dataset, hp, l2_scale, seed, &device)?,
        Solver::Lbfgs   => bail!("solver '{}' is not a mini-batch optimiser", hp.solver),
    };

    // Drop the autodiff wrapper for prediction
    Ok(trained.valid())
}

fn epoch_loop<O>(
    mut model: SoftmaxRegression<TrainBackend>,
    mut optim: O,
    dataset:   DigitsDataset,
    hp:        &Hyperparameters,
    l2_scale:  f64,
    seed:      u64,
    device:    &NdArrayDevice,
) -> Result<SoftmaxRegression<TrainBackend>>
where
    O: Optimizer<SoftmaxRegression<TrainBackend>, TrainBackend>,
{
    let loader = DataLoaderBuilder::<TrainBackend, DigitSample, DigitBatch<TrainBackend>>::new(DigitBatcher::new())
        .batch_size(hp.batch_size)
        .shuffle(seed)
        .set_device(device.clone())
        .build(dataset);

    let mut previous = f64::INFINITY;
    let mut last_change = f64::INFINITY;

    for epoch in 1..=hp.max_iter {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(batch.features, batch.targets, l2_scale);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(hp.learning_rate, model, grads);
        }

        let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        if !avg_loss.is_finite() {
            bail!("training diverged at epoch {epoch} (loss = {avg_loss}); try a smaller learning_rate");
        }
        tracing::debug!("Epoch {:>4}/{} | loss={:.6}", epoch, hp.max_iter, avg_loss);

        last_change = (previous - avg_loss).abs();
        previous    = avg_loss;
    }

    if last_change > hp.tol {
        tracing::warn!(
            "Loss still moving by {:.2e} after {} epochs; increase max_iter to converge",
            last_change, hp.max_iter,
        );
    }

    Ok(model)
}
