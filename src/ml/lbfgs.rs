// ============================================================
// Layer 5 — L-BFGS Solver (linfa)
// ============================================================
// Full-batch multinomial logistic regression fitted with the
// L-BFGS quasi-Newton method through linfa-logistic (argmin).
//
//   minimise  Σ_i −log p(y_i | x_i)  +  ½ · α · ‖W‖²,   α = 1 / C
//
// which is sklearn's C · Σ loss + ½‖W‖² divided by C.
// The intercept is fitted and not penalised.
//
// linfa works on ndarray matrices of f64, so pixels are widened
// from the f32 the burn pipeline uses.

use anyhow::{bail, Context, Result};
use linfa::{traits::{Fit, Predict}, Dataset};
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2};

use crate::domain::hyperparams::Hyperparameters;
use crate::domain::sample::DigitSample;

pub type LbfgsModel = MultiFittedLogisticRegression<f64, usize>;

pub fn fit_lbfgs(samples: &[DigitSample], hp: &Hyperparameters) -> Result<LbfgsModel> {
    if samples.is_empty() {
        bail!("cannot fit a classifier on an empty training set");
    }

    let records = records_matrix(samples)?;
    let targets: Array1<usize> = samples.iter().map(|s| s.label).collect();
    let dataset = Dataset::new(records, targets);

    tracing::info!(
        "Fitting L-BFGS logistic regression: alpha={:.4}, max_iter={}, tol={:e}",
        hp.alpha(), hp.max_iter, hp.tol,
    );

    MultiLogisticRegression::default()
        .alpha(hp.alpha())
        .max_iterations(hp.max_iter as u64)
        .gradient_tolerance(hp.tol)
        .fit(&dataset)
        .context("L-BFGS fit failed")
}

pub fn predict_lbfgs(model: &LbfgsModel, samples: &[DigitSample]) -> Result<Vec<usize>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let records = records_matrix(samples)?;
    Ok(model.predict(&records).to_vec())
}

/// Stack sample pixels into a [rows, n_features] f64 matrix.
pub fn records_matrix(samples: &[DigitSample]) -> Result<Array2<f64>> {
    let n_features = samples.first().map_or(0, DigitSample::n_features);
    let flat: Vec<f64> = samples
        .iter()
        .flat_map(|s| s.pixels.iter().map(|&p| f64::from(p)))
        .collect();

    Array2::from_shape_vec((samples.len(), n_features), flat)
        .context("samples do not all have the same number of features")
}
