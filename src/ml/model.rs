use anyhow::{anyhow, Result};
use burn::{
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally; adding them again gives conflicting impls.
#[derive(Config, Debug)]
pub struct SoftmaxRegressionConfig {
    pub n_features: usize,
    pub n_classes:  usize,
}

impl SoftmaxRegressionConfig {
    /// Weights and bias start at zero, so two fits with the same data,
    /// hyperparameters and batch order produce the same model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SoftmaxRegression<B> {
        let linear = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        SoftmaxRegression { linear }
    }
}

/// Multinomial logistic regression: one linear layer whose logits feed
/// a softmax. Class `k` of the output is class index `k`, not a label.
#[derive(Module, Debug)]
pub struct SoftmaxRegression<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> SoftmaxRegression<B> {
    /// features: [batch, n_features] → logits: [batch, n_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Mean cross-entropy plus `l2_scale · ‖W‖²`. The bias is not penalised.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
        l2_scale: f64,
    ) -> Tensor<B, 1> {
        let logits = self.forward(features);
        let ce = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits, targets);

        let penalty = self.linear.weight.val().square().sum().mul_scalar(l2_scale);
        ce + penalty
    }

    /// Arg-max class index per row.
    pub fn predict_indices(&self, features: Tensor<B, 2>) -> Result<Vec<usize>> {
        // argmax(1) returns shape [batch, 1]; flatten to [batch]
        let indices = self.forward(features).argmax(1).flatten::<1>(0, 1);
        let indices = indices
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .map_err(|e| anyhow!("cannot read predicted indices: {e:?}"))?;
        Ok(indices.into_iter().map(|i| i as usize).collect())
    }

    pub fn n_features(&self) -> usize {
        self.linear.weight.val().dims()[0]
    }

    /// Weight matrix flattened row-major as [n_features, n_classes].
    pub fn coefficients(&self) -> Result<Vec<f32>> {
        self.linear
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("cannot read model weights: {e:?}"))
    }
}
