//! Two-Pass Forecasting and the Training Boundary
//!
//! [`Forecaster`] runs its [`Seq2Seq`] model twice per call: the first pass
//! forecasts the next `seq_len` frames from the observed sequence, the second
//! pass feeds that forecast back through the *same* weights to extend the
//! horizon, and the two forecasts are concatenated along the time axis.
//!
//! The permutations surrounding each pass translate between the external
//! channel-first convention `[batch, channel, time, height, width]` and the
//! model's channels-last input. They are reproduced exactly as trained
//! checkpoints expect them; reordering any of them changes the parameter
//! layout contract.
//!
//! [`IrradianceNet`] is the boundary handed to a training loop: a forward pass
//! and a scalar MSE loss. Optimizer and scheduler construction (AdamW with
//! plateau-based learning-rate decay in the reference setup) stays with the
//! external trainer.

use burn::module::Module;
use burn::nn::loss::{MseLoss, Reduction};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::seq2seq::Seq2Seq;

/// Autoregressive two-pass wrapper around one shared-weight [`Seq2Seq`]
#[derive(Module, Debug)]
pub struct Forecaster<B: Backend> {
    model: Seq2Seq<B>,
}

impl<B: Backend> Forecaster<B> {
    /// Build a forecaster for a given frame geometry
    ///
    /// # Arguments
    /// * `seq_len` - Length of each forecast pass; the output covers `2 * seq_len` frames
    /// * `in_channels` - Channel count of each input frame; autoregression
    ///   requires this to match the model's single output channel
    /// * `image_size` - Square spatial size of each frame
    /// * `device` - Device to create the module on
    pub fn new(seq_len: usize, in_channels: usize, image_size: usize, device: &B::Device) -> Self {
        Self {
            model: Seq2Seq::new(seq_len, in_channels, image_size, device),
        }
    }

    /// Wrap an existing model
    pub fn from_model(model: Seq2Seq<B>) -> Self {
        Self { model }
    }

    /// Forecast both horizons
    ///
    /// # Arguments
    /// * `x` - Channel-first sequence `[batch, channel, time, height, width]`
    ///
    /// # Returns
    /// Channel-first forecast `[batch, channel, 2 * time, height, width]`,
    /// first-pass frames before second-pass frames.
    pub fn forward(&self, x: Tensor<B, 5>) -> Tensor<B, 5> {
        // [B, C, T, H, W] -> [B, T, H, W, C]
        let x = x.permute([0, 2, 3, 4, 1]);

        let y_pred1 = self.model.forward(x).permute([0, 1, 3, 4, 2]);
        // second pass consumes the first forecast, same weights
        let y_pred2 = self.model.forward(y_pred1.clone()).permute([0, 1, 3, 4, 2]);

        // [B, 2T, H, W, C] -> [B, C, 2T, H, W]
        Tensor::cat(vec![y_pred1, y_pred2], 1).permute([0, 4, 1, 2, 3])
    }
}

/// Training boundary: forward pass plus scalar loss
///
/// Everything stateful about training (optimizer, schedule, logging,
/// checkpoints) lives with the caller; this type only evaluates the model.
///
/// # Example
///
/// ```ignore
/// type Backend = Autodiff<NdArray<f32>>;
/// let net = IrradianceNet::new(Forecaster::<Backend>::new(4, 1, 128, &device));
///
/// // one training step, optimizer owned by the loop
/// let loss = net.loss(x, y);
/// let grads = GradientsParams::from_grads(loss.backward(), &net);
/// net = optim.step(lr, net, grads);
/// ```
#[derive(Module, Debug)]
pub struct IrradianceNet<B: Backend> {
    model: Forecaster<B>,
}

impl<B: Backend> IrradianceNet<B> {
    /// Wrap a forecaster
    pub fn new(model: Forecaster<B>) -> Self {
        Self { model }
    }

    /// Forecast both horizons, channel-first in and out
    pub fn forward(&self, x: Tensor<B, 5>) -> Tensor<B, 5> {
        self.model.forward(x)
    }

    /// Mean squared error between the forecast for `x` and the target `y`
    ///
    /// # Returns
    /// Scalar loss tensor; on an autodiff backend, calling `backward` on it
    /// yields gradients for every model parameter.
    pub fn loss(&self, x: Tensor<B, 5>, y: Tensor<B, 5>) -> Tensor<B, 1> {
        let y_pred = self.forward(x);
        MseLoss::new().forward(y_pred, y, Reduction::Mean)
    }
}
