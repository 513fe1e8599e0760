//! # IrradiaNet - ConvLSTM Irradiance Forecasting (Rust)
//!
//! Sequence-to-sequence convolutional-recurrent forecasting of spatial
//! irradiance fields, built on the Burn framework.
//!
//! ## Architecture
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`SpatialStage`](layers::SpatialStage) | Stack of conv / deconv / pool ops built from a declarative [`LayerSpec`](layers::LayerSpec) |
//! | [`ConvLstmCell`](cell::ConvLstmCell) | Gated spatial recurrence over a fixed unroll length |
//! | [`Encoder`](encoder::Encoder) | Downsampling stack of (stage → cell) blocks, collecting terminal states |
//! | [`Decoder`](decoder::Decoder) | Upsampling stack of (cell → stage) blocks, consuming encoder states in reverse |
//! | [`Seq2Seq`](seq2seq::Seq2Seq) | One encoder/decoder pass over an input sequence |
//! | [`Forecaster`](forecaster::Forecaster) | Two autoregressive passes, concatenated along time |
//! | [`IrradianceNet`](forecaster::IrradianceNet) | Training boundary: `forward` + `loss` |
//!
//! ## Quick Start
//!
//! ```ignore
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use irradianet::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! // 4 input frames, 1 channel, 16x16 pixels
//! let net = IrradianceNet::<Backend>::new(Forecaster::new(4, 1, 16, &device));
//!
//! // Input: [batch, channel, time, height, width]
//! let x = Tensor::<Backend, 5>::zeros([2, 1, 4, 16, 16], &device);
//! let y_pred = net.forward(x);
//! // y_pred: [2, 1, 8, 16, 16] - both forecast horizons, channel-first
//! ```
//!
//! ## Tensor Conventions
//!
//! Internally sequences are time-major `[time, batch, channel, height, width]`
//! for per-step slicing. [`Seq2Seq`](seq2seq::Seq2Seq) accepts channels-last
//! `[batch, time, height, width, channel]`; the outer
//! [`Forecaster`](forecaster::Forecaster) accepts and returns channel-first
//! `[batch, channel, time, height, width]`. These permutations are part of the
//! public contract and keep trained parameters interchangeable.
//!
//! ## Training
//!
//! The crate exposes a pure forward pass and a scalar MSE loss. Optimizer and
//! scheduler construction (e.g. `burn::optim::AdamWConfig`) belongs to the
//! training loop that calls [`IrradianceNet::loss`](forecaster::IrradianceNet::loss)
//! once per step on an autodiff backend.

pub mod cell;
pub mod decoder;
pub mod encoder;
pub mod forecaster;
pub mod layers;
pub mod seq2seq;

pub mod prelude {
    pub use crate::cell::{ConvLstmCell, ConvLstmState};
    pub use crate::decoder::{Decoder, DecoderBlock};
    pub use crate::encoder::{Encoder, EncoderBlock};
    pub use crate::forecaster::{Forecaster, IrradianceNet};
    pub use crate::layers::{LayerSpec, SpatialStage};
    pub use crate::seq2seq::Seq2Seq;
}
