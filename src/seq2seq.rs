//! Encoder/Decoder Composition
//!
//! [`Seq2Seq`] wires the fixed three-level encoder/decoder layout of the
//! irradiance model: strided convolutions shrink the field on the way down,
//! transposed convolutions restore it on the way up, and a 3×3 + 1×1 head
//! reduces the final feature map to a single irradiance channel.
//!
//! All intermediate channel counts and spatial sizes derive from `image_size`
//! as a pyramid:
//!
//! | Level | Value |
//! |-------|---------------------------------|
//! | `s1`  | `image_size` |
//! | `s2`  | `image_size - image_size / 4` |
//! | `s3`  | `image_size - image_size / 2` |
//! | `s4`  | `s1 - s2` |
//!
//! No consistency validation is performed on these derivations: an
//! `image_size` whose strided halvings do not land on `s3`/`s4`, or feature
//! depths whose `4F` is not divisible by 32, fail only at the first forward
//! pass inside Burn.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cell::ConvLstmCell;
use crate::decoder::{Decoder, DecoderBlock};
use crate::encoder::{Encoder, EncoderBlock};
use crate::layers::{LayerSpec, SpatialStage};

fn encoder_blocks<B: Backend>(
    seq_len: usize,
    in_channels: usize,
    image_size: usize,
    device: &B::Device,
) -> Vec<EncoderBlock<B>> {
    let s1 = image_size;
    let s2 = image_size - image_size / 4;
    let s3 = image_size - image_size / 2;
    let s4 = s1 - s2;

    vec![
        EncoderBlock::new(
            SpatialStage::new(
                &LayerSpec::new().with("conv1_leaky_1", &[in_channels, s4, 3, 1, 1]),
                device,
            ),
            ConvLstmCell::new((s1, s1), s4, 5, s3, seq_len, device),
        ),
        EncoderBlock::new(
            SpatialStage::new(&LayerSpec::new().with("conv2_leaky_1", &[s3, s3, 3, 2, 1]), device),
            ConvLstmCell::new((s3, s3), s3, 5, s2, seq_len, device),
        ),
        EncoderBlock::new(
            SpatialStage::new(&LayerSpec::new().with("conv3_leaky_1", &[s2, s2, 3, 2, 1]), device),
            ConvLstmCell::new((s4, s4), s2, 5, s1, seq_len, device),
        ),
    ]
}

fn decoder_blocks<B: Backend>(
    seq_len: usize,
    image_size: usize,
    device: &B::Device,
) -> Vec<DecoderBlock<B>> {
    let s1 = image_size;
    let s2 = image_size - image_size / 4;
    let s3 = image_size - image_size / 2;
    let s4 = s1 - s2;

    vec![
        DecoderBlock::new(
            ConvLstmCell::new((s4, s4), s1, 5, s1, seq_len, device),
            SpatialStage::new(&LayerSpec::new().with("deconv1_leaky_1", &[s1, s1, 4, 2, 1]), device),
        ),
        DecoderBlock::new(
            ConvLstmCell::new((s3, s3), s1, 5, s2, seq_len, device),
            SpatialStage::new(&LayerSpec::new().with("deconv2_leaky_1", &[s2, s2, 4, 2, 1]), device),
        ),
        DecoderBlock::new(
            ConvLstmCell::new((s1, s1), s2, 5, s3, seq_len, device),
            SpatialStage::new(
                &LayerSpec::new()
                    .with("conv3_leaky_1", &[s3, s4, 3, 1, 1])
                    .with("conv4_leaky_1", &[s4, 1, 1, 1, 0]),
                device,
            ),
        ),
    ]
}

/// One encoder→decoder pass over a frame sequence
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct Seq2Seq<B: Backend> {
    encoder: Encoder<B>,
    decoder: Decoder<B>,
}

impl<B: Backend> Seq2Seq<B> {
    /// Build the three-level model for a given frame geometry
    ///
    /// # Arguments
    /// * `seq_len` - Unroll length of every recurrent cell
    /// * `in_channels` - Channel count of each input frame
    /// * `image_size` - Square spatial size of each frame; must be such that
    ///   the derived pyramid sizes line up (unchecked)
    /// * `device` - Device to create the module on
    pub fn new(seq_len: usize, in_channels: usize, image_size: usize, device: &B::Device) -> Self {
        Self {
            encoder: Encoder::new(encoder_blocks(seq_len, in_channels, image_size, device)),
            decoder: Decoder::new(decoder_blocks(seq_len, image_size, device)),
        }
    }

    /// The encoder half
    pub fn encoder(&self) -> &Encoder<B> {
        &self.encoder
    }

    /// The decoder half
    pub fn decoder(&self) -> &Decoder<B> {
        &self.decoder
    }

    /// Forecast one continuation sequence
    ///
    /// # Arguments
    /// * `x` - Channels-last sequence `[batch, time, height, width, channel]`
    ///
    /// # Returns
    /// Channel-first sequence `[batch, time, 1, height, width]`
    pub fn forward(&self, x: Tensor<B, 5>) -> Tensor<B, 5> {
        let x = x.permute([0, 1, 4, 2, 3]);
        let hidden_states = self.encoder.forward(x);
        self.decoder.forward(hidden_states)
    }
}
