//! Decoder Stack
//!
//! The decoder mirrors the encoder: an ordered list of blocks, each pairing a
//! [`ConvLstmCell`] with an upsampling [`SpatialStage`]. Blocks are stored in
//! application order; the encoder's states are reversed once, at the point of
//! consumption, so the first decoder block (the innermost one) receives the
//! last encoder block's state.
//!
//! The reversed pairing is the load-bearing invariant of the encoder/decoder
//! relationship: a swapped pairing with compatible shapes produces silently
//! wrong output, which is why the integration tests check it by value.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cell::{ConvLstmCell, ConvLstmState};
use crate::layers::SpatialStage;

/// One decoder level: recurrence, then spatial transform
#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    cell: ConvLstmCell<B>,
    stage: SpatialStage<B>,
}

impl<B: Backend> DecoderBlock<B> {
    /// Pair a recurrent cell with a spatial stage
    pub fn new(cell: ConvLstmCell<B>, stage: SpatialStage<B>) -> Self {
        Self { cell, stage }
    }

    /// The block's recurrent cell
    pub fn cell(&self) -> &ConvLstmCell<B> {
        &self.cell
    }

    /// Recur from the handed-off state, then transform
    ///
    /// `inputs` is `None` only for the first block, whose cell is driven by
    /// zero frames from the encoder's terminal state alone.
    fn forward(&self, inputs: Option<Tensor<B, 5>>, state: ConvLstmState<B>) -> Tensor<B, 5> {
        let (seq, _) = self.cell.forward(inputs, Some(state));
        let [time, batch, channel, height, width] = seq.dims();
        let folded = seq.reshape([-1, channel as i32, height as i32, width as i32]);
        let folded = self.stage.forward(folded);
        let [_, channel, height, width] = folded.dims();
        folded.reshape([time, batch, channel, height, width])
    }
}

/// Stack of decoder blocks
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    blocks: Vec<DecoderBlock<B>>,
}

impl<B: Backend> Decoder<B> {
    /// Create a decoder from blocks in application order (innermost first)
    ///
    /// # Panics
    /// Panics when `blocks` is empty.
    pub fn new(blocks: Vec<DecoderBlock<B>>) -> Self {
        assert!(!blocks.is_empty(), "Decoder requires at least one block");
        Self { blocks }
    }

    /// Number of blocks
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Produce the output sequence from the encoder's terminal states
    ///
    /// # Arguments
    /// * `hidden_states` - Encoder states in encoder block order; must hold
    ///   exactly one state per decoder block
    ///
    /// # Returns
    /// Batch-major output sequence `[batch, time, channel, height, width]`,
    /// with the time length fixed by the cells' unroll configuration.
    pub fn forward(&self, hidden_states: Vec<ConvLstmState<B>>) -> Tensor<B, 5> {
        assert_eq!(
            hidden_states.len(),
            self.blocks.len(),
            "Decoder requires one encoder state per block"
        );

        // Reversed hand-off: innermost decoder block consumes the deepest
        // encoder state.
        let reversed_states = hidden_states.into_iter().rev();

        let mut inputs: Option<Tensor<B, 5>> = None;
        for (block, state) in self.blocks.iter().zip(reversed_states) {
            inputs = Some(block.forward(inputs.take(), state));
        }

        let outputs = inputs.expect("Decoder has at least one block");
        outputs.swap_dims(0, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerSpec;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type Backend = NdArray<f32>;
    type Device = <Backend as burn::tensor::backend::Backend>::Device;

    fn two_block_decoder(device: &Device) -> Decoder<Backend> {
        // Uniform feature depth and spatial shape so that a swapped state
        // pairing is still shape-compatible (and only wrong by value).
        Decoder::new(vec![
            DecoderBlock::new(
                ConvLstmCell::new((8, 8), 8, 5, 8, 3, device),
                SpatialStage::new(&LayerSpec::new().with("conv1_leaky_1", &[8, 8, 3, 1, 1]), device),
            ),
            DecoderBlock::new(
                ConvLstmCell::new((8, 8), 8, 5, 8, 3, device),
                SpatialStage::new(&LayerSpec::new().with("conv2_1", &[8, 1, 1, 1, 0]), device),
            ),
        ])
    }

    fn random_state(device: &Device) -> ConvLstmState<Backend> {
        (
            Tensor::<Backend, 4>::random([2, 8, 8, 8], Distribution::Uniform(-1.0, 1.0), device),
            Tensor::<Backend, 4>::random([2, 8, 8, 8], Distribution::Uniform(-1.0, 1.0), device),
        )
    }

    #[test]
    fn test_decoder_output_shape() {
        let device = Default::default();
        let decoder = two_block_decoder(&device);

        let states = vec![random_state(&device), random_state(&device)];
        let output = decoder.forward(states);

        // Time length comes from the cells' unroll configuration
        assert_eq!(output.dims(), [2, 3, 1, 8, 8]);
    }

    #[test]
    fn test_swapped_handoff_changes_output() {
        let device = Default::default();
        let decoder = two_block_decoder(&device);

        let states = vec![random_state(&device), random_state(&device)];
        let swapped: Vec<_> = states.iter().cloned().rev().collect();

        let reference = decoder.forward(states);
        let wrong_pairing = decoder.forward(swapped);

        assert_ne!(reference.into_data(), wrong_pairing.into_data());
    }

    #[test]
    #[should_panic(expected = "one encoder state per block")]
    fn test_state_count_mismatch_rejected() {
        let device = Default::default();
        let decoder = two_block_decoder(&device);
        let _ = decoder.forward(vec![random_state(&device)]);
    }
}
