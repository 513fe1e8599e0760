//! Encoder Stack
//!
//! The encoder is an ordered list of blocks, each pairing a downsampling
//! [`SpatialStage`] with a [`ConvLstmCell`]. An input sequence runs forward
//! through every block; the terminal recurrent state of each block is
//! collected for hand-off to the decoder.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cell::{ConvLstmCell, ConvLstmState};
use crate::layers::SpatialStage;

/// One encoder level: spatial transform, then recurrence
#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    stage: SpatialStage<B>,
    cell: ConvLstmCell<B>,
}

impl<B: Backend> EncoderBlock<B> {
    /// Pair a spatial stage with a recurrent cell
    pub fn new(stage: SpatialStage<B>, cell: ConvLstmCell<B>) -> Self {
        Self { stage, cell }
    }

    /// The block's recurrent cell
    pub fn cell(&self) -> &ConvLstmCell<B> {
        &self.cell
    }

    /// Transform and recur over one time-major sequence
    ///
    /// Time is folded into the batch axis around the spatial stage, then the
    /// cell runs from a fresh zero state.
    fn forward(&self, inputs: Tensor<B, 5>) -> (Tensor<B, 5>, ConvLstmState<B>) {
        let [time, batch, channel, height, width] = inputs.dims();
        let folded = inputs.reshape([-1, channel as i32, height as i32, width as i32]);
        let folded = self.stage.forward(folded);
        let [_, channel, height, width] = folded.dims();
        let seq = folded.reshape([time, batch, channel, height, width]);
        self.cell.forward(Some(seq), None)
    }
}

/// Stack of encoder blocks
///
/// # Example
///
/// ```ignore
/// let encoder = Encoder::new(vec![block1, block2, block3]);
/// let states = encoder.forward(inputs); // one terminal state per block
/// ```
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    blocks: Vec<EncoderBlock<B>>,
}

impl<B: Backend> Encoder<B> {
    /// Create an encoder from blocks in execution order
    ///
    /// # Panics
    /// Panics when `blocks` is empty.
    pub fn new(blocks: Vec<EncoderBlock<B>>) -> Self {
        assert!(!blocks.is_empty(), "Encoder requires at least one block");
        Self { blocks }
    }

    /// Number of blocks
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Run the input sequence through every block
    ///
    /// # Arguments
    /// * `inputs` - Batch-major sequence `[batch, time, channel, height, width]`
    ///
    /// # Returns
    /// Terminal `(hidden, cell)` states in block order, block 0 first.
    pub fn forward(&self, inputs: Tensor<B, 5>) -> Vec<ConvLstmState<B>> {
        let mut inputs = inputs.swap_dims(0, 1);
        log::debug!("encoder input dims: {:?}", inputs.dims());

        let mut hidden_states = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let (outputs, state) = block.forward(inputs);
            inputs = outputs;
            hidden_states.push(state);
        }
        hidden_states
    }
}
