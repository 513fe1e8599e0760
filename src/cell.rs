//! ConvLSTM Cell Implementation
//!
//! A ConvLSTM cell computes its gate activations with a convolution instead of
//! a full linear map, preserving the spatial structure of its input. This is
//! the recurrent workhorse of the encoder/decoder stacks: each invocation
//! unrolls a fixed number of time steps and returns the full hidden sequence
//! together with the terminal `(hidden, cell)` state.
//!
//! ## Gate equations
//!
//! Per time step, with `x` the input frame and `(h, c)` the carried state:
//!
//! - `(i, f, g, o) = split(GroupNorm(Conv([x; h])))`
//! - `c' = sigmoid(f) * c + sigmoid(i) * tanh(g)`
//! - `h' = sigmoid(o) * tanh(c')`
//!
//! ## Unroll length
//!
//! The cell always unrolls exactly its configured `seq_len` steps. The actual
//! length of the supplied sequence does not participate: a longer sequence is
//! truncated, a missing one is replaced by zero frames (the decoder's first
//! block drives its cell purely from the encoder's terminal state this way).

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{GroupNorm, GroupNormConfig, PaddingConfig2d};
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Recurrent state of a [`ConvLstmCell`]: `(hidden, cell)`, each of shape
/// `[batch, num_features, height, width]`.
pub type ConvLstmState<B> = (Tensor<B, 4>, Tensor<B, 4>);

/// A convolutional LSTM cell with a fixed unroll length
///
/// The gate transform is a single convolution from `input_channels +
/// num_features` to `4 * num_features` channels, followed by group
/// normalization with `4 * num_features / 32` groups. Padding is
/// `(filter_size - 1) / 2` so the spatial size is preserved.
///
/// `4 * num_features` divisible by 32 is an unchecked precondition of the
/// group count; non-compliant feature counts fail inside Burn.
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct ConvLstmCell<B: Backend> {
    conv: Conv2d<B>,
    norm: GroupNorm<B>,
    height: usize,
    width: usize,
    input_channels: usize,
    num_features: usize,
    seq_len: usize,
}

impl<B: Backend> ConvLstmCell<B> {
    /// Create a new ConvLSTM cell
    ///
    /// # Arguments
    /// * `shape` - Spatial shape `(height, width)` of input and state
    /// * `input_channels` - Channel count of each input frame
    /// * `filter_size` - Square gate-convolution kernel size
    /// * `num_features` - Hidden/cell channel depth
    /// * `seq_len` - Fixed unroll length
    /// * `device` - Device to create the module on
    pub fn new(
        shape: (usize, usize),
        input_channels: usize,
        filter_size: usize,
        num_features: usize,
        seq_len: usize,
        device: &B::Device,
    ) -> Self {
        let padding = (filter_size - 1) / 2;
        let conv = Conv2dConfig::new(
            [input_channels + num_features, 4 * num_features],
            [filter_size, filter_size],
        )
        .with_padding(PaddingConfig2d::Explicit(padding, padding))
        .init(device);

        // group count fixed at 4F/32; best for regression
        let norm = GroupNormConfig::new(4 * num_features / 32, 4 * num_features).init(device);

        Self {
            conv,
            norm,
            height: shape.0,
            width: shape.1,
            input_channels,
            num_features,
            seq_len,
        }
    }

    /// Spatial shape `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Channel count of each input frame
    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    /// Hidden/cell channel depth
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Fixed unroll length
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Unroll the cell for its configured number of steps
    ///
    /// # Arguments
    /// * `inputs` - Optional time-major sequence
    ///   `[time, batch, input_channels, height, width]`. When absent, every
    ///   step consumes a zero frame.
    /// * `state` - Optional initial `(hidden, cell)` state. When absent, both
    ///   start zero-filled with the batch size taken from `inputs`.
    ///
    /// # Returns
    /// Tuple of (outputs, state) where:
    /// - outputs: stacked hidden sequence `[seq_len, batch, num_features, height, width]`
    /// - state: terminal `(hidden, cell)`, each `[batch, num_features, height, width]`
    ///
    /// # Panics
    /// Panics when both `inputs` and `state` are absent; one of them must fix
    /// the batch size and device.
    pub fn forward(
        &self,
        inputs: Option<Tensor<B, 5>>,
        state: Option<ConvLstmState<B>>,
    ) -> (Tensor<B, 5>, ConvLstmState<B>) {
        let (batch_size, device) = match (&inputs, &state) {
            (Some(x), _) => (x.dims()[1], x.device()),
            (None, Some((hx, _))) => (hx.dims()[0], hx.device()),
            (None, None) => panic!("ConvLstmCell::forward requires inputs or an initial state"),
        };

        let (mut hx, mut cx) = state.unwrap_or_else(|| {
            (
                Tensor::zeros(
                    [batch_size, self.num_features, self.height, self.width],
                    &device,
                ),
                Tensor::zeros(
                    [batch_size, self.num_features, self.height, self.width],
                    &device,
                ),
            )
        });

        let mut outputs: Vec<Tensor<B, 4>> = Vec::with_capacity(self.seq_len);

        for t in 0..self.seq_len {
            let x = match &inputs {
                Some(seq) => seq.clone().narrow(0, t, 1).squeeze(0),
                None => Tensor::zeros(
                    [batch_size, self.input_channels, self.height, self.width],
                    &device,
                ),
            };

            let combined = Tensor::cat(vec![x, hx.clone()], 1);
            let gates = self.norm.forward(self.conv.forward(combined));

            // fixed gate order: input, forget, cell, output
            let chunks = gates.chunk(4, 1);
            let ingate = activation::sigmoid(chunks[0].clone());
            let forgetgate = activation::sigmoid(chunks[1].clone());
            let cellgate = activation::tanh(chunks[2].clone());
            let outgate = activation::sigmoid(chunks[3].clone());

            cx = forgetgate * cx + ingate * cellgate;
            hx = outgate * activation::tanh(cx.clone());
            outputs.push(hx.clone());
        }

        let outputs: Tensor<B, 5> = Tensor::stack(outputs, 0);
        (outputs, (hx, cx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type Backend = NdArray<f32>;

    #[test]
    fn test_cell_output_shapes() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((6, 6), 3, 5, 8, 4, &device);

        let inputs = Tensor::<Backend, 5>::random(
            [4, 2, 3, 6, 6],
            Distribution::Uniform(-1.0, 1.0),
            &device,
        );
        let (outputs, (hidden, cell_state)) = cell.forward(Some(inputs), None);

        assert_eq!(outputs.dims(), [4, 2, 8, 6, 6]);
        assert_eq!(hidden.dims(), [2, 8, 6, 6]);
        assert_eq!(cell_state.dims(), [2, 8, 6, 6]);
    }

    #[test]
    fn test_cell_unrolls_fixed_length() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((4, 4), 2, 3, 8, 3, &device);

        // Sequence longer than the configured unroll: extra steps are ignored
        let inputs = Tensor::<Backend, 5>::random(
            [7, 1, 2, 4, 4],
            Distribution::Uniform(-1.0, 1.0),
            &device,
        );
        let (outputs, _) = cell.forward(Some(inputs), None);
        assert_eq!(outputs.dims()[0], 3);
    }

    #[test]
    fn test_cell_runs_from_state_alone() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((4, 4), 2, 3, 8, 5, &device);

        let state = (
            Tensor::<Backend, 4>::random([3, 8, 4, 4], Distribution::Uniform(-1.0, 1.0), &device),
            Tensor::<Backend, 4>::zeros([3, 8, 4, 4], &device),
        );
        let (outputs, (hidden, _)) = cell.forward(None, Some(state));

        // Zero frames drive the unroll; batch size comes from the state
        assert_eq!(outputs.dims(), [5, 3, 8, 4, 4]);
        assert_eq!(hidden.dims(), [3, 8, 4, 4]);
    }

    #[test]
    #[should_panic(expected = "requires inputs or an initial state")]
    fn test_cell_rejects_missing_inputs_and_state() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((4, 4), 2, 3, 8, 2, &device);
        let _ = cell.forward(None, None);
    }

    #[test]
    fn test_gate_equations_single_step() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((4, 4), 2, 3, 8, 1, &device);

        let x = Tensor::<Backend, 4>::random([1, 2, 4, 4], Distribution::Uniform(-1.0, 1.0), &device);
        let h0 = Tensor::<Backend, 4>::random([1, 8, 4, 4], Distribution::Uniform(-1.0, 1.0), &device);
        let c0 = Tensor::<Backend, 4>::random([1, 8, 4, 4], Distribution::Uniform(-1.0, 1.0), &device);

        // Hand-apply the update rule over the same gate pre-activations
        let combined = Tensor::cat(vec![x.clone(), h0.clone()], 1);
        let gates = cell.norm.forward(cell.conv.forward(combined));
        let chunks = gates.chunk(4, 1);
        let expected_c = activation::sigmoid(chunks[1].clone()) * c0.clone()
            + activation::sigmoid(chunks[0].clone()) * activation::tanh(chunks[2].clone());
        let expected_h =
            activation::sigmoid(chunks[3].clone()) * activation::tanh(expected_c.clone());

        let inputs: Tensor<Backend, 5> = Tensor::stack(vec![x], 0);
        let (outputs, (hidden, cell_state)) = cell.forward(Some(inputs), Some((h0, c0)));

        assert_eq!(hidden.clone().into_data(), expected_h.clone().into_data());
        assert_eq!(cell_state.into_data(), expected_c.into_data());
        // The single output step is the new hidden state
        let step0: Tensor<Backend, 4> = outputs.narrow(0, 0, 1).squeeze(0);
        assert_eq!(step0.into_data(), expected_h.into_data());
    }

    #[test]
    fn test_forget_gate_scales_prior_cell() {
        let device = Default::default();
        let cell = ConvLstmCell::<Backend>::new((4, 4), 2, 3, 8, 1, &device);

        let inputs =
            Tensor::<Backend, 5>::random([1, 1, 2, 4, 4], Distribution::Uniform(-1.0, 1.0), &device);
        let h0 = Tensor::<Backend, 4>::zeros([1, 8, 4, 4], &device);

        let small = Tensor::<Backend, 4>::full([1, 8, 4, 4], 0.1, &device);
        let large = Tensor::<Backend, 4>::full([1, 8, 4, 4], 10.0, &device);

        let (_, (_, c_small)) = cell.forward(Some(inputs.clone()), Some((h0.clone(), small)));
        let (_, (_, c_large)) = cell.forward(Some(inputs), Some((h0, large)));

        // Same gates, different prior cell: the forget term must show through
        assert_ne!(c_small.into_data(), c_large.into_data());
    }
}
