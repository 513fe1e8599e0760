//! Declarative Spatial Transform Stages
//!
//! A [`SpatialStage`] is a stack of 2D convolution, transposed convolution and
//! max-pooling operations, each optionally followed by an activation, built
//! from an ordered [`LayerSpec`]. Entry order in the spec is execution order.
//!
//! Operations are dispatched by name substring:
//!
//! | Name contains | Operation | Params |
//! |---------------|-----------|--------|
//! | `pool` | Max pooling | `[kernel, stride, padding]` |
//! | `deconv` | Transposed convolution | `[in, out, kernel, stride, padding]` |
//! | `conv` (not `deconv`) | Convolution | `[in, out, kernel, stride, padding]` |
//!
//! A conv/deconv name additionally containing `relu` appends a ReLU, or
//! `leaky` a LeakyReLU with negative slope 0.2. Any other name is a fatal
//! configuration error.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig};
use burn::nn::pool::{MaxPool2d, MaxPool2dConfig};
use burn::nn::{LeakyRelu, LeakyReluConfig, PaddingConfig2d, Relu};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Ordered mapping from stage name to operation parameters.
///
/// Insertion order defines execution order of the resulting stage.
///
/// # Example
///
/// ```ignore
/// let spec = LayerSpec::new()
///     .with("conv1_leaky_1", &[1, 32, 3, 1, 1])
///     .with("conv2_leaky_1", &[32, 32, 3, 2, 1]);
/// let stage = SpatialStage::<Backend>::new(&spec, &device);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSpec {
    entries: Vec<(String, Vec<usize>)>,
}

impl LayerSpec {
    /// Create an empty specification
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a named operation
    ///
    /// # Arguments
    /// * `name` - Stage name; the substring dispatch rules above apply
    /// * `params` - `[in, out, kernel, stride, padding]` for conv/deconv,
    ///   `[kernel, stride, padding]` for pooling
    pub fn with(mut self, name: &str, params: &[usize]) -> Self {
        self.entries.push((name.to_string(), params.to_vec()));
        self
    }

    /// Named entries in execution order
    pub fn entries(&self) -> &[(String, Vec<usize>)] {
        &self.entries
    }
}

/// One operation of a spatial stage
#[derive(Module, Debug)]
pub enum SpatialOp<B: Backend> {
    /// 2D convolution
    Conv(Conv2d<B>),
    /// 2D transposed convolution
    Deconv(ConvTranspose2d<B>),
    /// 2D max pooling
    Pool(MaxPool2d),
    /// ReLU activation
    Relu(Relu),
    /// LeakyReLU activation, negative slope 0.2
    LeakyRelu(LeakyRelu),
}

impl<B: Backend> SpatialOp<B> {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        match self {
            SpatialOp::Conv(conv) => conv.forward(input),
            SpatialOp::Deconv(deconv) => deconv.forward(input),
            SpatialOp::Pool(pool) => pool.forward(input),
            SpatialOp::Relu(relu) => relu.forward(input),
            SpatialOp::LeakyRelu(leaky) => leaky.forward(input),
        }
    }
}

/// A composed spatial transform built from a [`LayerSpec`]
///
/// Applies each operation in specification order over a
/// `[batch, channel, height, width]` tensor.
#[derive(Module, Debug)]
pub struct SpatialStage<B: Backend> {
    ops: Vec<SpatialOp<B>>,
}

impl<B: Backend> SpatialStage<B> {
    /// Build a stage from a specification
    ///
    /// # Panics
    /// Panics on an entry whose name matches none of the dispatch rules.
    /// Malformed parameter lists surface as index panics or Burn config
    /// errors; configuration errors here are fatal by design.
    pub fn new(spec: &LayerSpec, device: &B::Device) -> Self {
        let mut ops = Vec::new();

        for (name, v) in spec.entries() {
            if name.contains("pool") {
                let pool = MaxPool2dConfig::new([v[0], v[0]])
                    .with_strides([v[1], v[1]])
                    .with_padding(PaddingConfig2d::Explicit(v[2], v[2]))
                    .init();
                ops.push(SpatialOp::Pool(pool));
            } else if name.contains("deconv") {
                let deconv = ConvTranspose2dConfig::new([v[0], v[1]], [v[2], v[2]])
                    .with_stride([v[3], v[3]])
                    .with_padding([v[4], v[4]])
                    .init(device);
                ops.push(SpatialOp::Deconv(deconv));
                Self::push_activation(&mut ops, name);
            } else if name.contains("conv") {
                let conv = Conv2dConfig::new([v[0], v[1]], [v[2], v[2]])
                    .with_stride([v[3], v[3]])
                    .with_padding(PaddingConfig2d::Explicit(v[4], v[4]))
                    .init(device);
                ops.push(SpatialOp::Conv(conv));
                Self::push_activation(&mut ops, name);
            } else {
                panic!("Unrecognized layer kind: {name}. Name must contain 'pool', 'deconv' or 'conv'");
            }
        }

        Self { ops }
    }

    fn push_activation(ops: &mut Vec<SpatialOp<B>>, name: &str) {
        if name.contains("relu") {
            ops.push(SpatialOp::Relu(Relu::new()));
        } else if name.contains("leaky") {
            ops.push(SpatialOp::LeakyRelu(
                LeakyReluConfig::new().with_negative_slope(0.2).init(),
            ));
        }
    }

    /// Number of operations, activations included
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the stage holds no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every operation in order
    ///
    /// # Arguments
    /// * `input` - Tensor of shape `[batch, channel, height, width]`
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = input;
        for op in &self.ops {
            x = op.forward(x);
        }
        x
    }
}
