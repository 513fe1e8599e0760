//! Basic usage example of the two-pass ConvLSTM irradiance forecaster
//!
//! This example walks through the tensor shapes at each level of the model:
//! one encoder/decoder pass, the autoregressive two-pass forecast, and the
//! training-boundary loss.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use irradianet::prelude::*;

fn main() {
    println!("=== IrradiaNet Forecast Example ===\n");

    // Use the NdArray backend (CPU)
    type Backend = NdArray<f32>;
    let device = Default::default();

    let seq_len = 4;
    let in_channels = 1;
    let image_size = 16;

    // Example 1: one encoder/decoder pass
    println!("Example 1: Single pass");
    let model = Seq2Seq::<Backend>::new(seq_len, in_channels, image_size, &device);

    // Input shape: [batch=2, time=4, height=16, width=16, channel=1]
    let frames = Tensor::<Backend, 5>::random(
        [2, seq_len, image_size, image_size, in_channels],
        Distribution::Uniform(0.0, 1.0),
        &device,
    );

    let forecast = model.forward(frames);
    println!("  Input shape:    [2, {seq_len}, {image_size}, {image_size}, {in_channels}]");
    println!("  Forecast shape: {:?}", forecast.dims());
    println!();

    // Example 2: two-pass autoregressive forecast, channel-first convention
    println!("Example 2: Two-pass forecast");
    let net = IrradianceNet::new(Forecaster::<Backend>::new(
        seq_len, in_channels, image_size, &device,
    ));

    let x = Tensor::<Backend, 5>::random(
        [2, in_channels, seq_len, image_size, image_size],
        Distribution::Uniform(0.0, 1.0),
        &device,
    );

    let y_pred = net.forward(x.clone());
    println!("  Input shape:  [2, {in_channels}, {seq_len}, {image_size}, {image_size}]");
    println!("  Output shape: {:?} (both horizons concatenated)", y_pred.dims());
    println!();

    // Example 3: training-boundary loss
    println!("Example 3: Loss");
    let loss = net.loss(x, y_pred);
    println!("  MSE against own forecast: {}", loss.into_scalar());
    println!();

    // For training, switch to an autodiff backend and hand the loss to an
    // optimizer owned by the training loop:
    //
    // type Backend = Autodiff<NdArray<f32>>;
    // let loss = net.loss(x, y);
    // let grads = GradientsParams::from_grads(loss.backward(), &net);
    // net = optim.step(lr, net, grads);
    println!("Done.");
}
