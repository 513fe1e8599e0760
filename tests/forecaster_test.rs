#[cfg(test)]
mod tests {
    use burn::backend::{Autodiff, NdArray};
    use burn::tensor::{Distribution, Tensor};
    use irradianet::prelude::*;

    type Backend = NdArray<f32>;

    // Small geometry keeps CPU runtime sane; the size pyramid arithmetic is
    // the same as at full resolution (s1=16, s2=12, s3=8, s4=4).
    const SEQ_LEN: usize = 4;
    const IMAGE_SIZE: usize = 16;

    fn create_net() -> IrradianceNet<Backend> {
        let device = Default::default();
        IrradianceNet::new(Forecaster::new(SEQ_LEN, 1, IMAGE_SIZE, &device))
    }

    fn random_input(batch: usize) -> Tensor<Backend, 5> {
        let device = Default::default();
        Tensor::random(
            [batch, 1, SEQ_LEN, IMAGE_SIZE, IMAGE_SIZE],
            Distribution::Uniform(0.0, 1.0),
            &device,
        )
    }

    #[test]
    fn test_two_pass_round_trip_shape() {
        let net = create_net();
        let x = random_input(2);

        let y_pred = net.forward(x);

        // Two passes of SEQ_LEN frames, concatenated along time, channel-first
        assert_eq!(y_pred.dims(), [2, 1, 2 * SEQ_LEN, IMAGE_SIZE, IMAGE_SIZE]);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let net = create_net();
        let x = random_input(1);

        let first = net.forward(x.clone());
        let second = net.forward(x);

        assert_eq!(first.into_data(), second.into_data());
    }

    #[test]
    fn test_loss_zero_against_own_forecast() {
        let net = create_net();
        let x = random_input(1);

        let y = net.forward(x.clone());
        let loss = net.loss(x, y).into_scalar();

        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_loss_positive_against_other_target() {
        let device = Default::default();
        let net = create_net();
        let x = random_input(1);

        let y = Tensor::<Backend, 5>::zeros(
            [1, 1, 2 * SEQ_LEN, IMAGE_SIZE, IMAGE_SIZE],
            &device,
        ) + 10.0;
        let loss = net.loss(x, y).into_scalar();

        assert!(loss > 0.0);
    }

    #[test]
    fn test_loss_backward_on_autodiff_backend() {
        type TrainBackend = Autodiff<NdArray<f32>>;
        let device = Default::default();

        let net = IrradianceNet::<TrainBackend>::new(Forecaster::new(2, 1, IMAGE_SIZE, &device));
        let x = Tensor::<TrainBackend, 5>::random(
            [1, 1, 2, IMAGE_SIZE, IMAGE_SIZE],
            Distribution::Uniform(0.0, 1.0),
            &device,
        );
        let y = Tensor::<TrainBackend, 5>::random(
            [1, 1, 4, IMAGE_SIZE, IMAGE_SIZE],
            Distribution::Uniform(0.0, 1.0),
            &device,
        );

        let loss = net.loss(x, y);
        // Gradient bookkeeping is delegated entirely to the backend
        let _grads = loss.backward();
    }
}
