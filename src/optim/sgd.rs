//! # Stochastic Gradient Descent (SGD) Optimizer

use ndarray::Array1;

use super::Optimizer;
use crate::params::TensorData;

/// Plain stochastic gradient descent: `step = -lr * grad`.
///
/// The simplest rule and the baseline the other optimizers are measured
/// against. Keeps no state between steps.
pub struct SGD {
    lr: TensorData,
    weight_decay: TensorData,
}

impl SGD {
    /// Creates an SGD optimizer with the given learning rate.
    pub fn new(lr: TensorData) -> Self {
        SGD {
            lr,
            weight_decay: 0.0,
        }
    }

    /// Set the weight decay coefficient (L2 penalty, default 0).
    pub fn with_weight_decay(mut self, weight_decay: TensorData) -> Self {
        self.weight_decay = weight_decay;
        self
    }
}

impl Optimizer for SGD {
    fn lr(&self) -> TensorData {
        self.lr
    }

    fn set_lr(&mut self, lr: TensorData) {
        self.lr = lr;
    }

    fn weight_decay(&self) -> TensorData {
        self.weight_decay
    }

    fn compute_step(&mut self, grads: &Array1<TensorData>) -> Array1<TensorData> {
        grads * -self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Tensor;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn update_is_exactly_minus_lr_times_grad() {
        let mut source: Vec<(Tensor, Tensor)> = vec![(
            array![[1.0f32, 2.0], [3.0, 4.0]].into_dyn(),
            array![[0.5f32, 0.5], [0.5, 0.5]].into_dyn(),
        )];

        let mut opt = SGD::new(0.1);
        opt.step(&mut source).unwrap();

        let expected = array![[0.95f32, 1.95], [2.95, 3.95]].into_dyn();
        for (got, want) in source[0].0.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-6);
        }
    }

    #[test]
    fn weight_decay_shrinks_parameters() {
        let mut source: Vec<(Tensor, Tensor)> =
            vec![(array![2.0f32].into_dyn(), array![1.0f32].into_dyn())];

        let mut opt = SGD::new(0.1).with_weight_decay(0.01);
        opt.step(&mut source).unwrap();

        // update = -0.1 * 1.0 - 0.01 * 2.0 = -0.12
        assert_abs_diff_eq!(source[0].0[[0]], 1.88, epsilon = 1e-6);
    }

    #[test]
    fn repeated_steps_keep_shapes() {
        let mut source: Vec<(Tensor, Tensor)> = vec![(
            array![[1.0f32, 2.0, 3.0]].into_dyn(),
            array![[0.1f32, 0.1, 0.1]].into_dyn(),
        )];

        let mut opt = SGD::new(0.05);
        for _ in 0..10 {
            opt.step(&mut source).unwrap();
        }
        assert_eq!(source[0].0.shape(), &[1, 3]);
    }
}
