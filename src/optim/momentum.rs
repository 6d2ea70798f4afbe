//! # SGD with Momentum

use ndarray::Array1;

use super::Optimizer;
use crate::params::TensorData;

/// Gradient descent with a velocity accumulator:
///
/// ```text
/// acc  = momentum * acc + grad
/// step = -lr * acc
/// ```
///
/// The accumulator smooths the descent direction across steps. With
/// `momentum = 0` this reduces exactly to [`SGD`](super::SGD).
pub struct Momentum {
    lr: TensorData,
    momentum: TensorData,
    weight_decay: TensorData,
    /// Velocity over the flattened gradient, allocated on the first step.
    acc: Option<Array1<TensorData>>,
}

impl Momentum {
    /// Creates a momentum optimizer (momentum factor defaults to 0.9).
    pub fn new(lr: TensorData) -> Self {
        Momentum {
            lr,
            momentum: 0.9,
            weight_decay: 0.0,
            acc: None,
        }
    }

    /// Set the momentum factor.
    pub fn with_momentum(mut self, momentum: TensorData) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the weight decay coefficient (L2 penalty, default 0).
    pub fn with_weight_decay(mut self, weight_decay: TensorData) -> Self {
        self.weight_decay = weight_decay;
        self
    }
}

impl Optimizer for Momentum {
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
        let lr = self.lr;
        let momentum = self.momentum;
        let acc = self
            .acc
            .get_or_insert_with(|| Array1::zeros(grads.len()));
        acc.zip_mut_with(grads, |a, &g| *a = momentum * *a + g);
        &*acc * -lr
    }
}

#[cfg(test)]
mod tests {
    use super::super::SGD;
    use super::*;
    use crate::params::Tensor;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn zero_momentum_reduces_to_sgd() {
        let param = array![1.0f32, -2.0, 3.0].into_dyn();
        let grad = array![0.4f32, -0.2, 0.8].into_dyn();

        let mut momentum_source: Vec<(Tensor, Tensor)> = vec![(param.clone(), grad.clone())];
        let mut sgd_source: Vec<(Tensor, Tensor)> = vec![(param, grad)];

        let mut momentum = Momentum::new(0.1).with_momentum(0.0);
        let mut sgd = SGD::new(0.1);
        for _ in 0..3 {
            momentum.step(&mut momentum_source).unwrap();
            sgd.step(&mut sgd_source).unwrap();
        }

        for (a, b) in momentum_source[0].0.iter().zip(sgd_source[0].0.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn velocity_accumulates_across_steps() {
        let mut source: Vec<(Tensor, Tensor)> =
            vec![(array![1.0f32].into_dyn(), array![1.0f32].into_dyn())];

        let mut opt = Momentum::new(0.1);
        // step 1: acc = 1.0, update = -0.1
        opt.step(&mut source).unwrap();
        assert_abs_diff_eq!(source[0].0[[0]], 0.9, epsilon = 1e-6);
        // step 2: acc = 0.9 * 1.0 + 1.0 = 1.9, update = -0.19
        opt.step(&mut source).unwrap();
        assert_abs_diff_eq!(source[0].0[[0]], 0.71, epsilon = 1e-6);
    }
}
