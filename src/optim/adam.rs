//! # Adam Optimizer
//!
//! Reference: Adam: A Method for Stochastic Optimization - https://arxiv.org/abs/1412.6980

use ndarray::{Array1, Zip};

use super::Optimizer;
use crate::params::TensorData;

/// Adaptive moment estimation.
///
/// Maintains exponential averages of the gradient (`m`) and its square (`v`)
/// and folds the bias correction for their zero initialization into the
/// effective step size:
///
/// ```text
/// t   += 1
/// lr_t = lr * sqrt(1 - beta2^t) / (1 - beta1^t)
/// m    = beta1 * m + (1 - beta1) * grad
/// v    = beta2 * v + (1 - beta2) * grad²
/// step = -lr_t * m / (sqrt(v) + eps)
/// ```
pub struct Adam {
    lr: TensorData,
    beta1: TensorData,
    beta2: TensorData,
    eps: TensorData,
    weight_decay: TensorData,
    /// Step counter, drives the bias correction.
    t: u64,
    /// First moment estimate over the flattened gradient.
    m: Option<Array1<TensorData>>,
    /// Second moment estimate over the flattened gradient.
    v: Option<Array1<TensorData>>,
}

impl Adam {
    /// Creates an Adam optimizer.
    ///
    /// Defaults from the paper: `beta1 = 0.9`, `beta2 = 0.999`, `eps = 1e-8`.
    pub fn new(lr: TensorData) -> Self {
        Adam {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
            t: 0,
            m: None,
            v: None,
        }
    }

    /// Set beta1 (first-moment decay rate).
    pub fn with_beta1(mut self, beta1: TensorData) -> Self {
        self.beta1 = beta1;
        self
    }

    /// Set beta2 (second-moment decay rate).
    pub fn with_beta2(mut self, beta2: TensorData) -> Self {
        self.beta2 = beta2;
        self
    }

    /// Set the numerical stability term.
    pub fn with_eps(mut self, eps: TensorData) -> Self {
        self.eps = eps;
        self
    }

    /// Set the weight decay coefficient (L2 penalty, default 0).
    pub fn with_weight_decay(mut self, weight_decay: TensorData) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Number of step-rule invocations so far.
    pub fn step_count(&self) -> u64 {
        self.t
    }
}

impl Optimizer for Adam {
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
        self.t += 1;
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.eps);
        let lr_t = self.lr * (1.0 - beta2.powi(self.t as i32)).sqrt()
            / (1.0 - beta1.powi(self.t as i32));

        let n = grads.len();
        let m = self.m.get_or_insert_with(|| Array1::zeros(n));
        let v = self.v.get_or_insert_with(|| Array1::zeros(n));

        m.zip_mut_with(grads, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(grads, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        Zip::from(&*m)
            .and(&*v)
            .map_collect(|&m, &v| -lr_t * m / (v.sqrt() + eps))
    }
}
