//! # RMSProp Optimizer

use ndarray::{Array1, Zip};

use super::Optimizer;
use crate::params::TensorData;

/// RMSProp maintains a discounted average of squared gradients and divides
/// the gradient by its root, optionally accumulating the scaled result into
/// a momentum buffer:
///
/// ```text
/// mean_square = decay * mean_square + (1 - decay) * grad²
/// mom         = momentum * mom + lr * grad / sqrt(mean_square + eps)
/// step        = -mom
/// ```
///
/// `eps` guards the division when the mean-square estimate is still zero
/// (e.g. a zero gradient on the first step).
pub struct RMSProp {
    lr: TensorData,
    decay: TensorData,
    momentum: TensorData,
    eps: TensorData,
    weight_decay: TensorData,
    /// Discounted average of squared gradients, allocated on the first step.
    mean_square: Option<Array1<TensorData>>,
    /// Momentum buffer over the scaled gradient, allocated on the first step.
    mom: Option<Array1<TensorData>>,
}

impl RMSProp {
    /// Creates an RMSProp optimizer.
    ///
    /// Defaults: `decay = 0.99`, `momentum = 0.0`, `eps = 1e-8`.
    pub fn new(lr: TensorData) -> Self {
        RMSProp {
            lr,
            decay: 0.99,
            momentum: 0.0,
            eps: 1e-8,
            weight_decay: 0.0,
            mean_square: None,
            mom: None,
        }
    }

    /// Set the mean-square decay rate.
    pub fn with_decay(mut self, decay: TensorData) -> Self {
        self.decay = decay;
        self
    }

    /// Set the momentum factor.
    pub fn with_momentum(mut self, momentum: TensorData) -> Self {
        self.momentum = momentum;
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
}

impl Optimizer for RMSProp {
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
        let (lr, decay, momentum, eps) = (self.lr, self.decay, self.momentum, self.eps);
        let n = grads.len();
        let mean_square = self
            .mean_square
            .get_or_insert_with(|| Array1::zeros(n));
        let mom = self.mom.get_or_insert_with(|| Array1::zeros(n));

        mean_square.zip_mut_with(grads, |ms, &g| *ms = decay * *ms + (1.0 - decay) * g * g);
        Zip::from(&mut *mom)
            .and(&*mean_square)
            .and(grads)
            .for_each(|mo, &ms, &g| *mo = momentum * *mo + lr * g / (ms + eps).sqrt());

        mom.mapv(|mo| -mo)
    }
}
