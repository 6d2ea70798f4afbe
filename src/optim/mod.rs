//! # Optimization Algorithms (`optim`)
//!
//! Implementations of the optimization algorithms that turn gradients into
//! parameter updates, plus the learning-rate schedulers that adjust the
//! learning rate over the course of training.
//!
//! Every step rule operates on a single flattened gradient vector: the
//! provided [`Optimizer::step`] concatenates all gradients in source order,
//! delegates to the rule, then slices the result back into per-parameter
//! blocks. Accumulator state (momentum buffers, moment estimates) therefore
//! lives as one vector aligned with the concatenation, and the rules stay
//! fully decoupled from parameter shapes.
//!
//! Not thread-safe: a single training loop is assumed to drive a single
//! optimizer/scheduler pair sequentially.

use log::trace;
use ndarray::{s, Array1};

use crate::error::{OptimError, Result};
use crate::params::{ParamSource, Tensor, TensorData};

// --- Submodules ---
pub mod adam;
pub mod lr_scheduler;
pub mod momentum;
pub mod rmsprop;
pub mod sgd;

// Re-export optimizers and schedulers
pub use adam::Adam;
pub use lr_scheduler::{ExponentialLR, LinearLR, LrScheduler, MultiStepLR, StepLR};
pub use momentum::Momentum;
pub use rmsprop::RMSProp;
pub use sgd::SGD;

/// Base trait for all optimizers.
///
/// Concrete optimizers supply their hyperparameter accessors and the step
/// rule ([`compute_step`](Optimizer::compute_step)); the flatten/reshape/apply
/// protocol is shared and lives in the provided [`step`](Optimizer::step).
pub trait Optimizer {
    /// Current learning rate. Schedulers overwrite this between steps.
    fn lr(&self) -> TensorData;

    /// Install a new learning rate (the write path used by schedulers).
    fn set_lr(&mut self, lr: TensorData);

    /// Weight decay coefficient, fixed at construction.
    fn weight_decay(&self) -> TensorData;

    /// Compute the flattened step vector for a flattened gradient vector.
    ///
    /// Called exactly once per [`step`](Optimizer::step) invocation. Stateful
    /// rules treat successive calls as a first-order recurrence, so call
    /// order matters and the flattened length must not change between calls.
    /// The returned vector must have the same length as `grads`.
    fn compute_step(&mut self, grads: &Array1<TensorData>) -> Array1<TensorData>;

    /// Perform a single optimization step over every parameter of `source`.
    ///
    /// Gradients are flattened and concatenated in source order, the step
    /// rule runs once over the whole vector, and each parameter then receives
    /// its block of the result, reshaped to the parameter's shape with
    /// `weight_decay * parameter` subtracted, added in place.
    ///
    /// Returns the per-parameter updates actually applied, in source order.
    ///
    /// # Errors
    ///
    /// [`OptimError::ShapeMismatch`] if a gradient's shape differs from its
    /// parameter's; [`OptimError::StepLengthMismatch`] if the step rule
    /// returns a vector of the wrong length. In both cases no parameter has
    /// been modified yet.
    fn step(&mut self, source: &mut dyn ParamSource) -> Result<Vec<Tensor>> {
        let pairs = source.params_and_grads();

        // Flatten all gradients, checking each against its parameter.
        let total: usize = pairs.iter().map(|(_, grad)| grad.len()).sum();
        let mut flat = Vec::with_capacity(total);
        for (param, grad) in &pairs {
            if grad.shape() != param.shape() {
                return Err(OptimError::ShapeMismatch {
                    expected: param.shape().to_vec(),
                    got: grad.shape().to_vec(),
                });
            }
            flat.extend(grad.iter().copied());
        }
        let flat_grads = Array1::from_vec(flat);

        let flat_step = self.compute_step(&flat_grads);
        if flat_step.len() != total {
            return Err(OptimError::StepLengthMismatch {
                expected: total,
                got: flat_step.len(),
            });
        }

        // Walk the pairs again: each parameter takes the next `len` entries.
        let weight_decay = self.weight_decay();
        let mut updates = Vec::with_capacity(pairs.len());
        let mut offset = 0;
        for (param, _grad) in pairs {
            let n = param.len();
            let block = flat_step.slice(s![offset..offset + n]).to_owned();
            let mut update = block.into_shape(param.raw_dim())?;
            if weight_decay != 0.0 {
                update.zip_mut_with(param, |u, &p| *u -= weight_decay * p);
            }
            *param += &update;
            updates.push(update);
            offset += n;
        }

        trace!(
            "applied step over {} parameters ({} elements)",
            updates.len(),
            total
        );
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn step_round_trips_mixed_shapes() {
        let mut source: Vec<(Tensor, Tensor)> = vec![
            (
                array![[1.0f32, 2.0], [3.0, 4.0]].into_dyn(),
                array![[1.0f32, 1.0], [1.0, 1.0]].into_dyn(),
            ),
            (
                array![10.0f32, 20.0, 30.0].into_dyn(),
                array![2.0f32, 2.0, 2.0].into_dyn(),
            ),
        ];

        let mut opt = SGD::new(0.1);
        let updates = opt.step(&mut source).unwrap();

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].shape(), &[2, 2]);
        assert_eq!(updates[1].shape(), &[3]);
        assert_abs_diff_eq!(source[0].0[[0, 0]], 0.9, epsilon = 1e-6);
        assert_abs_diff_eq!(source[0].0[[1, 1]], 3.9, epsilon = 1e-6);
        assert_abs_diff_eq!(source[1].0[[0]], 9.8, epsilon = 1e-6);
        assert_abs_diff_eq!(source[1].0[[2]], 29.8, epsilon = 1e-6);
    }

    #[test]
    fn updates_returned_match_parameter_deltas() {
        let before = array![[0.5f32, -0.5], [1.5, -1.5]].into_dyn();
        let mut source: Vec<(Tensor, Tensor)> = vec![(
            before.clone(),
            array![[0.3f32, -0.3], [0.6, -0.6]].into_dyn(),
        )];

        let mut opt = SGD::new(0.2).with_weight_decay(0.05);
        let updates = opt.step(&mut source).unwrap();

        let delta = &source[0].0 - &before;
        for (d, u) in delta.iter().zip(updates[0].iter()) {
            assert_abs_diff_eq!(*d, *u, epsilon = 1e-6);
        }
    }

    #[test]
    fn mismatched_gradient_shape_is_rejected() {
        let mut source: Vec<(Tensor, Tensor)> = vec![(
            array![1.0f32, 2.0, 3.0].into_dyn(),
            array![1.0f32, 2.0].into_dyn(),
        )];

        let mut opt = SGD::new(0.1);
        match opt.step(&mut source) {
            Err(OptimError::ShapeMismatch { expected, got }) => {
                assert_eq!(expected, vec![3]);
                assert_eq!(got, vec![2]);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
        // The parameter must be untouched after a rejected step.
        assert_abs_diff_eq!(source[0].0[[0]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn short_step_vector_is_rejected() {
        /// A broken rule that always emits a single-element step.
        struct Truncating;

        impl Optimizer for Truncating {
            fn lr(&self) -> TensorData {
                0.1
            }
            fn set_lr(&mut self, _lr: TensorData) {}
            fn weight_decay(&self) -> TensorData {
                0.0
            }
            fn compute_step(&mut self, _grads: &Array1<TensorData>) -> Array1<TensorData> {
                Array1::zeros(1)
            }
        }

        let mut source: Vec<(Tensor, Tensor)> = vec![(
            array![1.0f32, 2.0].into_dyn(),
            array![0.5f32, 0.5].into_dyn(),
        )];

        match Truncating.step(&mut source) {
            Err(OptimError::StepLengthMismatch { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected StepLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_is_a_no_op() {
        let mut source: Vec<(Tensor, Tensor)> = Vec::new();
        let updates = SGD::new(0.1).step(&mut source).unwrap();
        assert!(updates.is_empty());
    }
}
