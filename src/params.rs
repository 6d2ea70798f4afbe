//! # Parameters and Gradients
//!
//! The contract between the optimizer and whatever owns the trainable
//! parameters (a layer graph, a flat parameter list, ...). This crate never
//! sees the network structure; it only walks `(parameter, gradient)` pairs.

use ndarray::ArrayD;

/// Element type for all tensors handled by this crate.
pub type TensorData = f32;

/// An n-dimensional array of [`TensorData`].
///
/// Parameters, gradients and the per-parameter updates returned by
/// [`Optimizer::step`](crate::optim::Optimizer::step) are all `Tensor`s.
pub type Tensor = ArrayD<TensorData>;

/// A source of ordered `(parameter, gradient)` pairs.
///
/// The optimizer reads the pairs once per `step` call, flattens the gradients
/// into one vector, and applies per-parameter updates in place. The contract:
///
/// - ordering is stable for the duration of one `step` call (the
///   flatten/reshape round-trip depends on it);
/// - every gradient has the same shape as its parameter;
/// - gradients are read-only snapshots valid for the duration of the call;
/// - the parameter set is fixed once training starts, since stateful rules
///   keep accumulators aligned with the flattened layout.
pub trait ParamSource {
    /// Return the ordered `(parameter, gradient)` pairs for this step.
    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &Tensor)>;
}

/// A plain list of owned `(parameter, gradient)` pairs is a valid source.
/// Convenient in tests and small programs without a layer abstraction.
impl ParamSource for Vec<(Tensor, Tensor)> {
    fn params_and_grads(&mut self) -> Vec<(&mut Tensor, &Tensor)> {
        self.iter_mut().map(|(p, g)| (p, &*g)).collect()
    }
}
