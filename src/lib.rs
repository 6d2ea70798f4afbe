//! # roptim
//!
//! Optimizer algorithms and learning-rate schedulers for neural-network
//! training, built on [`ndarray`].
//!
//! The crate owns the optimization layer of a training loop and nothing
//! else: a [`ParamSource`] hands over ordered `(parameter, gradient)` pairs,
//! an [`Optimizer`] turns the gradients into in-place parameter updates, and
//! an [`LrScheduler`] wrapped around the optimizer decays its learning rate
//! as training progresses. The layer graph, forward/backward computation and
//! the tensor primitives themselves all live outside this crate.
//!
//! ```no_run
//! use roptim::{Adam, LrScheduler, Optimizer, StepLR, Tensor};
//!
//! # fn params_and_grads() -> Vec<(Tensor, Tensor)> { Vec::new() }
//! # fn main() -> roptim::Result<()> {
//! let mut source: Vec<(Tensor, Tensor)> = params_and_grads();
//! let mut sched = StepLR::new(Adam::new(1e-3), 30, 0.1)?;
//! for _epoch in 0..100 {
//!     // ... forward/backward refreshes the gradients ...
//!     sched.optimizer_mut().step(&mut source)?;
//!     sched.step();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Not thread-safe: a single training loop drives a single
//! optimizer/scheduler pair, so the learning rate is a plain field with no
//! synchronization.

pub mod error;
pub mod optim;
pub mod params;

pub use error::{OptimError, Result};
pub use optim::{
    Adam, ExponentialLR, LinearLR, LrScheduler, Momentum, MultiStepLR, Optimizer, RMSProp, StepLR,
    SGD,
};
pub use params::{ParamSource, Tensor, TensorData};
