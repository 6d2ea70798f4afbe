//! # Learning Rate Schedulers
//!
//! Schedulers wrap an [`Optimizer`] and rewrite its learning rate once per
//! [`LrScheduler::step`] call according to a decay policy. The wrapped
//! optimizer's `lr` field stays the single source of truth: the scheduler
//! reads through to it and only `step` ever writes it back.
//!
//! The policies compare against the absolute step counter, not an
//! epoch-relative offset: `MultiStepLR` with milestones `[2, 4]` decays on
//! exactly the 2nd and 4th call to `step`, and never again.

use log::debug;

use super::Optimizer;
use crate::error::{OptimError, Result};
use crate::params::TensorData;

/// State shared by every scheduler: the wrapped optimizer, the learning rate
/// captured at construction, and the step counter.
pub struct SchedulerState<O> {
    optim: O,
    initial_lr: TensorData,
    t: u64,
}

impl<O: Optimizer> SchedulerState<O> {
    fn new(optim: O) -> Self {
        let initial_lr = optim.lr();
        SchedulerState {
            optim,
            initial_lr,
            t: 0,
        }
    }
}

/// Base trait for learning-rate schedulers.
///
/// Policies implement [`compute_lr`](LrScheduler::compute_lr); the counter
/// handling and the single write path into the optimizer are provided here.
pub trait LrScheduler<O: Optimizer> {
    /// Shared scheduler state.
    fn state(&self) -> &SchedulerState<O>;

    /// Mutable access to the shared scheduler state.
    fn state_mut(&mut self) -> &mut SchedulerState<O>;

    /// Decay policy: the learning rate for the already-incremented counter.
    ///
    /// May read the counter, the initial learning rate and the optimizer's
    /// current learning rate. Takes `&self`: only [`step`](LrScheduler::step)
    /// commits the result to the optimizer.
    fn compute_lr(&self) -> TensorData;

    /// Advance the counter, compute the new learning rate and install it on
    /// the wrapped optimizer. Returns the new value.
    fn step(&mut self) -> TensorData {
        self.state_mut().t += 1;
        let lr = self.compute_lr();
        self.state_mut().optim.set_lr(lr);
        debug!("scheduler step t={}: lr={}", self.state().t, lr);
        lr
    }

    /// The optimizer's current learning rate (read-through, never cached).
    fn current_lr(&self) -> TensorData {
        self.state().optim.lr()
    }

    /// The learning rate the optimizer had when the scheduler was built.
    fn initial_lr(&self) -> TensorData {
        self.state().initial_lr
    }

    /// Number of `step` calls so far.
    fn step_count(&self) -> u64 {
        self.state().t
    }

    /// Borrow the wrapped optimizer, e.g. to drive [`Optimizer::step`].
    fn optimizer(&self) -> &O {
        &self.state().optim
    }

    /// Mutably borrow the wrapped optimizer.
    fn optimizer_mut(&mut self) -> &mut O {
        &mut self.state_mut().optim
    }
}

// --- StepLR ---

/// Multiplies the learning rate by `gamma` every `step_size` steps.
pub struct StepLR<O> {
    state: SchedulerState<O>,
    step_size: u64,
    gamma: TensorData,
}

impl<O: Optimizer> StepLR<O> {
    /// Wraps `optim`, decaying by `gamma` whenever the step counter is a
    /// multiple of `step_size`.
    ///
    /// # Errors
    /// [`OptimError::Config`] if `step_size` is zero.
    pub fn new(optim: O, step_size: u64, gamma: TensorData) -> Result<Self> {
        if step_size == 0 {
            return Err(OptimError::Config("step_size must be >= 1".into()));
        }
        Ok(StepLR {
            state: SchedulerState::new(optim),
            step_size,
            gamma,
        })
    }

    /// Unwraps the scheduler, returning the optimizer.
    pub fn into_optimizer(self) -> O {
        self.state.optim
    }
}

impl<O: Optimizer> LrScheduler<O> for StepLR<O> {
    fn state(&self) -> &SchedulerState<O> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SchedulerState<O> {
        &mut self.state
    }

    fn compute_lr(&self) -> TensorData {
        if self.state.t % self.step_size == 0 {
            self.current_lr() * self.gamma
        } else {
            self.current_lr()
        }
    }
}

// --- MultiStepLR ---

/// Multiplies the learning rate by `gamma` when the step counter reaches one
/// of the milestones.
pub struct MultiStepLR<O> {
    state: SchedulerState<O>,
    milestones: Vec<u64>,
    gamma: TensorData,
}

impl<O: Optimizer> MultiStepLR<O> {
    /// Wraps `optim`, decaying by `gamma` on each milestone step.
    ///
    /// # Errors
    /// [`OptimError::Config`] if `milestones` is not strictly increasing.
    pub fn new(optim: O, milestones: Vec<u64>, gamma: TensorData) -> Result<Self> {
        if milestones.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OptimError::Config(format!(
                "milestones must be strictly increasing, got {milestones:?}"
            )));
        }
        Ok(MultiStepLR {
            state: SchedulerState::new(optim),
            milestones,
            gamma,
        })
    }

    /// Unwraps the scheduler, returning the optimizer.
    pub fn into_optimizer(self) -> O {
        self.state.optim
    }
}

impl<O: Optimizer> LrScheduler<O> for MultiStepLR<O> {
    fn state(&self) -> &SchedulerState<O> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SchedulerState<O> {
        &mut self.state
    }

    fn compute_lr(&self) -> TensorData {
        // Strict ordering is validated at construction, so binary search works.
        if self.milestones.binary_search(&self.state.t).is_ok() {
            self.current_lr() * self.gamma
        } else {
            self.current_lr()
        }
    }
}

// --- ExponentialLR ---

/// Exponential decay against the initial learning rate:
///
/// ```text
/// lr = initial_lr * decay_rate ^ (t / decay_steps)    while t <= decay_steps
/// ```
///
/// Past `decay_steps` the learning rate stays at whatever the formula last
/// produced at the boundary; it is frozen, not recomputed.
pub struct ExponentialLR<O> {
    state: SchedulerState<O>,
    decay_steps: u64,
    decay_rate: TensorData,
}

impl<O: Optimizer> ExponentialLR<O> {
    /// Wraps `optim`, decaying over `decay_steps` steps. The decay rate
    /// defaults to `1/e`.
    pub fn new(optim: O, decay_steps: u64) -> Self {
        ExponentialLR {
            state: SchedulerState::new(optim),
            decay_steps,
            decay_rate: 1.0 / std::f32::consts::E,
        }
    }

    /// Set the decay rate reached at `t == decay_steps`.
    pub fn with_decay_rate(mut self, decay_rate: TensorData) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    /// Unwraps the scheduler, returning the optimizer.
    pub fn into_optimizer(self) -> O {
        self.state.optim
    }
}

impl<O: Optimizer> LrScheduler<O> for ExponentialLR<O> {
    fn state(&self) -> &SchedulerState<O> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SchedulerState<O> {
        &mut self.state
    }

    fn compute_lr(&self) -> TensorData {
        if self.state.t <= self.decay_steps {
            let exponent = self.state.t as TensorData / self.decay_steps as TensorData;
            self.state.initial_lr * self.decay_rate.powf(exponent)
        } else {
            self.current_lr()
        }
    }
}

// --- LinearLR ---

/// Linear decay: adds a fixed per-step delta to the current learning rate
/// while `start_step < t <= start_step + decay_steps`.
///
/// The delta is computed once at construction from the optimizer's learning
/// rate at that moment. Each in-window step adds it to the *current* value,
/// so an external learning-rate change inside the window shifts the rest of
/// the trajectory rather than being corrected away.
pub struct LinearLR<O> {
    state: SchedulerState<O>,
    decay_steps: u64,
    start_step: u64,
    lr_delta: TensorData,
}

impl<O: Optimizer> LinearLR<O> {
    /// Wraps `optim`, decaying linearly to `final_lr` over `decay_steps`
    /// steps starting immediately (see [`with_start_step`](Self::with_start_step)).
    ///
    /// # Errors
    /// [`OptimError::Config`] if `decay_steps` is zero or `final_lr` is not
    /// below the optimizer's current learning rate.
    pub fn new(optim: O, decay_steps: u64, final_lr: TensorData) -> Result<Self> {
        let state = SchedulerState::new(optim);
        if decay_steps == 0 {
            return Err(OptimError::Config("decay_steps must be > 0".into()));
        }
        if final_lr >= state.initial_lr {
            return Err(OptimError::Config(format!(
                "final_lr ({final_lr}) must be less than the initial lr ({})",
                state.initial_lr
            )));
        }
        let lr_delta = (final_lr - state.initial_lr) / decay_steps as TensorData;
        Ok(LinearLR {
            state,
            decay_steps,
            start_step: 0,
            lr_delta,
        })
    }

    /// Delay the decay window: decay runs while
    /// `start_step < t <= start_step + decay_steps`. Default 0.
    pub fn with_start_step(mut self, start_step: u64) -> Self {
        self.start_step = start_step;
        self
    }

    /// Unwraps the scheduler, returning the optimizer.
    pub fn into_optimizer(self) -> O {
        self.state.optim
    }
}

impl<O: Optimizer> LrScheduler<O> for LinearLR<O> {
    fn state(&self) -> &SchedulerState<O> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SchedulerState<O> {
        &mut self.state
    }

    fn compute_lr(&self) -> TensorData {
        let t = self.state.t;
        if t > self.start_step && t <= self.start_step + self.decay_steps {
            self.current_lr() + self.lr_delta
        } else {
            self.current_lr()
        }
    }
}
