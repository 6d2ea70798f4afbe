//! # Error Types
//!
//! Crate-wide error type shared by optimizers and schedulers.

use thiserror::Error;

/// Errors surfaced by optimizer and scheduler operations.
#[derive(Error, Debug)]
pub enum OptimError {
    /// A gradient's shape disagrees with its parameter's shape.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A step rule produced a vector whose length differs from the flattened
    /// gradient it was given. Applying it would misalign every parameter
    /// block after the first, so the step is rejected instead.
    #[error("Step vector length {got} does not match flattened gradient length {expected}")]
    StepLengthMismatch { expected: usize, got: usize },

    /// Invalid construction-time configuration (bad milestones, degenerate
    /// decay window, ...). Surfaced from `new`, never deferred to `step`.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reshape failure bubbled up from the array library.
    #[error("ndarray error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptimError>;
