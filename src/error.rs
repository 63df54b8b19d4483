//! Errors reported by the slice-facing helpers.
//!
//! The kernels themselves never fail: singular input shows up as non-finite
//! lanes in the result, not as an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// A gather was handed a different number of matrices than the packet has lanes.
    #[error("expected {expected} matrices (one per lane), got {actual}")]
    LaneCountMismatch { expected: usize, actual: usize },
    #[error("{name}: expected {expected} matrices, got {actual}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("thread count must be at least 1")]
    ZeroThreads,
}

pub type Result<T> = std::result::Result<T, KernelError>;
