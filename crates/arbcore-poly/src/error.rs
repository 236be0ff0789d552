//! Errors reported by polynomial operations.

use arbcore_ball::BallError;

/// Error type for polynomial arithmetic and multipoint evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolyError {
    /// A ball operation failed; the whole batch is abandoned.
    #[error(transparent)]
    Ball(#[from] BallError),

    /// Division by the zero polynomial.
    #[error("division by an empty polynomial")]
    EmptyDivisor,

    /// An output buffer does not match the number of points in the tree.
    #[error("expected {expected} output slots, got {actual}")]
    LengthMismatch {
        /// Number of points in the tree.
        expected: usize,
        /// Length of the buffer supplied.
        actual: usize,
    },
}
