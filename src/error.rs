//! Fatal error taxonomy for the batched QP solver.
//!
//! Non-fatal outcomes (an inaccurate solution, divergence, no improvement)
//! are reported through [`crate::Status`] on the returned solver state, not
//! through this type. Only conditions that prevent a solve from producing
//! any usable iterate are represented here.

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq)]
pub enum SolverError {
    /// `Q` failed Cholesky factorization; it is not symmetric positive definite.
    #[display("Q is not positive definite")]
    NotPositiveDefinite,

    /// The per-iteration Schur-complement refactor produced a singular or
    /// numerically unusable factorization.
    #[display("KKT refactorization failed")]
    RefactorFailure,

    /// Coefficient tensors disagree on batch size or dimension.
    #[display("coefficient dimensions are inconsistent: {reason}")]
    DimensionMismatch { reason: String },
}
