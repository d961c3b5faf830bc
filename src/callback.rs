//! Per-iteration hooks for logging and monitoring the batched solve.

use macros::build_option_enum;

use crate::{SolverOptions, SolverState};

/// Hook invoked once per solver iteration for logging, monitoring, or early stopping.
pub trait Callback {
    /// Creates a new callback from solver options.
    fn new(options: &SolverOptions) -> Self
    where
        Self: Sized;

    /// Called at the end of each iteration with the current solver state.
    fn call(&mut self, state: &SolverState);
}

/// A callback that does nothing. Use when no per-iteration output is needed.
pub struct NoOpCallback {}

impl Callback for NoOpCallback {
    fn new(_options: &SolverOptions) -> Self {
        Self {}
    }

    fn call(&mut self, _state: &SolverState) {
        // Do nothing
    }
}

/// Prints one line per iteration: iteration count, mean primal residual,
/// mean dual residual, and mean duality measure across the batch.
pub struct ConvergenceOutput {}

impl Callback for ConvergenceOutput {
    fn new(_options: &SolverOptions) -> Self {
        Self {}
    }

    fn call(&mut self, state: &SolverState) {
        let batch_size = state.batch_size();
        let residual = state.residual();

        let mean_primal: crate::E = (0..batch_size)
            .map(|i| residual.primal_inequality(i).norm_l2() + residual.primal_equality(i).norm_l2())
            .sum::<crate::E>()
            / batch_size as crate::E;
        let mean_dual: crate::E = (0..batch_size)
            .map(|i| residual.dual(i).norm_l2())
            .sum::<crate::E>()
            / batch_size as crate::E;
        let mean_mu: crate::E =
            (0..batch_size).map(|i| residual.mu(i)).sum::<crate::E>() / batch_size as crate::E;

        println!(
            "| {:4} | primal {:<8.2e} | dual {:<8.2e} | mu {:<8.2e} |",
            state.nit(),
            mean_primal,
            mean_dual,
            mean_mu,
        );
    }
}

build_option_enum!(
    trait_ = Callback,
    name = "Callbacks",
    variants = (NoOpCallback, ConvergenceOutput),
    new_arguments = (&SolverOptions,),
    doc_header = "An enum representing different callbacks for the optimization solver. Each variant corresponds to a specific callback strategy."
);
