//! Benchmarks the batched solve across a few `(batch, n, m)` shapes and
//! both KKT strategies.

use faer::{Col, Mat};
use qpbatch::mpc::KktStrategy;
use qpbatch::{BatchedQp, E, SolverHooks};
use qpbatch::callback::NoOpCallback;
use qpbatch::terminators::Terminator;
use qpbatch::Status;

struct NoOpTerminator;
impl Terminator for NoOpTerminator {
    fn terminate(&mut self) -> Option<Status> {
        None
    }
}

fn hooks() -> SolverHooks {
    SolverHooks::new(Box::new(NoOpCallback {}), Box::new(NoOpTerminator))
}

/// A random-ish box-constrained least-norm QP: `min (1/2)||x||^2 + p^Tx`
/// subject to `-1 <= x_i <= 1`, replicated across the batch.
fn box_qp(batch: usize, n: usize) -> BatchedQp {
    let q = Mat::<E>::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });
    let p = Col::<E>::from_fn(n, |i| ((i % 5) as E - 2.0) * 0.1);
    let g = Mat::<E>::from_fn(2 * n, n, |i, j| {
        if i == 2 * j {
            1.0
        } else if i == 2 * j + 1 {
            -1.0
        } else {
            0.0
        }
    });
    let h = Col::<E>::from_fn(2 * n, |_| 1.0);

    BatchedQp::new(
        vec![q; batch],
        vec![p; batch],
        vec![g; batch],
        vec![h; batch],
        None,
        None,
    )
    .unwrap()
}

#[divan::bench(args = [(1, 8), (16, 8), (16, 64)])]
fn block_lu(shape: (usize, usize)) {
    let (batch, n) = shape;
    let qp = box_qp(batch, n);
    let options = qpbatch::SolverOptions::new();
    qpbatch::mpc::solve(&qp, &options, KktStrategy::BlockLu, &mut hooks()).unwrap();
}

#[divan::bench(args = [(1, 8), (16, 8), (16, 64)])]
fn iterative_refinement(shape: (usize, usize)) {
    let (batch, n) = shape;
    let qp = box_qp(batch, n);
    let options = qpbatch::SolverOptions::new();
    qpbatch::mpc::solve(
        &qp,
        &options,
        KktStrategy::IterativeRefinement { refinement_iters: 2 },
        &mut hooks(),
    )
    .unwrap();
}

fn main() {
    divan::main();
}
