//! Mehrotra predictor-corrector driver for the batched QP.
//!
//! Each batch element carries its own KKT factorization and its own
//! iterate, but the loop shares a single termination decision across the
//! whole batch: every element's residual is recomputed every iteration,
//! and the loop only stops once the worst element says so (or the shared
//! no-improvement counter trips). This mirrors the block-diagonal
//! structure of the problem itself — batch elements never interact
//! through the algebra, only through the stopping rule.

use faer::{Col, ColRef, MatRef};
use macros::{explicit_options, use_option};
use problemo::Problem;
use rayon::prelude::*;

use crate::E;
use crate::error::SolverError;
use crate::kkt::refine::solve_kkt_ir;
use crate::kkt::{Factored, PreFactored};
use crate::linalg::step::get_step;
use crate::linalg::vector_ops::{col_min, cwise_multiply, cwise_quotient};
use crate::problem::BatchedQp;
use crate::{Solver, SolverHooks, SolverOptions, SolverState, Status};

/// Which KKT-solve path to use for every batch element of a solve.
#[derive(Clone, Copy, Debug)]
pub enum KktStrategy {
    /// Cached block-LU elimination of the Schur complement. Fast, and the
    /// default; fails closed (`SolverError::NotPositiveDefinite`) if `Q`
    /// is not SPD.
    BlockLu,
    /// Regularized block elimination plus a fixed number of iterative
    /// refinement passes against the true operator. Degrades more
    /// gracefully under ill-conditioning, at the cost of a larger
    /// constant factor per solve.
    IterativeRefinement { refinement_iters: usize },
}

impl Default for KktStrategy {
    fn default() -> Self {
        KktStrategy::BlockLu
    }
}

/// One batch element's KKT solve state, carrying only the strategy its
/// [`KktStrategy`] selected.
enum ElementSolver<'a> {
    BlockLu {
        pre: PreFactored,
        factored: Option<Factored>,
    },
    IterativeRefinement {
        q: MatRef<'a, E>,
        g: MatRef<'a, E>,
        a: Option<MatRef<'a, E>>,
        refinement_iters: usize,
    },
}

impl<'a> ElementSolver<'a> {
    fn refactor(&mut self, d: ColRef<E>) -> Result<(), SolverError> {
        match self {
            ElementSolver::BlockLu { pre, factored } => {
                *factored = Some(pre.refactor(d)?);
                Ok(())
            }
            ElementSolver::IterativeRefinement { .. } => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn solve(
        &self,
        d: ColRef<E>,
        rx: ColRef<E>,
        rs: ColRef<E>,
        rz: ColRef<E>,
        ry: Option<ColRef<E>>,
    ) -> Result<(Col<E>, Col<E>, Col<E>, Option<Col<E>>), SolverError> {
        match self {
            ElementSolver::BlockLu { pre, factored } => {
                let factored = factored
                    .as_ref()
                    .expect("refactor must be called before solve");
                Ok(pre.solve(factored, d, rx, rs, rz, ry))
            }
            ElementSolver::IterativeRefinement {
                q,
                g,
                a,
                refinement_iters,
            } => solve_kkt_ir(*q, *g, *a, d, rx, rs, rz, ry, *refinement_iters),
        }
    }
}

/// `(rx, rs, rz, ry, mu)` for one batch element at its current iterate.
///
/// `rs` is always `z` here: it is the raw complementarity slot fed to the
/// KKT solve, not `s ⊙ z` itself (see [`crate::Residual`]).
#[allow(clippy::too_many_arguments)]
fn compute_residual(
    q: MatRef<E>,
    p: ColRef<E>,
    g: MatRef<E>,
    h: ColRef<E>,
    a: Option<MatRef<E>>,
    b: Option<ColRef<E>>,
    x: ColRef<E>,
    s: ColRef<E>,
    z: ColRef<E>,
    y: Option<ColRef<E>>,
) -> (Col<E>, Col<E>, Col<E>, Option<Col<E>>, E) {
    let mut rx: Col<E> = &(q * x) + &(g.transpose() * z);
    if let (Some(a), Some(y)) = (a, y) {
        rx = &rx + &(a.transpose() * y);
    }
    rx = &rx + &p.to_owned();

    let rs = z.to_owned();
    let rz: Col<E> = &(&(g * x) + &s.to_owned()) - &h.to_owned();
    let ry = match (a, b, y) {
        (Some(a), Some(b), Some(_)) => Some(&(a * x) - &b.to_owned()),
        _ => None,
    };

    let m = s.nrows() as E;
    let mu = cwise_multiply(s, z).sum().abs() / m;

    (rx, rs, rz, ry, mu)
}

/// The best-so-far iterate for one batch element, tracked by total
/// residual across the whole run.
struct Best {
    residual: E,
    x: Col<E>,
    s: Col<E>,
    z: Col<E>,
    y: Col<E>,
}

impl Best {
    fn unset() -> Self {
        Self {
            residual: E::INFINITY,
            x: Col::zeros(0),
            s: Col::zeros(0),
            z: Col::zeros(0),
            y: Col::zeros(0),
        }
    }
}

/// Batched Mehrotra predictor-corrector interior-point method.
///
/// Solves every batch element's QP independently, sharing only the loop's
/// termination decision (see the module docs).
#[explicit_options(name = SolverOptions)]
#[use_option(name = "eps", type_ = E, default = "1e-12", description = "Convergence tolerance on the total residual")]
#[use_option(name = "verbose", type_ = i32, default = "0", description = "Verbosity: -1 silent, 0 warnings only, 1 per-iteration output")]
#[use_option(name = "not_improved_lim", type_ = usize, default = "3", description = "Consecutive non-improving iterations before giving up")]
#[use_option(name = "max_iter", type_ = usize, default = "20", description = "Maximum number of interior-point iterations")]
#[use_option(name = "safety_factor", type_ = E, default = "0.999", description = "Fraction of the maximum feasible step length to take")]
#[use_option(name = "bounded_direction_norm", type_ = E, default = "1e5", description = "Step direction norm above which the solve is treated as a numerical blow-up")]
pub struct MehrotraPredictorCorrector<'a> {
    problem: &'a BatchedQp,
    strategy: KktStrategy,
}

impl<'a> MehrotraPredictorCorrector<'a> {
    pub fn new(problem: &'a BatchedQp, options: &SolverOptions, strategy: KktStrategy) -> Self {
        Self {
            problem,
            strategy,
            options: options.into(),
        }
    }

    fn build_element_solvers(&self) -> Result<Vec<ElementSolver<'a>>, Problem> {
        let qp = self.problem;
        (0..qp.batch_size())
            .into_par_iter()
            .map(|i| -> Result<ElementSolver<'a>, Problem> {
                let a_ref = qp.a.as_ref().map(|a| a[i].as_ref());
                match self.strategy {
                    KktStrategy::BlockLu => {
                        let pre = PreFactored::new(qp.q[i].as_ref(), qp.g[i].as_ref(), a_ref)?;
                        Ok(ElementSolver::BlockLu {
                            pre,
                            factored: None,
                        })
                    }
                    KktStrategy::IterativeRefinement { refinement_iters } => {
                        Ok(ElementSolver::IterativeRefinement {
                            q: qp.q[i].as_ref(),
                            g: qp.g[i].as_ref(),
                            a: a_ref,
                            refinement_iters,
                        })
                    }
                }
            })
            .collect()
    }
}

impl<'a> Solver for MehrotraPredictorCorrector<'a> {
    fn solve(&mut self, state: &mut SolverState, hooks: &mut SolverHooks) -> Result<Status, Problem> {
        let qp = self.problem;
        let batch_size = qp.batch_size();
        let m = qp.m();

        let mut solvers = self.build_element_solvers()?;

        hooks.terminator.initialize();
        state.nit = 0;
        state.status = Status::InProgress;

        // Initial iterate: pre-factor with d = 1 (D^-1 = I), then solve
        // with rhs (p, 0, -h, -b) directly for (x, s, z, y).
        let ones = Col::<E>::ones(m);
        for (i, solver) in solvers.iter_mut().enumerate() {
            solver.refactor(ones.as_ref())?;

            let rs0 = Col::<E>::zeros(m);
            let neg_h: Col<E> = (-1.0) * qp.h[i].as_ref();
            let neg_b: Option<Col<E>> = qp.b.as_ref().map(|b| (-1.0) * b[i].as_ref());

            let (x, mut s, mut z, y) = solver.solve(
                ones.as_ref(),
                qp.p[i].as_ref(),
                rs0.as_ref(),
                neg_h.as_ref(),
                neg_b.as_ref().map(|v| v.as_ref()),
            )?;

            let min_s = col_min(s.as_ref());
            if min_s < 0.0 {
                let shift = 1.0 - min_s;
                s = &s + &Col::<E>::from_fn(s.nrows(), |_| shift);
            }
            let min_z = col_min(z.as_ref());
            if min_z < 0.0 {
                let shift = 1.0 - min_z;
                z = &z + &Col::<E>::from_fn(z.nrows(), |_| shift);
            }

            state.x[i] = x;
            state.s[i] = s;
            state.z[i] = z;
            state.y[i] = y.unwrap_or_else(|| Col::<E>::zeros(0));
        }

        let mut best: Vec<Best> = (0..batch_size).map(|_| Best::unset()).collect();
        let mut not_improved = 0usize;
        let mut diverged = false;
        let mut blown_up = false;
        let mut status_after_loop: Option<Status> = None;

        for iter in 0..self.options.max_iter {
            state.nit = iter;

            // 1-2: residuals and the total residual per batch element.
            let residuals: Vec<(Col<E>, Col<E>, Col<E>, Option<Col<E>>, E)> = (0..batch_size)
                .into_par_iter()
                .map(|i| {
                    compute_residual(
                        qp.q[i].as_ref(),
                        qp.p[i].as_ref(),
                        qp.g[i].as_ref(),
                        qp.h[i].as_ref(),
                        qp.a.as_ref().map(|a| a[i].as_ref()),
                        qp.b.as_ref().map(|b| b[i].as_ref()),
                        state.x[i].as_ref(),
                        state.s[i].as_ref(),
                        state.z[i].as_ref(),
                        if qp.has_equalities() {
                            Some(state.y[i].as_ref())
                        } else {
                            None
                        },
                    )
                })
                .collect();

            let mut total_residuals = vec![0.0; batch_size];
            let mut min_mu = E::INFINITY;
            for (i, (rx, rs, rz, ry, mu)) in residuals.iter().enumerate() {
                let ry_norm = ry.as_ref().map(|ry| ry.norm_l2()).unwrap_or(0.0);
                total_residuals[i] = ry_norm + rz.norm_l2() + rx.norm_l2() + (m as E) * mu;
                min_mu = min_mu.min(*mu);

                state.residual.rx[i] = rx.clone();
                state.residual.rs[i] = rs.clone();
                state.residual.rz[i] = rz.clone();
                state.residual.ry[i] = ry.clone().unwrap_or_else(|| Col::zeros(0));
                state.residual.mu[i] = *mu;
            }

            // 3: refactor with d = z / s.
            let ds: Vec<Col<E>> = (0..batch_size)
                .map(|i| cwise_quotient(state.z[i].as_ref(), state.s[i].as_ref()))
                .collect();

            let refactor_failed = solvers
                .par_iter_mut()
                .zip(ds.par_iter())
                .map(|(solver, d)| solver.refactor(d.as_ref()).is_err())
                .collect::<Vec<_>>()
                .into_iter()
                .any(|failed| failed);
            if refactor_failed {
                break;
            }

            // 4: update best-so-far and the shared no-improvement counter.
            let mut improved_any = false;
            for i in 0..batch_size {
                if total_residuals[i] < best[i].residual {
                    best[i] = Best {
                        residual: total_residuals[i],
                        x: state.x[i].clone(),
                        s: state.s[i].clone(),
                        z: state.z[i].clone(),
                        y: state.y[i].clone(),
                    };
                    improved_any = true;
                }
            }
            not_improved = if improved_any { 0 } else { not_improved + 1 };

            // 5: shared termination checks.
            let max_total = total_residuals.iter().cloned().fold(E::NEG_INFINITY, E::max);
            if min_mu > 1e100 {
                diverged = true;
                break;
            }
            if max_total < self.options.eps {
                break;
            }
            if not_improved == self.options.not_improved_lim {
                break;
            }

            // 6: affine (predictor) step.
            let affine: Vec<(Col<E>, Col<E>, Col<E>, Option<Col<E>>)> = (0..batch_size)
                .into_par_iter()
                .map(|i| {
                    let (rx, rs, rz, ry, _mu) = &residuals[i];
                    solvers[i].solve(
                        ds[i].as_ref(),
                        rx.as_ref(),
                        rs.as_ref(),
                        rz.as_ref(),
                        ry.as_ref().map(|ry| ry.as_ref()),
                    )
                })
                .collect::<Result<Vec<_>, SolverError>>()?;

            let alpha_aff: Vec<E> = (0..batch_size)
                .map(|i| {
                    let (_, ds_aff, dz_aff, _) = &affine[i];
                    get_step(state.z[i].as_ref(), dz_aff.as_ref())
                        .min(get_step(state.s[i].as_ref(), ds_aff.as_ref()))
                        .min(1.0)
                })
                .collect();

            // 7: centering parameter.
            let sigma: Vec<E> = (0..batch_size)
                .map(|i| {
                    let (_, ds_aff, dz_aff, _) = &affine[i];
                    let s_next: Col<E> = &state.s[i] + &(alpha_aff[i] * ds_aff);
                    let z_next: Col<E> = &state.z[i] + &(alpha_aff[i] * dz_aff);
                    let num: E = cwise_multiply(s_next.as_ref(), z_next.as_ref()).sum();
                    let den: E = cwise_multiply(state.s[i].as_ref(), state.z[i].as_ref()).sum();
                    (num / den).powi(3)
                })
                .collect();

            // 8: corrector step.
            let corrector: Vec<(Col<E>, Col<E>, Col<E>, Option<Col<E>>)> = (0..batch_size)
                .into_par_iter()
                .map(|i| {
                    let (_, ds_aff, dz_aff, _) = &affine[i];
                    let mu_i = residuals[i].4;
                    let corr_term = cwise_multiply(ds_aff.as_ref(), dz_aff.as_ref());
                    let numerator: Col<E> =
                        &((-mu_i * sigma[i]) * &Col::<E>::ones(m)) + &corr_term;
                    let rs_corr = cwise_quotient(numerator.as_ref(), state.s[i].as_ref());

                    let zero_n = Col::<E>::zeros(qp.n());
                    let zero_m = Col::<E>::zeros(m);
                    let zero_p = if qp.has_equalities() {
                        Some(Col::<E>::zeros(qp.neq()))
                    } else {
                        None
                    };

                    solvers[i].solve(
                        ds[i].as_ref(),
                        zero_n.as_ref(),
                        rs_corr.as_ref(),
                        zero_m.as_ref(),
                        zero_p.as_ref().map(|v| v.as_ref()),
                    )
                })
                .collect::<Result<Vec<_>, SolverError>>()?;

            // 9: combine the affine and corrector directions.
            let combined: Vec<(Col<E>, Col<E>, Col<E>, Option<Col<E>>)> = (0..batch_size)
                .map(|i| {
                    let (dx_aff, ds_aff, dz_aff, dy_aff) = &affine[i];
                    let (dx_c, ds_c, dz_c, dy_c) = &corrector[i];
                    let dy = match (dy_aff, dy_c) {
                        (Some(dy_aff), Some(dy_c)) => Some(dy_aff + dy_c),
                        _ => None,
                    };
                    (dx_aff + dx_c, ds_aff + ds_c, dz_aff + dz_c, dy)
                })
                .collect();

            // Bounded-direction guard: checked for every element before any
            // step is applied, so a single blown-up element discards the
            // whole iteration's step rather than leaving the batch half-updated.
            if combined.iter().any(|(dx, ds_dir, dz, _)| {
                dx.norm_l2() > self.options.bounded_direction_norm
                    || dz.norm_l2() > self.options.bounded_direction_norm
                    || ds_dir.norm_l2() > self.options.bounded_direction_norm
            }) {
                blown_up = true;
                break;
            }

            // 10: final step length and application.
            for (i, (dx, ds_dir, dz, dy)) in combined.into_iter().enumerate() {
                let alpha = (self.options.safety_factor
                    * get_step(state.z[i].as_ref(), dz.as_ref())
                        .min(get_step(state.s[i].as_ref(), ds_dir.as_ref())))
                .min(1.0);

                state.x[i] = &state.x[i] + &(alpha * &dx);
                state.s[i] = &state.s[i] + &(alpha * &ds_dir);
                state.z[i] = &state.z[i] + &(alpha * &dz);
                if let Some(dy) = dy {
                    state.y[i] = &state.y[i] + &(alpha * &dy);
                }
            }

            hooks.callback.call(state);
            if let Some(terminator_status) = hooks.terminator.terminate() {
                status_after_loop = Some(terminator_status);
                break;
            }
        }

        let best_max = best.iter().map(|b| b.residual).fold(E::NEG_INFINITY, E::max);
        for i in 0..batch_size {
            if best[i].residual.is_finite() {
                state.x[i] = best[i].x.clone();
                state.s[i] = best[i].s.clone();
                state.z[i] = best[i].z.clone();
                state.y[i] = best[i].y.clone();
            }
        }

        let status = if let Some(status) = status_after_loop {
            status
        } else if diverged {
            Status::Diverged
        } else if best_max < self.options.eps {
            Status::Optimal
        } else if best_max > 1.0 {
            if self.options.verbose >= 0 {
                println!(
                    "warning: solver stopped with best residual {:.3e} exceeding 1.0",
                    best_max
                );
            }
            Status::Inaccurate
        } else if blown_up || not_improved >= self.options.not_improved_lim {
            Status::NoImprovement
        } else {
            Status::IterationLimit
        };

        state.status = status;
        Ok(status)
    }
}

/// Solves a batched QP in one call, constructing a fresh [`SolverState`]
/// whose initial iterate is immediately overwritten by the algorithmic
/// initialization in [`MehrotraPredictorCorrector::solve`].
pub fn solve(
    problem: &BatchedQp,
    options: &SolverOptions,
    strategy: KktStrategy,
    hooks: &mut SolverHooks,
) -> Result<(SolverState, Status), Problem> {
    let mut state = SolverState::new(
        vec![Col::<E>::zeros(problem.n()); problem.batch_size()],
        vec![Col::<E>::zeros(problem.m()); problem.batch_size()],
        vec![Col::<E>::zeros(problem.m()); problem.batch_size()],
        vec![Col::<E>::zeros(problem.neq()); problem.batch_size()],
    );
    let mut solver = MehrotraPredictorCorrector::new(problem, options, strategy);
    let status = solver.solve(&mut state, hooks)?;
    Ok((state, status))
}

#[cfg(test)]
mod tests {
    use faer::Mat;
    use rstest::rstest;

    use super::*;
    use crate::callback::NoOpCallback;
    use crate::terminators::Terminator;

    struct NoOpTerminator;
    impl Terminator for NoOpTerminator {
        fn terminate(&mut self) -> Option<Status> {
            None
        }
    }

    fn hooks() -> SolverHooks {
        SolverHooks::new(Box::new(NoOpCallback {}), Box::new(NoOpTerminator))
    }

    #[rstest]
    fn unconstrained_one_dimensional_minimum(
        #[values(KktStrategy::BlockLu, KktStrategy::IterativeRefinement { refinement_iters: 2 })]
        strategy: KktStrategy,
    ) {
        // minimize x^2 - 2x, s.t. 0*x <= 1 (a degenerate, always-slack row).
        let q = Mat::<E>::from_fn(1, 1, |_, _| 2.0);
        let p = Col::<E>::from_fn(1, |_| -2.0);
        let g = Mat::<E>::from_fn(1, 1, |_, _| 0.0);
        let h = Col::<E>::from_fn(1, |_| 1.0);
        let qp = BatchedQp::new(vec![q], vec![p], vec![g], vec![h], None, None).unwrap();

        let options = SolverOptions::new();
        let (state, status) = solve(&qp, &options, strategy, &mut hooks()).unwrap();

        assert_eq!(status, Status::Optimal);
        assert!((state.primal(0)[0] - 1.0).abs() < 1e-4);
    }

    #[rstest]
    fn box_constrained_origin_is_optimal(
        #[values(KktStrategy::BlockLu, KktStrategy::IterativeRefinement { refinement_iters: 2 })]
        strategy: KktStrategy,
    ) {
        // minimize (1/2)||x||^2, s.t. -1 <= x_i <= 1. Unconstrained optimum
        // (the origin) already satisfies the box, so it should be returned.
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let p = Col::<E>::zeros(2);
        let g = Mat::<E>::from_fn(4, 2, |i, j| match (i, j) {
            (0, 0) => 1.0,
            (1, 0) => -1.0,
            (2, 1) => 1.0,
            (3, 1) => -1.0,
            _ => 0.0,
        });
        let h = Col::<E>::from_fn(4, |_| 1.0);
        let qp = BatchedQp::new(vec![q], vec![p], vec![g], vec![h], None, None).unwrap();

        let options = SolverOptions::new();
        let (state, status) = solve(&qp, &options, strategy, &mut hooks()).unwrap();

        assert_eq!(status, Status::Optimal);
        for i in 0..2 {
            assert!(state.primal(0)[i].abs() < 1e-4);
        }
    }

    #[rstest]
    fn equality_constrained_minimum_norm(
        #[values(KktStrategy::BlockLu, KktStrategy::IterativeRefinement { refinement_iters: 2 })]
        strategy: KktStrategy,
    ) {
        // minimize (1/2)||x||^2 s.t. x_0 + x_1 = 1, with a slack inequality.
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let p = Col::<E>::zeros(2);
        let g = Mat::<E>::from_fn(1, 2, |_, _| 0.0);
        let h = Col::<E>::from_fn(1, |_| 1.0);
        let a = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let b = Col::<E>::from_fn(1, |_| 1.0);
        let qp = BatchedQp::new(vec![q], vec![p], vec![g], vec![h], Some(vec![a]), Some(vec![b])).unwrap();

        let options = SolverOptions::new();
        let (state, status) = solve(&qp, &options, strategy, &mut hooks()).unwrap();

        assert_eq!(status, Status::Optimal);
        assert!((state.primal(0)[0] - 0.5).abs() < 1e-4);
        assert!((state.primal(0)[1] - 0.5).abs() < 1e-4);
    }

    #[rstest]
    fn batch_elements_solve_independently(
        #[values(KktStrategy::BlockLu, KktStrategy::IterativeRefinement { refinement_iters: 2 })]
        strategy: KktStrategy,
    ) {
        let q0 = Mat::<E>::from_fn(1, 1, |_, _| 2.0);
        let p0 = Col::<E>::from_fn(1, |_| -2.0);
        let g0 = Mat::<E>::from_fn(1, 1, |_, _| 0.0);
        let h0 = Col::<E>::from_fn(1, |_| 1.0);

        let q1 = Mat::<E>::from_fn(1, 1, |_, _| 2.0);
        let p1 = Col::<E>::from_fn(1, |_| -10.0);
        let g1 = Mat::<E>::from_fn(1, 1, |_, _| 1.0);
        let h1 = Col::<E>::from_fn(1, |_| 1.0);

        let qp = BatchedQp::new(
            vec![q0, q1],
            vec![p0, p1],
            vec![g0, g1],
            vec![h0, h1],
            None,
            None,
        )
        .unwrap();

        let options = SolverOptions::new();
        let (state, status) = solve(&qp, &options, strategy, &mut hooks()).unwrap();

        assert_eq!(status, Status::Optimal);
        // Element 0 is unconstrained: x* = 1.
        assert!((state.primal(0)[0] - 1.0).abs() < 1e-4);
        // Element 1 is clipped by x <= 1: x* = 1.
        assert!((state.primal(1)[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_equality_system_reports_inaccurate_or_worse() {
        // A = [1, 1], b = [2], but G/h pins x_0 <= 0 and x_1 <= 0: the
        // equality and inequality constraints are jointly infeasible, so
        // the solver should not report Optimal.
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let p = Col::<E>::zeros(2);
        let g = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let h = Col::<E>::from_fn(2, |_| 0.0);
        let a = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let b = Col::<E>::from_fn(1, |_| 2.0);
        let qp = BatchedQp::new(vec![q], vec![p], vec![g], vec![h], Some(vec![a]), Some(vec![b])).unwrap();

        let options = SolverOptions::new();
        let (_state, status) = solve(&qp, &options, KktStrategy::BlockLu, &mut hooks()).unwrap();

        assert_ne!(status, Status::Optimal);
    }
}
