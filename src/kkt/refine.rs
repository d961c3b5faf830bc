//! Regularized, iteratively-refined KKT solve.
//!
//! An alternative to the block-LU path in [`super`], used when the
//! caller wants a solve that degrades gracefully under ill-conditioning
//! rather than one optimized for speed. The KKT matrix is regularized
//! with a small Tikhonov term (`Q + eps*I` on the primal block, `-eps*I`
//! on the Schur complement of `(z, y)`), factored once via a
//! block-diagonal elimination of `(dx, ds)`, and the resulting
//! approximate solution is corrected by a fixed number of residual
//! refinement steps recomputed against that same regularized operator.

use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::{Col, ColRef, Mat, MatRef};

use crate::E;
use crate::error::SolverError;
use crate::linalg::dense::DenseLu;
use crate::linalg::vector_ops::{cwise_inverse, cwise_multiply};

const REG_EPS: E = 1e-7;

struct IrFactors {
    h_lu: DenseLu,
    h_inv_gt: Mat<E>,
    h_inv_at: Option<Mat<E>>,
    d_inv: Col<E>,
    s_lu: PartialPivLu<E>,
    m: usize,
    neq: usize,
}

impl IrFactors {
    fn build(q: MatRef<E>, g: MatRef<E>, a: Option<MatRef<E>>, d: ColRef<E>) -> Result<Self, SolverError> {
        let n = q.nrows();
        let m = g.nrows();
        let neq = a.map(|a| a.nrows()).unwrap_or(0);

        let mut q_reg = q.to_owned();
        for i in 0..n {
            q_reg[(i, i)] += REG_EPS;
        }
        let h_lu = DenseLu::factor(q_reg.as_ref())?;

        let h_inv_gt = h_lu.solve_mat(g.transpose());
        let h_inv_at = a.map(|a| h_lu.solve_mat(a.transpose()));
        let d_inv = cwise_inverse(d);

        // Schur complement of the regularized system: Atilde * Hinv * Atilde^T - eps*I.
        let g_h_inv_gt = g * &h_inv_gt;
        let mut top_left = g_h_inv_gt;
        for i in 0..m {
            top_left[(i, i)] += d_inv[i] - REG_EPS;
        }

        let size = m + neq;
        let mut s = Mat::<E>::zeros(size, size);
        for i in 0..m {
            for j in 0..m {
                s[(i, j)] = top_left[(i, j)];
            }
        }

        if let (Some(a), Some(h_inv_at)) = (a, &h_inv_at) {
            let top_right = g * h_inv_at;
            let bottom_left = a * &h_inv_gt;
            let mut bottom_right = a * h_inv_at;
            for i in 0..neq {
                bottom_right[(i, i)] -= REG_EPS;
            }
            for i in 0..m {
                for j in 0..neq {
                    s[(i, m + j)] = top_right[(i, j)];
                }
            }
            for i in 0..neq {
                for j in 0..m {
                    s[(m + i, j)] = bottom_left[(i, j)];
                }
            }
            for i in 0..neq {
                for j in 0..neq {
                    s[(m + i, m + j)] = bottom_right[(i, j)];
                }
            }
        }

        let s_lu = s.partial_piv_lu();

        Ok(Self {
            h_lu,
            h_inv_gt,
            h_inv_at,
            d_inv,
            s_lu,
            m,
            neq,
        })
    }

    /// Solves the regularized system for a right-hand side `(bx, bs, bz, by)`.
    fn solve_once(
        &self,
        g: MatRef<E>,
        a: Option<MatRef<E>>,
        bx: ColRef<E>,
        bs: ColRef<E>,
        bz: ColRef<E>,
        by: Option<ColRef<E>>,
    ) -> (Col<E>, Col<E>, Col<E>, Option<Col<E>>) {
        let u_eps = self.h_lu.solve_vec(bx);
        let g_u_eps: Col<E> = g * &u_eps;

        let rhs_z: Col<E> = &(&g_u_eps + &cwise_multiply(self.d_inv.as_ref(), bs)) - &bz;

        let combined_rhs = if self.neq > 0 {
            let a = a.unwrap();
            let by = by.unwrap();
            let a_u_eps: Col<E> = a * &u_eps;
            let rhs_y: Col<E> = &a_u_eps - &by;
            Col::<E>::from_fn(self.m + self.neq, |i| {
                if i < self.m { rhs_z[i] } else { rhs_y[i - self.m] }
            })
        } else {
            rhs_z.clone()
        };

        let w = self.s_lu.solve(&combined_rhs);
        let dz = Col::<E>::from_fn(self.m, |i| w[i]);
        let dy = if self.neq > 0 {
            Some(Col::<E>::from_fn(self.neq, |i| w[self.m + i]))
        } else {
            None
        };

        let mut dx: Col<E> = &u_eps - &(&self.h_inv_gt * &dz);
        if let (Some(h_inv_at), Some(dy)) = (&self.h_inv_at, &dy) {
            dx = &dx - &(h_inv_at * dy);
        }
        let ds = cwise_multiply(self.d_inv.as_ref(), (&bs - &dz).as_ref());

        (dx, ds, dz, dy)
    }
}

/// `K_tilde(D) * (dx, ds, dz, dy) = (bx, bs, bz, by)`, the *regularized*
/// operator (`Q + eps*I`, `D + eps*I`, and `-eps` on the z/y rows). The
/// refinement loop below recomputes residuals against this operator, not
/// the true unregularized KKT system, matching the regularized solve the
/// factorization in [`IrFactors::build`] actually produced.
#[allow(clippy::too_many_arguments)]
fn apply_k_reg(
    q: MatRef<E>,
    g: MatRef<E>,
    a: Option<MatRef<E>>,
    d: ColRef<E>,
    dx: ColRef<E>,
    ds: ColRef<E>,
    dz: ColRef<E>,
    dy: Option<ColRef<E>>,
) -> (Col<E>, Col<E>, Col<E>, Option<Col<E>>) {
    let m = d.nrows();

    let mut row_x: Col<E> = &(&(q * dx) + &(REG_EPS * &dx.to_owned())) + &(g.transpose() * dz);
    if let (Some(a), Some(dy)) = (a, dy) {
        row_x = &row_x + &(a.transpose() * dy);
    }
    let d_reg = Col::<E>::from_fn(m, |i| d[i] + REG_EPS);
    let row_s: Col<E> = &cwise_multiply(d_reg.as_ref(), ds) + &dz.to_owned();
    let row_z: Col<E> = &(&(g * dx) + &ds.to_owned()) - &(REG_EPS * &dz.to_owned());
    let row_y = match (a, dy) {
        (Some(a), Some(dy)) => Some(&(a * dx) - &(REG_EPS * &dy.to_owned())),
        _ => None,
    };

    (row_x, row_s, row_z, row_y)
}

/// Solves the KKT system via regularized block elimination plus a fixed
/// number of iterative-refinement correction steps.
#[allow(clippy::too_many_arguments)]
pub fn solve_kkt_ir(
    q: MatRef<E>,
    g: MatRef<E>,
    a: Option<MatRef<E>>,
    d: ColRef<E>,
    rx: ColRef<E>,
    rs: ColRef<E>,
    rz: ColRef<E>,
    ry: Option<ColRef<E>>,
    refinement_iters: usize,
) -> Result<(Col<E>, Col<E>, Col<E>, Option<Col<E>>), SolverError> {
    let factors = IrFactors::build(q, g, a, d)?;

    let bx: Col<E> = (-1.0) * rx;
    let bs: Col<E> = (-1.0) * rs;
    let bz: Col<E> = (-1.0) * rz;
    let by: Option<Col<E>> = ry.map(|ry| (-1.0) * ry);

    let (mut dx, mut ds, mut dz, mut dy) = factors.solve_once(
        g,
        a,
        bx.as_ref(),
        bs.as_ref(),
        bz.as_ref(),
        by.as_ref().map(|by| by.as_ref()),
    );

    for _ in 0..refinement_iters {
        let (kx, ks, kz, ky) = apply_k_reg(
            q,
            g,
            a,
            d,
            dx.as_ref(),
            ds.as_ref(),
            dz.as_ref(),
            dy.as_ref().map(|dy| dy.as_ref()),
        );

        let res_x: Col<E> = &bx - &kx;
        let res_s: Col<E> = &bs - &ks;
        let res_z: Col<E> = &bz - &kz;
        let res_y: Option<Col<E>> = match (&by, &ky) {
            (Some(by), Some(ky)) => Some(by - ky),
            _ => None,
        };

        let (cx, cs, cz, cy) = factors.solve_once(
            g,
            a,
            res_x.as_ref(),
            res_s.as_ref(),
            res_z.as_ref(),
            res_y.as_ref().map(|r| r.as_ref()),
        );

        dx = &dx + &cx;
        ds = &ds + &cs;
        dz = &dz + &cz;
        if let (Some(dy_mut), Some(cy)) = (&mut dy, &cy) {
            *dy_mut = &*dy_mut + cy;
        }
    }

    Ok((dx, ds, dz, dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_block_lu_on_an_inequality_only_system() {
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let g = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let d = Col::<E>::from_fn(1, |_| 1.0);

        let rx = Col::<E>::from_fn(2, |_| 0.0);
        let rs = Col::<E>::from_fn(1, |_| 0.0);
        let rz = Col::<E>::from_fn(1, |_| 1.0);

        let (dx, _ds, dz, dy) = solve_kkt_ir(
            q.as_ref(),
            g.as_ref(),
            None,
            d.as_ref(),
            rx.as_ref(),
            rs.as_ref(),
            rz.as_ref(),
            None,
            2,
        )
        .unwrap();

        assert!(dy.is_none());
        for i in 0..2 {
            assert!(dx[i].is_finite());
        }
        assert!(dz[0].is_finite());
    }
}
