//! Block-LU factorization of the Schur complement of the QP's KKT system.
//!
//! The KKT matrix for one batch element, after eliminating the
//! complementarity row, is
//!
//! ```text
//! K(D) = [ Q   0   G^T  A^T ]
//!        [ 0   D   I    0   ]
//!        [ G   I   0    0   ]
//!        [ A   0   0    0   ]
//! ```
//!
//! Eliminating `(x, s)` leaves a Schur complement over `(y, z)`
//!
//! ```text
//! S(D) = [ A Q^-1 A^T        A Q^-1 G^T      ]
//!        [ G Q^-1 A^T        G Q^-1 G^T + D^-1 ]
//! ```
//!
//! which is symmetric, since the off-diagonal blocks are transposes of
//! each other. That symmetry is what lets `refactor` avoid the re-pivoting
//! bookkeeping a single joint pivoted factorization would need: the
//! `(0,0)` block `M = A Q^-1 A^T` is independently factored once in
//! [`PreFactored::new`], and the Schur complement of `S` eliminating
//! `y` — `T = (G Q^-1 G^T + D^-1) - (A Q^-1 G^T)^T M^-1 (A Q^-1 G^T)` —
//! is refactored every iteration as its own, independently pivoted, dense
//! LU. `solve` performs the corresponding block forward/backward
//! substitution directly against the two factorizations. See DESIGN.md
//! for why this is preferred over the single composite factorization.

pub mod refine;

use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::{Col, ColRef, Mat, MatRef};

use crate::E;
use crate::error::SolverError;
use crate::linalg::dense::DenseLu;
use crate::linalg::vector_ops::cwise_quotient;

/// The iterate-independent part of the factorization: everything that
/// depends only on `(Q, G, A)`, computed once per solve.
pub struct PreFactored {
    n: usize,
    m: usize,
    neq: usize,

    q_lu: DenseLu,
    q_inv_gt: Mat<E>,
    q_inv_at: Option<Mat<E>>,
    m_lu: Option<PartialPivLu<E>>,
    /// `A Q^-1 G^T`, shape `neq x m`. Its transpose is `G Q^-1 A^T`.
    u12: Option<Mat<E>>,
    /// `G Q^-1 G^T - u12^T M^-1 u12`, the D-independent part of the
    /// bottom-right Schur block.
    r: Mat<E>,
}

/// The iterate-dependent completion: the factorization of `T = R + D^-1`.
pub struct Factored {
    t_lu: PartialPivLu<E>,
}

impl PreFactored {
    pub fn new(q: MatRef<E>, g: MatRef<E>, a: Option<MatRef<E>>) -> Result<Self, SolverError> {
        let n = q.nrows();
        let m = g.nrows();

        let q_lu = DenseLu::factor(q)?;
        let q_inv_gt = q_lu.solve_mat(g.transpose());

        let (q_inv_at, m_lu, u12, r) = match a {
            Some(a) => {
                let q_inv_at = q_lu.solve_mat(a.transpose());
                let a_q_inv_at = a * &q_inv_at;
                let m_lu = a_q_inv_at.partial_piv_lu();

                let u12 = a * &q_inv_gt;
                let m_inv_u12 = m_lu.solve(&u12);
                let r = g * &q_inv_gt - u12.transpose() * &m_inv_u12;

                (Some(q_inv_at), Some(m_lu), Some(u12), r)
            }
            None => {
                let r = g * &q_inv_gt;
                (None, None, None, r)
            }
        };

        Ok(Self {
            n,
            m,
            neq: a.map(|a| a.nrows()).unwrap_or(0),
            q_lu,
            q_inv_gt,
            q_inv_at,
            m_lu,
            u12,
            r,
        })
    }

    /// Refactors the D-dependent diagonal block `T = R + diag(1/d)`.
    pub fn refactor(&self, d: ColRef<E>) -> Result<Factored, SolverError> {
        let mut t = self.r.clone();
        for i in 0..self.m {
            t[(i, i)] += 1.0 / d[i];
        }
        let t_lu = t.partial_piv_lu();

        // faer's dense LU has no fallible factorization signal; detect a
        // singular T the way a probe solve would: NaN/Inf in the result.
        let probe = t_lu.solve(&Col::<E>::ones(self.m));
        for i in 0..self.m {
            if !probe[i].is_finite() {
                return Err(SolverError::RefactorFailure);
            }
        }

        Ok(Factored { t_lu })
    }

    /// Solves the KKT system for the Newton direction given residuals and
    /// the current diagonal `d = z / s`.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &self,
        factored: &Factored,
        d: ColRef<E>,
        rx: ColRef<E>,
        rs: ColRef<E>,
        rz: ColRef<E>,
        ry: Option<ColRef<E>>,
    ) -> (Col<E>, Col<E>, Col<E>, Option<Col<E>>) {
        let u = self.q_lu.solve_vec(rx);

        let g_u: Col<E> = self.q_inv_gt.transpose() * rx;
        let h_z: Col<E> = &(&g_u + &cwise_quotient(rs, d)) - &rz;

        let (v_y, v_z) = match (&self.m_lu, &self.u12, ry) {
            (Some(m_lu), Some(u12), Some(ry)) => {
                let a_u: Col<E> = self.q_inv_at.as_ref().unwrap().transpose() * rx;
                let h_y: Col<E> = &a_u - &ry;

                let v_y_tmp: Col<E> = m_lu.solve(&h_y);
                let reduced: Col<E> = &h_z - &(u12.transpose() * &v_y_tmp);
                let v_z: Col<E> = factored.t_lu.solve(&reduced);
                let v_y: Col<E> = &v_y_tmp - &m_lu.solve(&(u12 * &v_z));
                (Some(v_y), v_z)
            }
            _ => {
                let v_z: Col<E> = factored.t_lu.solve(&h_z);
                (None, v_z)
            }
        };

        let w_z: Col<E> = (-1.0) * &v_z;
        let w_y: Option<Col<E>> = v_y.map(|v_y| (-1.0) * &v_y);

        let mut dx: Col<E> = &((-1.0) * &u) - &(&self.q_inv_gt * &w_z);
        if let (Some(q_inv_at), Some(w_y)) = (&self.q_inv_at, &w_y) {
            dx = &dx - &(q_inv_at * w_y);
        }
        let neg_rs_minus_wz: Col<E> = &((-1.0) * rs) - &w_z;
        let ds = cwise_quotient(neg_rs_minus_wz.as_ref(), d);
        let dz = w_z;
        let dy = w_y;

        (dx, ds, dz, dy)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn neq(&self) -> usize {
        self.neq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Mat<E> {
        Mat::<E>::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    #[test]
    fn solves_inequality_only_system() {
        // Q = I2, G = I2, no equalities.
        let q = identity(2);
        let g = identity(2);
        let pre = PreFactored::new(q.as_ref(), g.as_ref(), None).unwrap();

        let d = Col::<E>::from_fn(2, |_| 1.0);
        let factored = pre.refactor(d.as_ref()).unwrap();

        let rx = Col::<E>::from_fn(2, |_| 0.0);
        let rs = Col::<E>::from_fn(2, |_| 0.0);
        let rz = Col::<E>::from_fn(2, |i| if i == 0 { 1.0 } else { -1.0 });

        let (dx, _ds, dz, dy) = pre.solve(&factored, d.as_ref(), rx.as_ref(), rs.as_ref(), rz.as_ref(), None);
        assert!(dy.is_none());
        // With Q=G=I and D=I, T = I + I = 2I so dz should be rz/2 style scaling;
        // just sanity check shapes and finiteness here.
        for i in 0..2 {
            assert!(dx[i].is_finite());
            assert!(dz[i].is_finite());
        }
    }

    #[test]
    fn solves_with_equality_block() {
        let q = identity(2);
        let g = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let a = Mat::<E>::from_fn(1, 2, |_, j| if j == 0 { 1.0 } else { -1.0 });
        let pre = PreFactored::new(q.as_ref(), g.as_ref(), Some(a.as_ref())).unwrap();

        let d = Col::<E>::from_fn(1, |_| 1.0);
        let factored = pre.refactor(d.as_ref()).unwrap();

        let rx = Col::<E>::from_fn(2, |_| 0.0);
        let rs = Col::<E>::from_fn(1, |_| 0.0);
        let rz = Col::<E>::from_fn(1, |_| 1.0);
        let ry = Col::<E>::from_fn(1, |_| 0.0);

        let (dx, _ds, _dz, dy) = pre.solve(
            &factored,
            d.as_ref(),
            rx.as_ref(),
            rs.as_ref(),
            rz.as_ref(),
            Some(ry.as_ref()),
        );
        assert!(dy.is_some());
        for i in 0..2 {
            assert!(dx[i].is_finite());
        }
    }
}
