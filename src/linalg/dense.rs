//! Dense LU factorization of `Q`.
//!
//! `Q` is factored once per batch element and reused for the repeated
//! `Q^{-1}` solves in `PreFactored::new`/`solve`. This mirrors the
//! original implementation's `Q.btrifact()` and the data model's
//! `Q_LU: batched LU of Q` — a dense partial-pivoting LU rather than a
//! Cholesky, since it is what the rest of this crate's dense solves
//! already use (`kkt::mod::PreFactored`'s `M`/`T` blocks, `kkt::refine`'s
//! Schur complement) via `faer::linalg::solvers::PartialPivLu`.

use faer::linalg::solvers::{PartialPivLu, Solve};
use faer::{Col, ColRef, Mat, MatRef};

use crate::E;
use crate::error::SolverError;

pub struct DenseLu {
    lu: PartialPivLu<E>,
    n: usize,
}

impl DenseLu {
    pub fn factor(a: MatRef<E>) -> Result<Self, SolverError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(SolverError::NotPositiveDefinite);
        }

        let lu = a.partial_piv_lu();

        // faer's dense LU has no fallible factorization signal; detect a
        // singular (or non-PD, for our SPD-by-construction `Q`) matrix the
        // way a probe solve would: NaN/Inf in the result.
        let probe = lu.solve(&Col::<E>::ones(n));
        for i in 0..n {
            if !probe[i].is_finite() {
                return Err(SolverError::NotPositiveDefinite);
            }
        }

        Ok(Self { lu, n })
    }

    /// Solves `Q x = rhs`.
    pub fn solve_vec(&self, rhs: ColRef<E>) -> Col<E> {
        self.lu.solve(&rhs.to_owned())
    }

    /// Solves `Q X = rhs` column-by-column, returning `Q^{-1} rhs`.
    pub fn solve_mat(&self, rhs: MatRef<E>) -> Mat<E> {
        self.lu.solve(&rhs.to_owned())
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_identity() {
        let a = Mat::<E>::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.0 });
        let lu = DenseLu::factor(a.as_ref()).unwrap();
        let rhs = Col::<E>::from_fn(3, |i| (i + 1) as E);
        let x = lu.solve_vec(rhs.as_ref());
        for i in 0..3 {
            assert!((x[i] - rhs[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn solves_spd_system() {
        // [[4, 2], [2, 3]], known PD.
        let a = Mat::<E>::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (1, 1) => 3.0,
            _ => 2.0,
        });
        let lu = DenseLu::factor(a.as_ref()).unwrap();
        let rhs = Col::<E>::from_fn(2, |i| if i == 0 { 6.0 } else { 7.0 });
        let x = lu.solve_vec(rhs.as_ref());
        // Verify A x == rhs.
        for i in 0..2 {
            let mut row_sum = 0.0;
            for j in 0..2 {
                row_sum += a[(i, j)] * x[j];
            }
            assert!((row_sum - rhs[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_singular_matrix() {
        let a = Mat::<E>::from_fn(2, 2, |_, _| 1.0);
        assert_eq!(
            DenseLu::factor(a.as_ref()).unwrap_err(),
            SolverError::NotPositiveDefinite
        );
    }
}
