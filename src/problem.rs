//! The batched quadratic program data model.
//!
//! ```text
//! minimize    (1/2) x^T Q x + p^T x
//! subject to  G x <= h
//!             A x == b
//! ```
//!
//! solved independently for each of `B` batch elements, which share
//! dimensions `(n, m, p)` but carry their own coefficients.

use faer::{Col, Mat};
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use crate::E;
use crate::error::SolverError;

/// One batch of independent convex quadratic programs sharing dimensions.
#[derive(Debug, Clone)]
pub struct BatchedQp {
    pub(crate) q: Vec<Mat<E>>,
    pub(crate) p: Vec<Col<E>>,
    pub(crate) g: Vec<Mat<E>>,
    pub(crate) h: Vec<Col<E>>,
    pub(crate) a: Option<Vec<Mat<E>>>,
    pub(crate) b: Option<Vec<Col<E>>>,

    n: usize,
    m: usize,
    neq: usize,
    batch_size: usize,
}

impl BatchedQp {
    /// Validates shapes and constructs a batch. `a`/`b` must both be `Some`
    /// or both `None`; `None` is the `p == 0` (no equality constraints) case.
    pub fn new(
        q: Vec<Mat<E>>,
        p: Vec<Col<E>>,
        g: Vec<Mat<E>>,
        h: Vec<Col<E>>,
        a: Option<Vec<Mat<E>>>,
        b: Option<Vec<Col<E>>>,
    ) -> Result<Self, Problem> {
        let batch_size = q.len();
        if batch_size == 0 {
            return Err(SolverError::DimensionMismatch {
                reason: "batch is empty".into(),
            }
            .into());
        }
        if p.len() != batch_size || g.len() != batch_size || h.len() != batch_size {
            return Err(SolverError::DimensionMismatch {
                reason: "p, G, h must have the same batch size as Q".into(),
            }
            .into());
        }
        match (&a, &b) {
            (Some(a), Some(b)) => {
                if a.len() != batch_size || b.len() != batch_size {
                    return Err(SolverError::DimensionMismatch {
                        reason: "A, b must have the same batch size as Q".into(),
                    }
                    .into());
                }
            }
            (None, None) => {}
            _ => {
                return Err(SolverError::DimensionMismatch {
                    reason: "A and b must be both present or both absent".into(),
                }
                .into());
            }
        }

        let n = q[0].nrows();
        let m = g[0].nrows();
        let neq = a.as_ref().map(|a| a[0].nrows()).unwrap_or(0);

        if n == 0 {
            return Err("n must be at least 1".gloss());
        }

        for i in 0..batch_size {
            if q[i].nrows() != n || q[i].ncols() != n {
                return Err(format!("Q[{i}] is not {n}x{n}").gloss());
            }
            if p[i].nrows() != n {
                return Err(format!("p[{i}] does not have length {n}").gloss());
            }
            if g[i].nrows() != m || g[i].ncols() != n {
                return Err(format!("G[{i}] is not {m}x{n}").gloss());
            }
            if h[i].nrows() != m {
                return Err(format!("h[{i}] does not have length {m}").gloss());
            }
            if let (Some(a), Some(b)) = (&a, &b) {
                if a[i].nrows() != neq || a[i].ncols() != n {
                    return Err(format!("A[{i}] is not {neq}x{n}").gloss());
                }
                if b[i].nrows() != neq {
                    return Err(format!("b[{i}] does not have length {neq}").gloss());
                }
            }
        }

        Ok(Self {
            q,
            p,
            g,
            h,
            a,
            b,
            n,
            m,
            neq,
            batch_size,
        })
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

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn has_equalities(&self) -> bool {
        self.neq > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_qp() -> BatchedQp {
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let p = Col::<E>::zeros(2);
        let g = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let h = Col::<E>::from_fn(1, |_| 1.0);
        BatchedQp::new(vec![q], vec![p], vec![g], vec![h], None, None).unwrap()
    }

    #[test]
    fn dims_probe() {
        let qp = unit_qp();
        assert_eq!(qp.n(), 2);
        assert_eq!(qp.m(), 1);
        assert_eq!(qp.neq(), 0);
        assert_eq!(qp.batch_size(), 1);
        assert!(!qp.has_equalities());
    }

    #[test]
    fn rejects_mismatched_batch_size() {
        let q = Mat::<E>::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let p = Col::<E>::zeros(2);
        let g = Mat::<E>::from_fn(1, 2, |_, _| 1.0);
        let h = Col::<E>::from_fn(1, |_| 1.0);
        let extra_p = Col::<E>::zeros(2);
        let err = BatchedQp::new(vec![q], vec![p, extra_p], vec![g], vec![h], None, None);
        assert!(err.is_err());
    }
}
