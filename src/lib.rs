use std::any::Any;

use dyn_clone::DynClone;
use faer::Col;
use macros::build_options;
use problemo::Problem;

pub type E = f64;

pub mod callback;
pub mod error;
pub mod kkt;
pub mod linalg;
pub mod mpc;
pub mod problem;
pub mod terminators;

pub use error::SolverError;
pub use problem::BatchedQp;

pub trait OptionTrait: Any + Sync + Send + DynClone {}
impl OptionTrait for &'static str {}
impl OptionTrait for String {}
impl OptionTrait for bool {}
impl OptionTrait for usize {}
impl OptionTrait for u8 {}
impl OptionTrait for u16 {}
impl OptionTrait for u32 {}
impl OptionTrait for u64 {}
impl OptionTrait for i8 {}
impl OptionTrait for i16 {}
impl OptionTrait for i32 {}
impl OptionTrait for i64 {}
impl OptionTrait for f32 {}
impl OptionTrait for f64 {}

impl Clone for Box<dyn OptionTrait> {
    fn clone(&self) -> Self {
        dyn_clone::clone_box(&**self)
    }
}

/// Status codes for the batched interior-point solver. Most variants
/// describe the whole batch at once, since the iteration loop shares a
/// single termination decision across batch elements (see `mpc`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Status {
    #[default]
    /// The solver is still running.
    InProgress,
    /// The best-so-far residual fell below `eps` for every batch element.
    Optimal,
    /// The loop terminated but the worst batch element's best residual
    /// still exceeds 1.0.
    Inaccurate,
    /// A batch element's duality measure exceeded the divergence threshold.
    Diverged,
    /// No batch element improved its best residual for `not_improved_lim`
    /// consecutive iterations.
    NoImprovement,
    /// The problem is infeasible.
    Infeasible,
    /// The problem is unbounded.
    Unbounded,
    /// The status is unknown or not determined.
    Unknown,
    /// The solver stopped due to a time limit.
    TimeLimit,
    /// The solver stopped due to an iteration limit.
    IterationLimit,
    /// The solver was interrupted (e.g., by user or signal).
    Interrupted,
}

/// Trait for iterative optimization solvers.
///
/// Provides a standard interface for algorithms that proceed by repeated
/// iteration, such as interior-point methods.
pub trait Solver {
    /// Run the solver until convergence or maximum iterations.
    fn solve(
        &mut self,
        state: &mut SolverState,
        hooks: &mut SolverHooks,
    ) -> Result<Status, Problem>;
}

/// The current iterate for every batch element.
///
/// `y` holds an empty column for batch elements with no equality
/// constraints, rather than threading `Option` through every accessor.
#[derive(Debug, Clone)]
pub struct SolverState {
    status: Status,
    nit: usize,

    x: Vec<Col<E>>,
    s: Vec<Col<E>>,
    z: Vec<Col<E>>,
    y: Vec<Col<E>>,

    residual: Residual,
}

impl SolverState {
    pub fn new(x: Vec<Col<E>>, s: Vec<Col<E>>, z: Vec<Col<E>>, y: Vec<Col<E>>) -> Self {
        let batch_size = x.len();
        Self {
            status: Status::InProgress,
            nit: 0,
            x,
            s,
            z,
            y,
            residual: Residual::empty(batch_size),
        }
    }

    pub fn get_status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn nit(&self) -> usize {
        self.nit
    }

    pub fn primal(&self, i: usize) -> &Col<E> {
        &self.x[i]
    }

    pub fn slack(&self, i: usize) -> &Col<E> {
        &self.s[i]
    }

    pub fn inequality_dual(&self, i: usize) -> &Col<E> {
        &self.z[i]
    }

    pub fn equality_dual(&self, i: usize) -> &Col<E> {
        &self.y[i]
    }

    pub fn residual(&self) -> &Residual {
        &self.residual
    }

    pub fn batch_size(&self) -> usize {
        self.x.len()
    }
}

/// Batched KKT residuals, recomputed once per iteration.
#[derive(Debug, Clone)]
pub struct Residual {
    /// Dual residual: `Qx + G^T z + A^T y + p`.
    rx: Vec<Col<E>>,
    /// Complementarity slot: `z` on the first iteration, `s ⊙ z` afterwards.
    rs: Vec<Col<E>>,
    /// Primal inequality residual: `Gx + s - h`.
    rz: Vec<Col<E>>,
    /// Primal equality residual: `Ax - b`.
    ry: Vec<Col<E>>,
    /// Duality measure per batch element.
    mu: Vec<E>,
}

impl Residual {
    pub fn empty(batch_size: usize) -> Self {
        Self {
            rx: vec![Col::zeros(0); batch_size],
            rs: vec![Col::zeros(0); batch_size],
            rz: vec![Col::zeros(0); batch_size],
            ry: vec![Col::zeros(0); batch_size],
            mu: vec![0.0; batch_size],
        }
    }

    pub fn dual(&self, i: usize) -> &Col<E> {
        &self.rx[i]
    }

    pub fn complementarity(&self, i: usize) -> &Col<E> {
        &self.rs[i]
    }

    pub fn primal_inequality(&self, i: usize) -> &Col<E> {
        &self.rz[i]
    }

    pub fn primal_equality(&self, i: usize) -> &Col<E> {
        &self.ry[i]
    }

    pub fn mu(&self, i: usize) -> E {
        self.mu[i]
    }
}

pub struct SolverHooks {
    callback: Box<dyn crate::callback::Callback>,
    terminator: Box<dyn crate::terminators::Terminator>,
}

impl SolverHooks {
    pub fn new(
        callback: Box<dyn crate::callback::Callback>,
        terminator: Box<dyn crate::terminators::Terminator>,
    ) -> Self {
        Self {
            callback,
            terminator,
        }
    }
}

build_options!(name = SolverOptions, registry_name = OPTION_REGISTRY);
