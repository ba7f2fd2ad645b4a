use crate::Field;

/// A nonlinear system `R(u) = 0` over nodal values.
///
/// Residuals assembled from linear elements on an interval couple each node to
/// its immediate neighbours only, so row `i` of the Jacobian has nonzeros in
/// columns `i - 1..=i + 1` at most. Engines may rely on that structure.
pub trait Residual {
    /// Returns the number of unknowns.
    fn dimension(&self) -> usize;

    /// Writes `R(u)` into `out`.
    ///
    /// Both slices have length [`Residual::dimension`]. The result must depend
    /// only on `u` and the residual's captured inputs.
    fn evaluate(&self, u: &[f64], out: &mut [f64]);
}

impl<R: Residual + ?Sized> Residual for &R {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn evaluate(&self, u: &[f64], out: &mut [f64]) {
        (**self).evaluate(u, out);
    }
}

/// A strongly imposed nodal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dirichlet {
    pub node: usize,
    pub value: f64,
}

impl Dirichlet {
    #[must_use]
    pub fn new(node: usize, value: f64) -> Self {
        Self { node, value }
    }
}

/// The result of a nonlinear solve.
///
/// Failure to converge is an ordinary outcome. The field holds the last
/// iterate either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub field: Field,
    pub converged: bool,
    pub iters: usize,
}

/// Solves a nonlinear residual subject to Dirichlet constraints.
///
/// Implementations must not panic or error when the iteration fails; they
/// report it through [`Outcome::converged`]. The call blocks until the solve
/// has converged or given up.
pub trait NonlinearSolver {
    /// Solves `residual` starting from `guess`.
    fn solve<R: Residual>(&self, residual: &R, constraints: &[Dirichlet], guess: Field) -> Outcome;
}

impl<S: NonlinearSolver + ?Sized> NonlinearSolver for &S {
    fn solve<R: Residual>(&self, residual: &R, constraints: &[Dirichlet], guess: Field) -> Outcome {
        (**self).solve(residual, constraints, guess)
    }
}
