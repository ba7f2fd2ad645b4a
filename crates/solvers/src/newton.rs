//! Newton's method for residuals assembled from linear elements.
//!
//! The Jacobian is approximated column by column with forward differences.
//! Because each node only couples to its neighbours, columns `j`, `j + 3`,
//! `j + 6`, ... never share a nonzero row and can be perturbed together, so a
//! full tridiagonal Jacobian costs three residual evaluations regardless of
//! the mesh size. Each Newton update is then a single Thomas solve.
//!
//! # Example
//!
//! ```ignore
//! use frost_solvers::{Newton, newton::Config};
//!
//! let newton = Newton::new(Config { max_iters: 25, ..Config::default() })?;
//! let outcome = newton.solve(&residual, &[Dirichlet::new(0, 2.0)], guess);
//! if !outcome.converged {
//!     // the last iterate is still available in `outcome.field`
//! }
//! ```

mod config;
mod tridiagonal;

pub use config::{Config, ConfigError};

use frost_core::{Dirichlet, Field, NonlinearSolver, Outcome, Residual};

use tridiagonal::Tridiagonal;

/// Number of column colours for a tridiagonal sparsity pattern.
const COLOURS: usize = 3;

/// Damped Newton iteration with a banded finite-difference Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Newton {
    config: Config,
}

impl Newton {
    /// Creates a solver with a validated config.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the solver config.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl NonlinearSolver for Newton {
    fn solve<R: Residual>(&self, residual: &R, constraints: &[Dirichlet], guess: Field) -> Outcome {
        let n = residual.dimension();
        let mut u = guess.into_values();

        if u.len() != n || constraints.iter().any(|c| c.node >= n) {
            log::warn!(
                "newton: guess of length {} or constraints do not fit a system of size {n}",
                u.len()
            );
            return failed(u, 0);
        }

        for constraint in constraints {
            u[constraint.node] = constraint.value;
        }

        let system = Constrained {
            residual,
            constraints,
        };

        let mut r = vec![0.0; n];
        system.evaluate(&u, &mut r);
        let r0 = norm(&r);
        if !r0.is_finite() {
            log::debug!("newton: initial residual is not finite");
            return failed(u, 0);
        }
        if r0 <= self.config.atol {
            return converged(u, 0);
        }

        let mut jacobian = Tridiagonal::zeros(n);
        let mut shifted = vec![0.0; n];
        let mut r_shifted = vec![0.0; n];

        for iter in 1..=self.config.max_iters {
            system.jacobian(&u, &r, &mut jacobian, &mut shifted, &mut r_shifted);

            let Some(step) = jacobian.solve(&r) else {
                log::debug!("newton: singular jacobian at iteration {iter}");
                return failed(u, iter);
            };

            for (ui, di) in u.iter_mut().zip(&step) {
                *ui -= self.config.relaxation * di;
            }

            system.evaluate(&u, &mut r);
            let norm = norm(&r);
            log::trace!("newton: iteration {iter}, residual norm {norm:.3e}");

            if !norm.is_finite() {
                log::debug!("newton: residual became non-finite at iteration {iter}");
                return failed(u, iter);
            }
            if norm <= self.config.atol || norm <= self.config.rtol * r0 {
                return converged(u, iter);
            }
        }

        log::debug!(
            "newton: no convergence after {} iterations",
            self.config.max_iters
        );
        failed(u, self.config.max_iters)
    }
}

/// A residual with Dirichlet rows replaced by `u_i - g_i`.
struct Constrained<'a, R> {
    residual: &'a R,
    constraints: &'a [Dirichlet],
}

impl<R: Residual> Constrained<'_, R> {
    fn evaluate(&self, u: &[f64], out: &mut [f64]) {
        self.residual.evaluate(u, out);
        for constraint in self.constraints {
            out[constraint.node] = u[constraint.node] - constraint.value;
        }
    }

    /// Fills `jacobian` with forward differences around `u`, where `r = R(u)`.
    fn jacobian(
        &self,
        u: &[f64],
        r: &[f64],
        jacobian: &mut Tridiagonal,
        shifted: &mut [f64],
        r_shifted: &mut [f64],
    ) {
        let n = u.len();
        let scale = f64::EPSILON.sqrt();

        for colour in 0..COLOURS.min(n) {
            shifted.copy_from_slice(u);
            for j in (colour..n).step_by(COLOURS) {
                shifted[j] += scale * u[j].abs().max(1.0);
            }

            self.evaluate(shifted, r_shifted);

            for j in (colour..n).step_by(COLOURS) {
                let h = shifted[j] - u[j];
                for i in j.saturating_sub(1)..=(j + 1).min(n - 1) {
                    jacobian.set(i, j, (r_shifted[i] - r[i]) / h);
                }
            }
        }
    }
}

fn norm(r: &[f64]) -> f64 {
    r.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn converged(u: Vec<f64>, iters: usize) -> Outcome {
    Outcome {
        field: Field::new(u),
        converged: true,
        iters,
    }
}

fn failed(u: Vec<f64>, iters: usize) -> Outcome {
    Outcome {
        field: Field::new(u),
        converged: false,
        iters,
    }
}
