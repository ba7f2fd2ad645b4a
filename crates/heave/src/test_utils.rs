//! Materials and engines shared by the unit tests.

use std::cell::Cell;

use frost_core::{Dirichlet, Field, LocalFields, Material, NonlinearSolver, Outcome, Residual};

/// Ice-free material with linear porosity and constant diffusivity.
///
/// The forcing flux and heave rate vanish, the rigid-lens stress is one, and
/// every residual built on it is linear in the stress.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Inert {
    pub diffusivity: f64,
}

impl Default for Inert {
    fn default() -> Self {
        Self { diffusivity: -1.0 }
    }
}

impl Material for Inert {
    fn fields(&self, _z: f64) -> LocalFields {
        LocalFields {
            temperature: 0.0,
            saturation: 0.0,
            saturation_gradient: 0.0,
            permeability: 0.0,
        }
    }

    fn porosity(&self, n: f64) -> f64 {
        0.3 - 0.01 * n
    }

    fn porosity_derivative(&self, _n: f64) -> f64 {
        -0.01
    }

    fn diffusivity(&self, _porosity: f64, _saturation: f64, eps: f64) -> f64 {
        self.diffusivity - eps
    }
}

/// Partially frozen material where every closure is active.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frozen {
    pub porosity: f64,
}

impl Default for Frozen {
    fn default() -> Self {
        Self { porosity: 0.4 }
    }
}

impl Material for Frozen {
    fn fields(&self, z: f64) -> LocalFields {
        LocalFields {
            temperature: -0.1 * z,
            saturation: 0.2 + 0.1 * z,
            saturation_gradient: 0.1,
            permeability: 0.5 - 0.1 * z,
        }
    }

    fn porosity(&self, n: f64) -> f64 {
        self.porosity * (-n / 2.0).exp()
    }

    fn porosity_derivative(&self, n: f64) -> f64 {
        -self.porosity(n) / 2.0
    }

    fn diffusivity(&self, porosity: f64, saturation: f64, eps: f64) -> f64 {
        let ice_free = 1.0 - porosity * saturation;
        -((1.0 - saturation) * (1.0 - porosity) / (ice_free * ice_free) + eps)
    }
}

/// Engine that records its calls and returns the guess with constraints
/// applied, reporting convergence until `fail_from` calls have been made.
#[derive(Debug, Default)]
pub(crate) struct Scripted {
    pub calls: Cell<usize>,
    pub fail_from: Option<usize>,
}

impl Scripted {
    pub fn failing_from(call: usize) -> Self {
        Self {
            calls: Cell::new(0),
            fail_from: Some(call),
        }
    }
}

impl NonlinearSolver for Scripted {
    fn solve<R: Residual>(&self, _residual: &R, constraints: &[Dirichlet], guess: Field) -> Outcome {
        let call = self.calls.get();
        self.calls.set(call + 1);

        let mut field = guess;
        for constraint in constraints {
            field.values_mut()[constraint.node] = constraint.value;
        }

        Outcome {
            field,
            converged: self.fail_from.is_none_or(|from| call < from),
            iters: 1,
        }
    }
}
