#![allow(dead_code)]

use std::cell::Cell;

use frost_core::{Dirichlet, Field, LocalFields, Material, NonlinearSolver, Outcome, Residual};

/// Ice-free, impermeable soil: no heave, a rigid-lens stress of one, and
/// linear residuals.
#[derive(Debug, Clone, Copy)]
pub struct Inert;

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
        -1.0 - eps
    }
}

/// Engine that ignores the residual and answers with a fixed profile.
///
/// Every node holds `level` except `node`, which holds `dip`.
#[derive(Debug)]
pub struct Dip {
    pub level: f64,
    pub dip: f64,
    pub node: usize,
    pub calls: Cell<usize>,
}

impl Dip {
    pub fn new(level: f64, dip: f64, node: usize) -> Self {
        Self {
            level,
            dip,
            node,
            calls: Cell::new(0),
        }
    }
}

impl NonlinearSolver for Dip {
    fn solve<R: Residual>(&self, residual: &R, _: &[Dirichlet], _: Field) -> Outcome {
        self.calls.set(self.calls.get() + 1);

        let mut values = vec![self.level; residual.dimension()];
        values[self.node] = self.dip;

        Outcome {
            field: Field::new(values),
            converged: true,
            iters: 1,
        }
    }
}

/// Engine that returns the constrained guess and stops converging after
/// `converging` calls.
#[derive(Debug)]
pub struct Stalling {
    pub converging: usize,
    pub calls: Cell<usize>,
}

impl Stalling {
    pub fn after(converging: usize) -> Self {
        Self {
            converging,
            calls: Cell::new(0),
        }
    }
}

impl NonlinearSolver for Stalling {
    fn solve<R: Residual>(&self, _: &R, constraints: &[Dirichlet], guess: Field) -> Outcome {
        let call = self.calls.get();
        self.calls.set(call + 1);

        let mut field = guess;
        for constraint in constraints {
            field.values_mut()[constraint.node] = constraint.value;
        }

        Outcome {
            field,
            converged: call < self.converging,
            iters: 1,
        }
    }
}
