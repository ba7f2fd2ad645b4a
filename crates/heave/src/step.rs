use frost_core::{Dirichlet, Domain, Field, Material, NonlinearSolver, Outcome, Sampler};
use log::warn;

use crate::{
    Error, FrostHeave, StepParams,
    residual::{StressResidual, rigid_lens_stress},
};

impl<M, E, S> FrostHeave<M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    /// Solves one time step, or one steady pseudo-step, from `previous`.
    ///
    /// The stress is pinned to `base_stress` at the base. At the lens it
    /// targets the rigid-lens stress of `previous`, imposed strongly unless
    /// `params.penalty` asks for the weak form. The previous field is the
    /// initial guess.
    ///
    /// Failure to converge is reported in the returned [`Outcome`], and so is
    /// a `previous` field that does not fit the domain: the solve is skipped
    /// and the field is handed back unconverged.
    pub fn solve_step(
        &self,
        domain: &Domain,
        previous: &Field,
        base_stress: f64,
        params: StepParams,
    ) -> Outcome {
        if let Err(err) = Error::check_field(domain, previous) {
            warn!("skipping solve: {err}");
            return Outcome {
                field: previous.clone(),
                converged: false,
                iters: 0,
            };
        }

        let mut constraints = vec![Dirichlet::new(0, base_stress)];

        if !params.penalty {
            let lens_stress = self
                .sampler()
                .sample_with(domain, previous, |point| {
                    rigid_lens_stress(self.material(), point)
                })
                .last()
                .unwrap_or(f64::NAN);
            constraints.push(Dirichlet::new(domain.lens_node(), lens_stress));
        }

        let residual = StressResidual::new(
            self.material(),
            domain,
            previous,
            params,
            self.config().penalty,
        );

        self.engine().solve(&residual, &constraints, previous.clone())
    }
}
