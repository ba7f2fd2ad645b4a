//! Time stepping on a domain that moves with the lens.
//!
//! Each entry of the time grid runs one step:
//!
//! 1. Solve the stress equation implicitly from the current field.
//! 2. Sample the solution into the step's row.
//! 3. If the minimum sample is at or below the nucleation threshold, a lens
//!    nucleates there: the domain is rebuilt between the base and the new
//!    lens, seeded by continuation, and the row is overwritten with the
//!    rebuilt state.
//! 4. Otherwise the heave rate is sampled and every node moves in proportion
//!    to its height above the base, so that the lens moves with the sediment
//!    velocity `v_i − v_h(z_l)`.
//!
//! A step that cannot be completed ends the run. The rows written so far are
//! kept and the failure is reported through [`Series::status`].
//!
//! # Example
//!
//! ```ignore
//! use frost_heave::stepping::{Action, Event};
//!
//! let series = heave.time_stepping_observed(
//!     domain, initial, 2.0, 1e-4, &times, 1e-10,
//!     |event: &Event<'_>| event.nucleated.then_some(Action::StopEarly),
//! )?;
//! ```

mod action;
mod event;
mod series;
mod time_grid;

pub use action::Action;
pub use event::Event;
pub use series::{Divergence, Series, Status};
pub use time_grid::TimeGridError;

use frost_core::{Domain, Field, Material, NonlinearSolver, Observer, Sampler};
use log::{debug, info, warn};

use crate::{Error, FrostHeave, StepParams};

impl<M, E, S> FrostHeave<M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    /// Steps `initial` on `domain` through the time grid `timesteps`.
    ///
    /// The stress at the base is held at `base_stress` and the ice is pulled
    /// with `velocity`. The regularization `eps` is used for every step and
    /// for seeding rebuilt domains.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the time grid is not strictly increasing and
    /// uniform, `eps` is not positive, the field does not match the domain, or
    /// a forcing value is not finite. Non-convergence is not an error.
    pub fn time_stepping(
        &self,
        domain: Domain,
        initial: Field,
        base_stress: f64,
        velocity: f64,
        timesteps: &[f64],
        eps: f64,
    ) -> Result<Series, Error> {
        self.time_stepping_observed(domain, initial, base_stress, velocity, timesteps, eps, ())
    }

    /// Like [`FrostHeave::time_stepping`], reporting each step to `observer`.
    ///
    /// The observer may return [`Action::StopEarly`] to end the run after the
    /// step it observed.
    ///
    /// # Errors
    ///
    /// See [`FrostHeave::time_stepping`].
    #[allow(clippy::too_many_arguments)]
    pub fn time_stepping_observed<Obs>(
        &self,
        domain: Domain,
        initial: Field,
        base_stress: f64,
        velocity: f64,
        timesteps: &[f64],
        eps: f64,
        observer: Obs,
    ) -> Result<Series, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let dt = time_grid::time_step(timesteps)?;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(Error::Eps(eps));
        }
        Error::check_field(&domain, &initial)?;
        for (name, value) in [("base stress", base_stress), ("pulling velocity", velocity)] {
            if !value.is_finite() {
                return Err(Error::NonFinite { name, value });
            }
        }

        let controller = Controller {
            heave: self,
            series: Series::zeros(timesteps.len(), domain.elements() + 1),
            domain,
            field: initial,
            base_stress,
            params: StepParams::transient(velocity, dt, eps),
            lenses: 0,
        };

        Ok(controller.run(timesteps, observer))
    }
}

/// Mutable state of one run.
struct Controller<'h, M, E, S> {
    heave: &'h FrostHeave<M, E, S>,
    domain: Domain,
    field: Field,
    base_stress: f64,
    params: StepParams,
    series: Series,
    lenses: usize,
}

impl<M, E, S> Controller<'_, M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    fn run<Obs>(mut self, times: &[f64], mut observer: Obs) -> Series
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        for (step, &time) in times.iter().enumerate() {
            let outcome =
                self.heave
                    .solve_step(&self.domain, &self.field, self.base_stress, self.params);
            if !outcome.converged {
                return self.abort(step, Divergence::Solve);
            }

            let samples = self.heave.sampler().sample(&self.domain, &outcome.field);
            self.series.record(step, &samples);

            let Some((index, min_stress)) = samples.min() else {
                return self.abort(step, Divergence::Solve);
            };
            debug!(
                "step {step} of {}: min stress {min_stress:.4}, {} lenses",
                times.len(),
                self.lenses
            );

            let nucleated = min_stress <= self.heave.config().nucleation_threshold;
            let advanced = if nucleated {
                self.nucleate(step, samples.positions[index])
            } else {
                self.advect(step, outcome.field)
            };
            if let Err(cause) = advanced {
                return self.abort(step, cause);
            }

            let event = Event {
                step,
                time,
                domain: &self.domain,
                field: &self.field,
                min_stress,
                nucleated,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                return self.finish(Status::StoppedByObserver { step }, step + 1);
            }
        }

        self.finish(Status::Complete, times.len())
    }

    /// Rebuilds the domain below a new lens at `lens` and seeds it.
    fn nucleate(&mut self, step: usize, lens: f64) -> Result<(), Divergence> {
        self.series.new_lens[step] = 1;

        let domain = Domain::interval(self.domain.elements(), self.domain.base(), lens)
            .map_err(|err| {
                warn!("step {step}: cannot nucleate a lens at z = {lens}: {err}");
                Divergence::Nucleation
            })?;
        info!("step {step}: ice lens nucleated at z = {lens:.4}");

        let init = self
            .heave
            .continuation(&domain, self.base_stress, self.params.eps);
        if !init.converged {
            return Err(Divergence::Initialization);
        }

        let samples = self.heave.sampler().sample(&domain, &init.field);
        self.series.record(step, &samples);

        self.domain = domain;
        self.field = init.field;
        self.lenses += 1;
        Ok(())
    }

    /// Moves the mesh with the sediment and carries `solved` along.
    fn advect(&mut self, step: usize, solved: Field) -> Result<(), Divergence> {
        let heave = self
            .heave
            .heave_rate(&self.domain, &solved)
            .map_err(|err| {
                warn!("step {step}: cannot evaluate the heave rate: {err}");
                Divergence::Advection
            })?;
        self.series.record_heave(step, &heave);

        let sediment_velocity = self.params.velocity - heave.last().unwrap_or(f64::NAN);
        self.domain
            .stretch(self.params.dt * sediment_velocity)
            .map_err(|err| {
                warn!("step {step}: cannot advect the mesh: {err}");
                Divergence::Advection
            })?;

        // Nodal values ride with their nodes, so the lens keeps its solved stress.
        self.field = solved;
        Ok(())
    }

    fn abort(mut self, step: usize, cause: Divergence) -> Series {
        warn!("run stopped at step {step}: {cause}");

        self.series.sanitize();
        self.series.clamp_stress(self.heave.config().stress_floor);
        self.series.converged = false;
        self.series.status = Status::Diverged { step, cause };
        self.series.steps = step;
        self.series
    }

    fn finish(mut self, status: Status, steps: usize) -> Series {
        info!("run finished after {steps} steps with {} new lenses", self.lenses);

        self.series.sanitize();
        self.series.status = status;
        self.series.steps = steps;
        self.series
    }
}
