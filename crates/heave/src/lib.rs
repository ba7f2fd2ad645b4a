//! Frost heave simulation with ice lens nucleation.
//!
//! The effective stress `N(z, t)` in a freezing fringe between a fixed base
//! `z_b` and the warmest ice lens `z_l` obeys a degenerate nonlinear diffusion
//! equation. A run advances it in time on a moving domain:
//!
//! - each step solves the stress equation implicitly
//! - when the sampled stress drops to the nucleation threshold, a new lens
//!   forms at the minimum and the domain is rebuilt below it
//! - otherwise the mesh follows the sediment velocity at the lens
//!
//! Fresh domains are seeded by continuation in the diffusivity regularization,
//! see [`continuation`].
//!
//! # Example
//!
//! ```ignore
//! use frost_heave::{FrostHeave, RunConfig};
//! use frost_materials::PremeltedSoil;
//!
//! let config = RunConfig::from_toml_str(&std::fs::read_to_string("run.toml")?)?;
//! let soil = PremeltedSoil::new(&config.soil)?;
//! let heave = FrostHeave::new(soil, config.simulation)?;
//!
//! let series = heave.run(&config.scenario)?;
//! println!("{} lenses, converged: {}", series.lens_count(), series.converged);
//! ```

pub mod continuation;
pub mod stepping;

mod config;
mod error;
mod heave_rate;
mod residual;
mod step;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, RunConfig, Scenario, SimulationConfig, TimeSpec};
pub use continuation::{ContinuationConfig, Initialization};
pub use error::Error;
pub use residual::{StepParams, StressResidual};
pub use stepping::{Action, Divergence, Event, Series, Status, TimeGridError};

use frost_core::{Domain, Material, NonlinearSolver, Sampler};
use frost_solvers::{Newton, UniformSampler};
use log::warn;

/// A frost heave simulator.
///
/// Combines the soil closures `M`, the nonlinear engine `E` that solves each
/// step, and the sampler `S` that maps fields onto output rows.
#[derive(Debug, Clone)]
pub struct FrostHeave<M, E = Newton, S = UniformSampler> {
    material: M,
    engine: E,
    sampler: S,
    config: SimulationConfig,
}

impl<M: Material> FrostHeave<M> {
    /// Creates a simulator with the Newton engine and uniform sampling.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn new(material: M, config: SimulationConfig) -> Result<Self, ConfigError> {
        let engine = Newton::new(config.newton)?;
        Self::with_parts(material, engine, UniformSampler, config)
    }
}

impl<M, E, S> FrostHeave<M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    /// Creates a simulator from its collaborators.
    ///
    /// The Newton settings in `config` are validated but only used by
    /// [`FrostHeave::new`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config is invalid.
    pub fn with_parts(
        material: M,
        engine: E,
        sampler: S,
        config: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            material,
            engine,
            sampler,
            config,
        })
    }

    /// Seeds the scenario's domain and steps it through the scenario's time grid.
    ///
    /// An unconverged seed is logged and stepped anyway; the first step then
    /// decides whether the run can proceed.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the scenario is invalid.
    pub fn run(&self, scenario: &Scenario) -> Result<Series, Error> {
        scenario.validate()?;

        let domain = Domain::interval(self.config.elements, scenario.base, scenario.lens)?;
        let init = self.initialize(&domain, scenario.base_stress, scenario.eps)?;
        if !init.converged {
            warn!(
                "initial field did not converge ({} failed stages)",
                init.failed_stages
            );
        }

        self.time_stepping(
            domain,
            init.field,
            scenario.base_stress,
            scenario.pulling_velocity,
            &scenario.timesteps(),
            scenario.eps,
        )
    }

    #[must_use]
    pub fn material(&self) -> &M {
        &self.material
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
