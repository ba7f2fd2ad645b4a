//! Continuation in the diffusivity regularization.
//!
//! As `eps → 0` the stress equation degenerates wherever the pores fill with
//! ice, and a cold Newton solve at the target `eps` rarely converges. A fresh
//! domain is therefore seeded in stages:
//!
//! 1. An affine ramp from `N_f` at the base.
//! 2. An anchoring steady solve at the largest `eps`, with the lens condition
//!    imposed weakly by a penalty. The new lens may sit where the previous
//!    solution was far from rigid, so a strong condition would be too abrupt.
//! 3. A sweep of steady solves with a strong lens condition over log-spaced
//!    `eps` values down to the target, each warm-started from the last
//!    converged stage.

use frost_core::{Domain, Field, Material, NonlinearSolver, Sampler};
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::{Error, FrostHeave, StepParams};

/// Settings of the continuation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContinuationConfig {
    /// Regularization of the anchoring solve and the first sweep stage.
    pub start_eps: f64,
    /// Number of sweep stages, the last one at the target `eps`.
    pub stages: usize,
    /// Rise of the initial ramp from base to lens.
    pub ramp: f64,
    /// Run the penalty-anchored solve before the sweep.
    pub anchor: bool,
}

/// Errors that can occur when validating a [`ContinuationConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationError {
    #[error("start_eps must be positive and finite")]
    StartEps,

    #[error("at least one stage is required")]
    Stages,

    #[error("ramp must be finite")]
    Ramp,
}

impl Default for ContinuationConfig {
    fn default() -> Self {
        Self {
            start_eps: 1e-2,
            stages: 20,
            ramp: 1e-3,
            anchor: true,
        }
    }
}

impl ContinuationConfig {
    /// Validates the sweep settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ContinuationError`] for a non-positive start, an empty sweep,
    /// or a non-finite ramp.
    pub fn validate(&self) -> Result<(), ContinuationError> {
        if !(self.start_eps.is_finite() && self.start_eps > 0.0) {
            return Err(ContinuationError::StartEps);
        }
        if self.stages == 0 {
            return Err(ContinuationError::Stages);
        }
        if !self.ramp.is_finite() {
            return Err(ContinuationError::Ramp);
        }
        Ok(())
    }
}

/// A seeded field on a fresh domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Initialization {
    /// The last converged field, or the initial ramp if no stage converged.
    pub field: Field,
    /// Whether the final stage converged.
    pub converged: bool,
    /// Number of stages, anchor included, that failed to converge.
    pub failed_stages: usize,
}

/// Returns `count` log-uniform values from `start` to `end`, both exact.
///
/// Both ends must be positive. A single value is `end`.
#[must_use]
pub fn log_spaced(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let (from, to) = (start.ln(), end.ln());
            #[allow(clippy::cast_precision_loss)]
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| match i {
                    0 => start,
                    i if i == count - 1 => end,
                    #[allow(clippy::cast_precision_loss)]
                    i => (from + (to - from) * i as f64 / last).exp(),
                })
                .collect()
        }
    }
}

impl<M, E, S> FrostHeave<M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    /// Seeds a fresh domain with a stress field at regularization `eps_min`.
    ///
    /// Stages that fail to converge are logged and skipped: the next stage
    /// starts from the last converged field instead.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if `eps_min` is not positive and finite or the base
    /// stress is not finite. Failing stages are reported through
    /// [`Initialization::converged`] and [`Initialization::failed_stages`].
    pub fn initialize(
        &self,
        domain: &Domain,
        base_stress: f64,
        eps_min: f64,
    ) -> Result<Initialization, Error> {
        if !(eps_min.is_finite() && eps_min > 0.0) {
            return Err(Error::Eps(eps_min));
        }
        if !base_stress.is_finite() {
            return Err(Error::NonFinite {
                name: "base stress",
                value: base_stress,
            });
        }
        Ok(self.continuation(domain, base_stress, eps_min))
    }

    pub(crate) fn continuation(
        &self,
        domain: &Domain,
        base_stress: f64,
        eps_min: f64,
    ) -> Initialization {
        let config = &self.config().continuation;
        let (base, height) = (domain.base(), domain.height());

        let mut field = Field::from_fn(domain, |z| base_stress + config.ramp * (z - base) / height);
        let mut converged = true;
        let mut failed_stages = 0;

        let anchor = config
            .anchor
            .then(|| StepParams::steady(config.start_eps, true));
        let sweep = log_spaced(config.start_eps, eps_min, config.stages)
            .into_iter()
            .map(|eps| StepParams::steady(eps, false));

        for (stage, params) in anchor.into_iter().chain(sweep).enumerate() {
            let outcome = self.solve_step(domain, &field, base_stress, params);
            converged = outcome.converged;

            if converged {
                debug!(
                    "continuation stage {stage} converged at eps = {:.1e} in {} iterations",
                    params.eps, outcome.iters
                );
                field = outcome.field;
            } else {
                failed_stages += 1;
                warn!(
                    "continuation stage {stage} failed to converge at eps = {:.1e}; keeping the last converged field",
                    params.eps
                );
            }
        }

        Initialization {
            field,
            converged,
            failed_stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use frost_core::FieldPoint;
    use frost_solvers::{Newton, UniformSampler};

    use crate::{
        SimulationConfig,
        residual::rigid_lens_stress,
        test_utils::{Frozen, Inert, Scripted},
    };

    fn simulator<E: NonlinearSolver>(engine: E, config: SimulationConfig) -> FrostHeave<Inert, E> {
        FrostHeave::with_parts(Inert::default(), engine, UniformSampler, config)
            .expect("valid config")
    }

    fn frozen(config: SimulationConfig) -> FrostHeave<Frozen> {
        FrostHeave::new(Frozen::default(), config).expect("valid config")
    }

    #[test]
    fn log_spacing_hits_both_ends() {
        let values = log_spaced(1e-2, 1e-10, 20);

        assert_eq!(values.len(), 20);
        assert_eq!(values[0], 1e-2);
        assert_eq!(values[19], 1e-10);
        assert!(values.windows(2).all(|w| w[1] < w[0]));
        // constant ratio between neighbours
        let ratio = values[1] / values[0];
        assert_relative_eq!(values[10] / values[9], ratio, max_relative = 1e-10);

        assert_eq!(log_spaced(1e-2, 1e-6, 1), vec![1e-6]);
        assert!(log_spaced(1e-2, 1e-6, 0).is_empty());
    }

    #[test]
    fn sweep_converges_to_linear_profile() {
        let heave = simulator(Newton::default(), SimulationConfig::default());
        let domain = Domain::interval(20, 0.5, 2.5).expect("valid domain");

        for eps_min in [1e-6, 1e-8, 1e-10] {
            let init = heave.initialize(&domain, 2.0, eps_min).expect("valid inputs");

            assert!(init.converged);
            assert_eq!(init.failed_stages, 0);

            // Without ice the rigid-lens stress is one and the profile is linear.
            let values = init.field.values();
            assert_eq!(values[0], 2.0);
            assert_eq!(values[20], 1.0);
            for (z, n) in domain.nodes().iter().zip(values) {
                assert_relative_eq!(*n, 2.0 - (z - 0.5) / 2.0, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn anchor_adds_one_stage() {
        let domain = Domain::interval(4, 0.0, 1.0).expect("valid domain");

        let anchored = simulator(Scripted::default(), SimulationConfig::default());
        anchored.initialize(&domain, 2.0, 1e-8).expect("valid inputs");
        assert_eq!(anchored.engine().calls.get(), 21);

        let mut config = SimulationConfig::default();
        config.continuation.anchor = false;
        let unanchored = simulator(Scripted::default(), config);
        unanchored.initialize(&domain, 2.0, 1e-8).expect("valid inputs");
        assert_eq!(unanchored.engine().calls.get(), 20);
    }

    #[test]
    fn sweep_refines_the_anchor() {
        let domain = Domain::interval(20, 0.0, 2.0).expect("valid domain");
        let material = Frozen::default();
        let rigid = |n: f64| {
            let point = FieldPoint {
                z: 2.0,
                value: n,
                gradient: 0.0,
            };
            rigid_lens_stress(&material, &point)
        };

        let anchored = frozen(SimulationConfig::default());
        let seed = Field::from_fn(&domain, |z| 2.0 + 1e-3 * z / 2.0);
        let anchor = anchored.solve_step(&domain, &seed, 2.0, StepParams::steady(1e-2, true));
        assert!(anchor.converged);

        let mut config = SimulationConfig::default();
        config.continuation.anchor = false;
        let swept = frozen(config)
            .initialize(&domain, 2.0, 1e-8)
            .expect("valid inputs");
        assert!(swept.converged);
        assert_eq!(swept.failed_stages, 0);

        // The penalty only approximates the lens condition; the sweep pins it.
        let anchor_lens = anchor.field.lens_value().expect("non-empty field");
        let swept_lens = swept.field.lens_value().expect("non-empty field");
        assert!((anchor_lens - rigid(anchor_lens)).abs() > 1e-8);
        assert_relative_eq!(swept_lens, rigid(swept_lens), epsilon = 1e-9);

        let largest_change = anchor
            .field
            .values()
            .iter()
            .zip(swept.field.values())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(largest_change > 1e-3);

        // Skipping the anchor does not change where the sweep ends up.
        let full = anchored.initialize(&domain, 2.0, 1e-8).expect("valid inputs");
        for (a, b) in full.field.values().iter().zip(swept.field.values()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn failed_stages_keep_last_converged_field() {
        let domain = Domain::interval(4, 0.0, 1.0).expect("valid domain");
        // The anchor converges, every sweep stage fails.
        let heave = simulator(Scripted::failing_from(1), SimulationConfig::default());

        let init = heave.initialize(&domain, 2.0, 1e-8).expect("valid inputs");

        assert!(!init.converged);
        assert_eq!(init.failed_stages, 20);
        // The scripted anchor returns the pinned ramp unchanged.
        assert_eq!(init.field.values()[0], 2.0);
        assert_relative_eq!(init.field.values()[4], 2.001, epsilon = 1e-12);
    }

    #[test]
    fn final_stage_decides_convergence() {
        let domain = Domain::interval(4, 0.0, 1.0).expect("valid domain");
        let mut config = SimulationConfig::default();
        config.continuation.stages = 3;
        // anchor and first sweep stage converge, the last two fail
        let heave = simulator(Scripted::failing_from(2), config);

        let init = heave.initialize(&domain, 2.0, 1e-8).expect("valid inputs");

        assert!(!init.converged);
        assert_eq!(init.failed_stages, 2);
    }

    #[test]
    fn invalid_eps_is_rejected() {
        let heave = simulator(Scripted::default(), SimulationConfig::default());
        let domain = Domain::interval(4, 0.0, 1.0).expect("valid domain");

        assert!(matches!(
            heave.initialize(&domain, 2.0, 0.0),
            Err(Error::Eps(_))
        ));
        assert!(matches!(
            heave.initialize(&domain, f64::NAN, 1e-8),
            Err(Error::NonFinite { .. })
        ));
    }
}
