use frost_core::uniform_points;
use frost_materials::SoilParams;
use frost_solvers::newton;
use serde::Deserialize;
use thiserror::Error;

use crate::continuation::{ContinuationConfig, ContinuationError};

/// Numerical settings shared by every run of a simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of linear elements on every domain, including rebuilt ones.
    pub elements: usize,
    /// Coefficient of the weak lens condition used while anchoring.
    pub penalty: f64,
    /// A lens nucleates when the minimum sampled stress drops to this value.
    pub nucleation_threshold: f64,
    /// Stress floor applied to the series of a diverged run.
    pub stress_floor: f64,
    pub newton: newton::Config,
    pub continuation: ContinuationConfig,
}

/// Errors that can occur when loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one element is required")]
    Elements,

    #[error("penalty coefficient must be positive and finite, got {0}")]
    Penalty(f64),

    #[error("nucleation threshold must be finite, got {0}")]
    NucleationThreshold(f64),

    #[error("stress floor must be non-negative and finite, got {0}")]
    StressFloor(f64),

    #[error("invalid newton config: {0}")]
    Newton(#[from] newton::ConfigError),

    #[error("invalid continuation config: {0}")]
    Continuation(#[from] ContinuationError),

    #[error("invalid scenario: {0}")]
    Scenario(&'static str),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            elements: 100,
            penalty: 1e6,
            nucleation_threshold: 0.05,
            stress_floor: 1e-7,
            newton: newton::Config::default(),
            continuation: ContinuationConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a config from TOML. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every setting, including the nested solver configs.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elements == 0 {
            return Err(ConfigError::Elements);
        }
        if !(self.penalty.is_finite() && self.penalty > 0.0) {
            return Err(ConfigError::Penalty(self.penalty));
        }
        if !self.nucleation_threshold.is_finite() {
            return Err(ConfigError::NucleationThreshold(self.nucleation_threshold));
        }
        if !(self.stress_floor.is_finite() && self.stress_floor >= 0.0) {
            return Err(ConfigError::StressFloor(self.stress_floor));
        }
        self.newton.validate()?;
        self.continuation.validate()?;
        Ok(())
    }
}

/// A uniform time grid from `start` to `end` with `steps` entries.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSpec {
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

impl Default for TimeSpec {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1000.0,
            steps: 1000,
        }
    }
}

impl TimeSpec {
    /// Returns the grid points, both ends included.
    #[must_use]
    pub fn timesteps(&self) -> Vec<f64> {
        uniform_points(self.start, self.end, self.steps)
    }
}

/// The physical setup of one run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Position of the fringe base `z_b`.
    pub base: f64,
    /// Initial lens position `z_l`.
    pub lens: f64,
    /// Stress `N_f` imposed at the base.
    pub base_stress: f64,
    /// Pulling velocity `v_i`.
    pub pulling_velocity: f64,
    /// Diffusivity regularization used while stepping.
    pub eps: f64,
    pub time: TimeSpec,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            base: 1e-3,
            lens: 5.0,
            base_stress: 2.0,
            pulling_velocity: 1e-4,
            eps: 1e-10,
            time: TimeSpec::default(),
        }
    }
}

impl Scenario {
    /// Parses and validates a scenario from TOML. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let scenario: Self = toml::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Checks the scenario for values no run could start from.
    ///
    /// The time grid and domain get their detailed checks when a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scenario`] naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base.is_finite() && self.lens.is_finite() && self.base < self.lens) {
            return Err(ConfigError::Scenario("base must lie below the lens"));
        }
        if !self.base_stress.is_finite() {
            return Err(ConfigError::Scenario("base stress must be finite"));
        }
        if !self.pulling_velocity.is_finite() {
            return Err(ConfigError::Scenario("pulling velocity must be finite"));
        }
        if !(self.eps.is_finite() && self.eps > 0.0) {
            return Err(ConfigError::Scenario("eps must be positive and finite"));
        }
        if self.time.steps < 2 {
            return Err(ConfigError::Scenario("the time grid needs at least two steps"));
        }
        Ok(())
    }

    /// Returns the time grid of the run.
    #[must_use]
    pub fn timesteps(&self) -> Vec<f64> {
        self.time.timesteps()
    }
}

/// A complete run description: numerics, scenario, and soil.
///
/// ```toml
/// [simulation]
/// elements = 100
///
/// [scenario]
/// base_stress = 2.0
/// time = { start = 0.0, end = 1000.0, steps = 1000 }
///
/// [soil]
/// porosity = 0.7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub simulation: SimulationConfig,
    pub scenario: Scenario,
    pub soil: SoilParams,
}

impl RunConfig {
    /// Parses a run description and validates its numerics and scenario.
    ///
    /// Soil parameters are validated when the material is built.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.simulation.validate()?;
        config.scenario.validate()?;
        Ok(config)
    }
}
