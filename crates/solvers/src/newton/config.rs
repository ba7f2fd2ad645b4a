use serde::Deserialize;
use thiserror::Error;

/// Configuration for the Newton solver.
///
/// Convergence is tested on the 2-norm of the residual: an iterate is accepted
/// when `‖r‖ <= atol` or `‖r‖ <= rtol * ‖r₀‖`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub max_iters: usize,
    pub atol: f64,
    pub rtol: f64,
    /// Fraction of the Newton update applied per iteration.
    pub relaxation: f64,
}

/// Errors that can occur when validating a Newton solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("atol must be finite and non-negative")]
    Atol,

    #[error("rtol must be finite and non-negative")]
    Rtol,

    #[error("relaxation must lie in (0, 1]")]
    Relaxation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 50,
            atol: 1e-10,
            rtol: 1e-9,
            relaxation: 1.0,
        }
    }
}

impl Config {
    /// Validates tolerances and the relaxation factor.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is negative or non-finite, or if the
    /// relaxation factor is outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.atol.is_finite() || self.atol < 0.0 {
            return Err(ConfigError::Atol);
        }
        if !self.rtol.is_finite() || self.rtol < 0.0 {
            return Err(ConfigError::Rtol);
        }
        if !(self.relaxation > 0.0 && self.relaxation <= 1.0) {
            return Err(ConfigError::Relaxation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let config = Config {
            atol: -1.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Atol));

        let config = Config {
            rtol: f64::NAN,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Rtol));

        let config = Config {
            relaxation: 0.0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Relaxation));
    }
}
