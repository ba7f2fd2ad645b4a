use std::fmt;

use ndarray::Array1;
use ninterp::{
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use serde::Deserialize;

use crate::MaterialError;

/// Serializable description of a temperature profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemperatureSpec {
    /// `T(z) = -gradient * (z - reference)`.
    Linear { gradient: f64, reference: f64 },

    /// Measured temperatures at ascending depths.
    Table { depths: Vec<f64>, values: Vec<f64> },
}

impl Default for TemperatureSpec {
    fn default() -> Self {
        Self::Linear {
            gradient: 0.2,
            reference: 4.0,
        }
    }
}

/// Temperature offset as a function of position.
pub enum TemperatureProfile {
    Linear {
        gradient: f64,
        reference: f64,
    },
    Table {
        interp: Interp1DOwned<f64, Linear>,
        depths: Vec<f64>,
        values: Vec<f64>,
        step: f64,
    },
}

impl TemperatureProfile {
    /// Builds a profile from its description.
    ///
    /// Tables are interpolated linearly and clamped beyond their end points.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterialError`] if a linear profile is not finite or a table
    /// is malformed (mismatched lengths, fewer than two points, unsorted depths).
    pub fn new(spec: &TemperatureSpec) -> Result<Self, MaterialError> {
        match spec {
            TemperatureSpec::Linear {
                gradient,
                reference,
            } => {
                if !gradient.is_finite() || !reference.is_finite() {
                    return Err(MaterialError::NonFiniteProfile);
                }
                Ok(Self::Linear {
                    gradient: *gradient,
                    reference: *reference,
                })
            }
            TemperatureSpec::Table { depths, values } => {
                if depths.len() != values.len() || depths.len() < 2 {
                    return Err(MaterialError::TableShape);
                }
                let interp = Interp1DOwned::new(
                    Array1::from(depths.clone()),
                    Array1::from(values.clone()),
                    Linear,
                    Extrapolate::Clamp,
                )?;
                let span = depths[depths.len() - 1] - depths[0];
                Ok(Self::Table {
                    interp,
                    depths: depths.clone(),
                    values: values.clone(),
                    step: 1e-6 * span.abs().max(f64::MIN_POSITIVE),
                })
            }
        }
    }

    /// Returns the temperature offset and its derivative at `z`.
    ///
    /// A failed table lookup yields NaN, which surfaces as a failed solve.
    #[must_use]
    pub fn at(&self, z: f64) -> (f64, f64) {
        match self {
            Self::Linear {
                gradient,
                reference,
            } => (-gradient * (z - reference), -gradient),
            Self::Table { interp, step, .. } => {
                let eval = |x: f64| interp.interpolate(&[x]).unwrap_or(f64::NAN);
                let value = eval(z);
                let slope = (eval(z + step) - eval(z - step)) / (2.0 * step);
                (value, slope)
            }
        }
    }
}

impl fmt::Debug for TemperatureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear {
                gradient,
                reference,
            } => f
                .debug_struct("Linear")
                .field("gradient", gradient)
                .field("reference", reference)
                .finish(),
            Self::Table { depths, values, .. } => f
                .debug_struct("Table")
                .field("depths", depths)
                .field("values", values)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn linear_profile_cools_upward() {
        let profile = TemperatureProfile::new(&TemperatureSpec::Linear {
            gradient: 0.2,
            reference: 1.0,
        })
        .expect("valid profile");

        let (t, dt) = profile.at(3.0);
        assert_relative_eq!(t, -0.4);
        assert_relative_eq!(dt, -0.2);
    }

    #[test]
    fn table_interpolates_and_clamps() {
        let profile = TemperatureProfile::new(&TemperatureSpec::Table {
            depths: vec![0.0, 1.0, 2.0],
            values: vec![0.0, -0.2, -0.6],
        })
        .expect("valid table");

        let (t, dt) = profile.at(1.5);
        assert_relative_eq!(t, -0.4, epsilon = 1e-12);
        assert_relative_eq!(dt, -0.4, epsilon = 1e-6);

        let (t, _) = profile.at(5.0);
        assert_relative_eq!(t, -0.6, epsilon = 1e-12);
    }

    #[test]
    fn table_shape_is_checked() {
        let result = TemperatureProfile::new(&TemperatureSpec::Table {
            depths: vec![0.0, 1.0],
            values: vec![0.0],
        });
        assert!(matches!(result, Err(MaterialError::TableShape)));
    }

    #[test]
    fn non_finite_linear_profile_is_rejected() {
        let result = TemperatureProfile::new(&TemperatureSpec::Linear {
            gradient: f64::INFINITY,
            reference: 0.0,
        });
        assert!(matches!(result, Err(MaterialError::NonFiniteProfile)));
    }
}
