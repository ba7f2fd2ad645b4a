use frost_core::{LocalFields, Material};
use serde::Deserialize;

use crate::{MaterialError, TemperatureProfile, TemperatureSpec};

/// Parameters of a [`PremeltedSoil`], all dimensionless.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SoilParams {
    /// Porosity `φ₀` at zero effective stress.
    pub porosity: f64,
    /// Stress scale `ν` of the exponential compaction law.
    pub compaction_scale: f64,
    /// Exponent `α` of the premelting saturation law.
    pub premelting_exponent: f64,
    /// Exponent `β` of the permeability law.
    pub permeability_exponent: f64,
    pub temperature: TemperatureSpec,
}

/// A stiff, silty soil whose freezing isotherm sits at `z = 4`.
///
/// Below the isotherm the pores hold no ice. Above it the saturation rises
/// steeply, so the stress dips at the isotherm and a lens pulled from above
/// nucleates its successor there.
impl Default for SoilParams {
    fn default() -> Self {
        Self {
            porosity: 0.7,
            compaction_scale: 100.0,
            premelting_exponent: 10.0,
            permeability_exponent: 0.25,
            temperature: TemperatureSpec::default(),
        }
    }
}

/// A freezing soil with premelted films and exponential compaction.
///
/// - ice saturation `S = 1 - (1 - T)^(-α)` below the melting point, zero above
/// - permeability `k = (1 - S)^β`
/// - porosity `Φ(N) = φ₀ exp(-N / ν)`
/// - diffusivity `D = -[(1 - S)^β (1 - φ) / (1 - φS)² + eps]`
///
/// The diffusivity carries the sign of `Φ'` so that the transient stress
/// equation is parabolic. It vanishes where the pores fill with ice (`S → 1`),
/// which is why solves need `eps > 0`.
#[derive(Debug)]
pub struct PremeltedSoil {
    porosity: f64,
    compaction_scale: f64,
    premelting_exponent: f64,
    permeability_exponent: f64,
    temperature: TemperatureProfile,
}

impl PremeltedSoil {
    /// Creates a soil from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`MaterialError`] if any parameter is out of range or the
    /// temperature profile is invalid.
    pub fn new(params: &SoilParams) -> Result<Self, MaterialError> {
        if !(params.porosity > 0.0 && params.porosity < 1.0) {
            return Err(MaterialError::Porosity(params.porosity));
        }
        if !(params.compaction_scale.is_finite() && params.compaction_scale > 0.0) {
            return Err(MaterialError::CompactionScale(params.compaction_scale));
        }
        if !(params.premelting_exponent.is_finite() && params.premelting_exponent > 0.0) {
            return Err(MaterialError::PremeltingExponent(
                params.premelting_exponent,
            ));
        }
        if !(params.permeability_exponent.is_finite() && params.permeability_exponent >= 0.0) {
            return Err(MaterialError::PermeabilityExponent(
                params.permeability_exponent,
            ));
        }

        Ok(Self {
            porosity: params.porosity,
            compaction_scale: params.compaction_scale,
            premelting_exponent: params.premelting_exponent,
            permeability_exponent: params.permeability_exponent,
            temperature: TemperatureProfile::new(&params.temperature)?,
        })
    }

    /// Ice saturation and `dS/dT` at temperature offset `t`.
    fn saturation(&self, t: f64) -> (f64, f64) {
        if t >= 0.0 {
            return (0.0, 0.0);
        }
        let alpha = self.premelting_exponent;
        let base = 1.0 - t;
        (1.0 - base.powf(-alpha), -alpha * base.powf(-alpha - 1.0))
    }

    fn permeability(&self, saturation: f64) -> f64 {
        (1.0 - saturation).max(0.0).powf(self.permeability_exponent)
    }
}

impl Default for PremeltedSoil {
    fn default() -> Self {
        Self {
            porosity: 0.7,
            compaction_scale: 100.0,
            premelting_exponent: 10.0,
            permeability_exponent: 0.25,
            temperature: TemperatureProfile::Linear {
                gradient: 0.2,
                reference: 4.0,
            },
        }
    }
}

impl Material for PremeltedSoil {
    fn fields(&self, z: f64) -> LocalFields {
        let (temperature, temperature_gradient) = self.temperature.at(z);
        let (saturation, ds_dt) = self.saturation(temperature);
        LocalFields {
            temperature,
            saturation,
            saturation_gradient: ds_dt * temperature_gradient,
            permeability: self.permeability(saturation),
        }
    }

    fn porosity(&self, n: f64) -> f64 {
        self.porosity * (-n / self.compaction_scale).exp()
    }

    fn porosity_derivative(&self, n: f64) -> f64 {
        -self.porosity(n) / self.compaction_scale
    }

    fn diffusivity(&self, porosity: f64, saturation: f64, eps: f64) -> f64 {
        let ice = 1.0 - porosity * saturation;
        -(self.permeability(saturation) * (1.0 - porosity) / (ice * ice) + eps)
    }
}
