//! Constitutive closures for freezing porous media.
//!
//! [`PremeltedSoil`] implements [`frost_core::Material`] for a soil whose pore
//! ice content follows a premelting law and whose porosity relaxes
//! exponentially with effective stress. The temperature field is either a
//! linear profile or a table of measurements ([`TemperatureProfile`]).

mod error;
mod soil;
mod temperature;

pub use error::MaterialError;
pub use soil::{PremeltedSoil, SoilParams};
pub use temperature::{TemperatureProfile, TemperatureSpec};
