use frost_core::{Domain, Field, Material, NonlinearSolver, Sampler, Samples};

use crate::{Error, FrostHeave, residual};

impl<M, E, S> FrostHeave<M, E, S>
where
    M: Material,
    E: NonlinearSolver,
    S: Sampler,
{
    /// Samples the heave rate of `field` on `domain`.
    ///
    /// The rate `[∂zN + (1 − φ) + (1 + T)·∂z(φS)]·k/(1 − φS)²` is the velocity
    /// of the sediment relative to the ice; its last sample is taken at the lens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldLength`] if `field` does not have one value per
    /// node of `domain`.
    pub fn heave_rate(&self, domain: &Domain, field: &Field) -> Result<Samples, Error> {
        Error::check_field(domain, field)?;
        Ok(self.sampler().sample_with(domain, field, |point| {
            residual::heave_rate(self.material(), point)
        }))
    }
}
