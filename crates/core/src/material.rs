/// Material fields at one position in the freezing fringe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFields {
    /// Temperature offset `T` (negative below the melting point).
    pub temperature: f64,
    /// Ice saturation of the pore space `S`.
    pub saturation: f64,
    /// Spatial derivative `dS/dz`.
    pub saturation_gradient: f64,
    /// Permeability-like coefficient `k`.
    pub permeability: f64,
}

/// Constitutive closures of a freezing porous medium.
///
/// Implementations must be pure: the same arguments always give the same
/// result. Solvers rely on this when they re-evaluate residuals.
pub trait Material {
    /// Returns the local material fields at position `z`.
    fn fields(&self, z: f64) -> LocalFields;

    /// Porosity `Φ(N)` at effective stress `n`.
    fn porosity(&self, n: f64) -> f64;

    /// Derivative `Φ'(N)` at effective stress `n`.
    fn porosity_derivative(&self, n: f64) -> f64;

    /// Diffusivity `D(φ, S, eps)` of the effective stress equation.
    ///
    /// `eps` regularizes the diffusivity where it would otherwise vanish.
    fn diffusivity(&self, porosity: f64, saturation: f64, eps: f64) -> f64;
}

impl<M: Material + ?Sized> Material for &M {
    fn fields(&self, z: f64) -> LocalFields {
        (**self).fields(z)
    }

    fn porosity(&self, n: f64) -> f64 {
        (**self).porosity(n)
    }

    fn porosity_derivative(&self, n: f64) -> f64 {
        (**self).porosity_derivative(n)
    }

    fn diffusivity(&self, porosity: f64, saturation: f64, eps: f64) -> f64 {
        (**self).diffusivity(porosity, saturation, eps)
    }
}
