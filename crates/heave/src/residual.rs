//! Weak-form residual of the effective stress equation.
//!
//! For a candidate stress `N`, the previous stress `N_prev` and a test
//! function `ψ`, the residual reads
//!
//! ```text
//! ∫ dt·Φ'(N)·v·∂zN·ψ + dt·D(φ, S, eps)·∂zN·∂zψ − dt·∂zf·ψ
//!   + Φ'(N)·(N − N_prev)·ψ                      (transient only)
//!   + c·(N − N_l)·ψ at the lens                  (penalty only)
//! ```
//!
//! where `f` is the forcing flux and `N_l` the rigid-lens stress. The flux is
//! only piecewise smooth on linear elements, so its derivative is integrated by
//! parts element by element using the flux at the element ends.

use frost_core::{Domain, Element, Field, FieldPoint, LocalFields, Material, Residual};

/// Parameters of a single solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    /// Pulling velocity `v_i`.
    pub velocity: f64,
    pub dt: f64,
    /// Diffusivity regularization.
    pub eps: f64,
    /// Enforce the rigid-lens stress weakly through a boundary penalty.
    pub penalty: bool,
    /// Drop the time-derivative term.
    pub steady: bool,
}

impl StepParams {
    /// Parameters of an implicit time step with a strong lens condition.
    #[must_use]
    pub fn transient(velocity: f64, dt: f64, eps: f64) -> Self {
        Self {
            velocity,
            dt,
            eps,
            penalty: false,
            steady: false,
        }
    }

    /// Parameters of a steady pseudo-step at rest.
    ///
    /// The time step is a unit placeholder since nothing depends on it once
    /// the time derivative is dropped.
    #[must_use]
    pub fn steady(eps: f64, penalty: bool) -> Self {
        Self {
            velocity: 0.0,
            dt: 1.0,
            eps,
            penalty,
            steady: true,
        }
    }
}

/// The residual of one solve, ready to hand to a nonlinear solver.
///
/// Evaluation is pure: it depends only on the candidate values and the
/// captured inputs, so repeated evaluations agree bit for bit.
#[derive(Debug)]
pub struct StressResidual<'a, M> {
    material: &'a M,
    domain: &'a Domain,
    previous: &'a Field,
    params: StepParams,
    penalty_coefficient: f64,
}

impl<'a, M: Material> StressResidual<'a, M> {
    /// Captures the inputs of one solve.
    ///
    /// `penalty_coefficient` is only used when `params.penalty` is set.
    #[must_use]
    pub fn new(
        material: &'a M,
        domain: &'a Domain,
        previous: &'a Field,
        params: StepParams,
        penalty_coefficient: f64,
    ) -> Self {
        Self {
            material,
            domain,
            previous,
            params,
            penalty_coefficient,
        }
    }

    /// Returns the solve parameters.
    #[must_use]
    pub fn params(&self) -> &StepParams {
        &self.params
    }

    fn assemble_element(&self, element: &Element, u: &[f64], out: &mut [f64]) {
        let StepParams {
            velocity,
            dt,
            eps,
            steady,
            ..
        } = self.params;
        let material = self.material;
        let [a, b] = element.nodes();
        let gradients = element.shape_gradients();

        let mut rows = [0.0; 2];
        let mut flux_integral = 0.0;

        for (z, xi, weight) in element.quadrature() {
            let point = element.interpolate(u, xi);
            let fields = material.fields(z);
            let phi = material.porosity(point.value);
            let dphi = material.porosity_derivative(point.value);
            let diffusivity = material.diffusivity(phi, fields.saturation, eps);

            // Coefficients multiplying the test function and its gradient.
            let mut value_term = dt * dphi * velocity * point.gradient;
            if !steady {
                let previous = element.interpolate(self.previous.values(), xi).value;
                value_term += dphi * (point.value - previous);
            }
            let gradient_term = dt * diffusivity * point.gradient;

            for (row, (shape, gradient)) in rows
                .iter_mut()
                .zip(Element::shape(xi).into_iter().zip(gradients))
            {
                *row += weight * (value_term * shape + gradient_term * gradient);
            }

            flux_integral += weight * forcing_flux(material, &fields, &point);
        }

        // ∫ ∂zf ψ = [f ψ] − ∫ f ∂zψ on this element.
        let flux_at = |xi: f64| {
            let point = element.interpolate(u, xi);
            forcing_flux(material, &material.fields(point.z), &point)
        };
        let mean = flux_integral / element.width();
        rows[0] -= dt * (mean - flux_at(0.0));
        rows[1] -= dt * (flux_at(1.0) - mean);

        out[a] += rows[0];
        out[b] += rows[1];
    }
}

impl<M: Material> Residual for StressResidual<'_, M> {
    fn dimension(&self) -> usize {
        self.domain.nodes().len()
    }

    fn evaluate(&self, u: &[f64], out: &mut [f64]) {
        out.fill(0.0);

        for element in self.domain.iter_elements() {
            self.assemble_element(&element, u, out);
        }

        if self.params.penalty {
            let lens = self.domain.lens_node();
            let point = FieldPoint {
                z: self.domain.lens(),
                value: u[lens],
                gradient: 0.0,
            };
            let target = rigid_lens_stress(self.material, &point);
            out[lens] += self.penalty_coefficient * (u[lens] - target);
        }
    }
}

/// Porosity quantities shared by the flux expressions.
struct Pores {
    phi: f64,
    /// `∂z(φS) = Φ'(N)·∂zN·S + Φ(N)·∂zS`
    d_phi_s: f64,
    /// `1 − φS`
    ice_free: f64,
}

impl Pores {
    fn at<M: Material>(material: &M, fields: &LocalFields, point: &FieldPoint) -> Self {
        let phi = material.porosity(point.value);
        let dphi = material.porosity_derivative(point.value);
        Self {
            phi,
            d_phi_s: dphi * point.gradient * fields.saturation + phi * fields.saturation_gradient,
            ice_free: 1.0 - phi * fields.saturation,
        }
    }
}

/// Forcing flux `f = [(1 − φ) + (1 + T)·∂z(φS)]·k·(1 − φ)/(1 − φS)²`.
pub(crate) fn forcing_flux<M: Material>(
    material: &M,
    fields: &LocalFields,
    point: &FieldPoint,
) -> f64 {
    let pores = Pores::at(material, fields, point);
    let drive = (1.0 - pores.phi) + (1.0 + fields.temperature) * pores.d_phi_s;
    drive * fields.permeability * (1.0 - pores.phi) / (pores.ice_free * pores.ice_free)
}

/// Heave rate `[∂zN + (1 − φ) + (1 + T)·∂z(φS)]·k/(1 − φS)²`.
pub(crate) fn heave_rate<M: Material>(material: &M, point: &FieldPoint) -> f64 {
    let fields = material.fields(point.z);
    let pores = Pores::at(material, &fields, point);
    let drive =
        point.gradient + (1.0 - pores.phi) + (1.0 + fields.temperature) * pores.d_phi_s;
    drive * fields.permeability / (pores.ice_free * pores.ice_free)
}

/// Stress `(1 − φS)(1 + T)` at which the lens would be rigid.
pub(crate) fn rigid_lens_stress<M: Material>(material: &M, point: &FieldPoint) -> f64 {
    let fields = material.fields(point.z);
    let phi = material.porosity(point.value);
    (1.0 - phi * fields.saturation) * (1.0 + fields.temperature)
}
