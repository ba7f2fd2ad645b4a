use frost_core::{Domain, Field};

/// Emitted after every accepted time step.
///
/// The domain and field are the state the next step starts from: after a
/// nucleation they belong to the rebuilt domain, otherwise to the advected one.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Zero-based index into the time grid.
    pub step: usize,
    pub time: f64,
    pub domain: &'a Domain,
    pub field: &'a Field,
    /// Minimum of the sampled stress solved at this step.
    pub min_stress: f64,
    /// Whether a new lens formed at this step.
    pub nucleated: bool,
}
