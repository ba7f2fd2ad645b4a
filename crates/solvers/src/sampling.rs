//! Samplers that map fields onto uniform grids.

use frost_core::{Domain, Field, FieldPoint, Sampler, Samples, uniform_points};

/// Samples at `elements + 1` evenly spaced positions from base to lens.
///
/// On a uniform mesh the sample positions coincide with the nodes. After the
/// mesh has been stretched they still span the same interval, so every row of
/// a time series covers the current domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformSampler;

impl Sampler for UniformSampler {
    fn sample_with<F>(&self, domain: &Domain, field: &Field, expr: F) -> Samples
    where
        F: Fn(&FieldPoint) -> f64,
    {
        let positions = uniform_points(domain.base(), domain.lens(), domain.elements() + 1);
        let values = positions
            .iter()
            .map(|&z| expr(&field.point(domain, z)))
            .collect();

        Samples { positions, values }
    }
}
