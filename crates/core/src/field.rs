use crate::{Domain, Element};

/// A continuous piecewise-linear function stored by its nodal values.
///
/// A field carries no reference to the domain it lives on; callers pair it with
/// the matching [`Domain`] when evaluating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    values: Vec<f64>,
}

/// The value and slope of a field at one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldPoint {
    pub z: f64,
    pub value: f64,
    /// Slope of the owning element.
    pub gradient: f64,
}

impl Field {
    /// Wraps nodal values.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Interpolates `f` at the nodes of `domain`.
    pub fn from_fn(domain: &Domain, f: impl Fn(f64) -> f64) -> Self {
        Self {
            values: domain.nodes().iter().map(|&z| f(z)).collect(),
        }
    }

    /// Creates a field that is constant over `domain`.
    #[must_use]
    pub fn constant(domain: &Domain, value: f64) -> Self {
        Self {
            values: vec![value; domain.nodes().len()],
        }
    }

    /// Returns the nodal values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the nodal values mutably.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consumes the field and returns its nodal values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Returns the number of nodal values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the field has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at the lens node (the last node).
    #[must_use]
    pub fn lens_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Evaluates the field at local coordinate `xi` of `element`.
    ///
    /// # Panics
    ///
    /// Panics if the element's nodes are out of range for this field.
    #[must_use]
    pub fn at(&self, element: &Element, xi: f64) -> FieldPoint {
        element.interpolate(&self.values, xi)
    }

    /// Evaluates the field at global position `z` of `domain`.
    ///
    /// # Panics
    ///
    /// Panics if the field does not match the domain's node count.
    #[must_use]
    pub fn point(&self, domain: &Domain, z: f64) -> FieldPoint {
        let element = domain.locate(z);
        FieldPoint {
            z,
            ..self.at(&element, element.local(z))
        }
    }
}

impl From<Vec<f64>> for Field {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn linear_function_is_reproduced() {
        let domain = Domain::interval(5, 0.0, 1.0).expect("valid domain");
        let field = Field::from_fn(&domain, |z| 2.0 + 3.0 * z);

        let point = field.point(&domain, 0.37);

        assert_relative_eq!(point.value, 2.0 + 3.0 * 0.37, epsilon = 1e-14);
        assert_relative_eq!(point.gradient, 3.0, epsilon = 1e-12);
        assert_relative_eq!(point.z, 0.37);
    }

    #[test]
    fn node_values_are_exact() {
        let domain = Domain::interval(4, 0.0, 2.0).expect("valid domain");
        let field = Field::new(vec![1.0, 0.5, 0.05, 0.5, 1.0]);

        assert_eq!(field.point(&domain, 1.0).value, 0.05);
        assert_eq!(field.lens_value(), Some(1.0));
    }

    #[test]
    fn constant_field_has_zero_gradient() {
        let domain = Domain::interval(3, 0.0, 3.0).expect("valid domain");
        let field = Field::constant(&domain, 7.0);

        let point = field.point(&domain, 2.5);
        assert_eq!(point.value, 7.0);
        assert_eq!(point.gradient, 0.0);
        assert_eq!(field.len(), 4);
    }
}
