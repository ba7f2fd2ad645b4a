use crate::FieldPoint;

/// Five-point Gauss–Legendre rule on the unit element `[0, 1]`.
///
/// Each entry is `(xi, weight)`; the weights sum to one. The rule integrates
/// polynomials up to degree nine exactly.
pub const QUADRATURE: [(f64, f64); 5] = [
    (0.046_910_077_030_668_004, 0.118_463_442_528_094_54),
    (0.230_765_344_947_158_45, 0.239_314_335_249_683_23),
    (0.5, 0.284_444_444_444_444_45),
    (0.769_234_655_052_841_6, 0.239_314_335_249_683_23),
    (0.953_089_922_969_332, 0.118_463_442_528_094_54),
];

/// A linear element between two adjacent nodes.
///
/// Element `index` spans nodes `index` and `index + 1`. Positions inside the
/// element are addressed with the local coordinate `xi` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    index: usize,
    left: f64,
    right: f64,
}

impl Element {
    pub(crate) fn new(index: usize, left: f64, right: f64) -> Self {
        Self { index, left, right }
    }

    /// Returns the element index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the global indices of the left and right nodes.
    #[must_use]
    pub fn nodes(&self) -> [usize; 2] {
        [self.index, self.index + 1]
    }

    /// Returns the left node position.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Returns the right node position.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    /// Returns the element width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Maps a local coordinate to a global position.
    #[must_use]
    pub fn position(&self, xi: f64) -> f64 {
        self.left + self.width() * xi
    }

    /// Maps a global position to the local coordinate.
    #[must_use]
    pub fn local(&self, z: f64) -> f64 {
        (z - self.left) / self.width()
    }

    /// Values of the two hat functions at `xi`.
    #[must_use]
    pub fn shape(xi: f64) -> [f64; 2] {
        [1.0 - xi, xi]
    }

    /// Global derivatives of the two hat functions (constant per element).
    #[must_use]
    pub fn shape_gradients(&self) -> [f64; 2] {
        let inv = 1.0 / self.width();
        [-inv, inv]
    }

    /// Evaluates the linear interpolant of nodal `values` at `xi`.
    ///
    /// # Panics
    ///
    /// Panics if the element's nodes are out of range for `values`.
    #[must_use]
    pub fn interpolate(&self, values: &[f64], xi: f64) -> FieldPoint {
        let (ua, ub) = (values[self.index], values[self.index + 1]);
        FieldPoint {
            z: self.position(xi),
            value: ua * (1.0 - xi) + ub * xi,
            gradient: (ub - ua) / self.width(),
        }
    }

    /// Quadrature points as `(z, xi, weight)` with weights scaled by the width.
    pub fn quadrature(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let width = self.width();
        QUADRATURE
            .iter()
            .map(move |&(xi, weight)| (self.position(xi), xi, weight * width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = QUADRATURE.iter().map(|(_, w)| w).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn integrates_degree_nine_exactly() {
        let element = Element::new(0, 1.0, 3.0);

        let integral: f64 = element
            .quadrature()
            .map(|(z, _, w)| w * z.powi(9))
            .sum();

        // (3^10 - 1^10) / 10
        assert_relative_eq!(integral, 5904.8, max_relative = 1e-13);
    }

    #[test]
    fn shape_functions_partition_unity() {
        for xi in [0.0, 0.25, 0.7, 1.0] {
            let [a, b] = Element::shape(xi);
            assert_relative_eq!(a + b, 1.0);
        }

        let element = Element::new(2, 0.5, 0.75);
        let [da, db] = element.shape_gradients();
        assert_relative_eq!(da, -4.0);
        assert_relative_eq!(db, 4.0);
        assert_eq!(element.nodes(), [2, 3]);
    }

    #[test]
    fn local_inverts_position() {
        let element = Element::new(0, 2.0, 6.0);
        assert_relative_eq!(element.local(element.position(0.3)), 0.3);
    }
}
