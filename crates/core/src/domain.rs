use thiserror::Error;

use crate::Element;

/// A one-dimensional interval `[z_b, z_l]` split into linear elements.
///
/// The base `z_b` is the bottom of the freezing fringe and the upper end `z_l`
/// is the ice lens. Node positions are stored in ascending order and the node
/// count is always `elements() + 1`.
///
/// A domain is replaced wholesale when a new lens nucleates and stretched in
/// place when the lens moves. The two never happen within the same step.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    nodes: Vec<f64>,
}

/// Errors that can occur when constructing or moving a domain.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("a domain needs at least one element")]
    NoElements,

    #[error("domain bounds must be finite: base = {base}, lens = {lens}")]
    NonFiniteBounds { base: f64, lens: f64 },

    #[error("domain base {base} must lie below the lens {lens}")]
    Inverted { base: f64, lens: f64 },

    #[error("lens displacement {displacement} would collapse a domain of height {height}")]
    Collapsed { displacement: f64, height: f64 },
}

impl Domain {
    /// Creates a uniform mesh of `elements` elements on `[base, lens]`.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `elements` is zero, either bound is
    /// non-finite, or `base >= lens`.
    pub fn interval(elements: usize, base: f64, lens: f64) -> Result<Self, DomainError> {
        if elements == 0 {
            return Err(DomainError::NoElements);
        }
        if !base.is_finite() || !lens.is_finite() {
            return Err(DomainError::NonFiniteBounds { base, lens });
        }
        if base >= lens {
            return Err(DomainError::Inverted { base, lens });
        }

        Ok(Self {
            nodes: uniform_points(base, lens, elements + 1),
        })
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn elements(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns the node positions in ascending order.
    #[must_use]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Returns the position of the fixed base.
    #[must_use]
    pub fn base(&self) -> f64 {
        self.nodes[0]
    }

    /// Returns the position of the ice lens.
    #[must_use]
    pub fn lens(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the index of the lens node.
    #[must_use]
    pub fn lens_node(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns the distance between base and lens.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lens() - self.base()
    }

    /// Returns element `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.elements()`.
    #[must_use]
    pub fn element(&self, index: usize) -> Element {
        Element::new(index, self.nodes[index], self.nodes[index + 1])
    }

    /// Iterates over all elements from base to lens.
    pub fn iter_elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.nodes
            .windows(2)
            .enumerate()
            .map(|(index, pair)| Element::new(index, pair[0], pair[1]))
    }

    /// Returns the element that owns position `z`.
    ///
    /// A point on an interior node belongs to the element on its left and
    /// points outside the domain are assigned to the nearest end element.
    #[must_use]
    pub fn locate(&self, z: f64) -> Element {
        let upper = self.nodes.partition_point(|&node| node < z);
        let index = upper.saturating_sub(1).min(self.elements() - 1);
        self.element(index)
    }

    /// Stretches the mesh so the lens moves by `lens_displacement`.
    ///
    /// Each node moves in proportion to its distance from the base, so the base
    /// stays fixed and the lens moves by the full displacement.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Collapsed`] (and leaves the nodes untouched) if
    /// the displacement would put the lens at or below the base, or
    /// [`DomainError::NonFiniteBounds`] if it is not finite.
    pub fn stretch(&mut self, lens_displacement: f64) -> Result<(), DomainError> {
        let base = self.base();
        let height = self.height();

        if !lens_displacement.is_finite() {
            return Err(DomainError::NonFiniteBounds {
                base,
                lens: self.lens() + lens_displacement,
            });
        }
        if height + lens_displacement <= 0.0 {
            return Err(DomainError::Collapsed {
                displacement: lens_displacement,
                height,
            });
        }

        for z in &mut self.nodes {
            *z += lens_displacement * (*z - base) / height;
        }
        Ok(())
    }
}

/// Returns `count` evenly spaced points from `start` to `end` inclusive.
///
/// Both endpoints are reproduced exactly.
#[must_use]
pub fn uniform_points(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = count - 1;
            #[allow(clippy::cast_precision_loss)]
            let span = (end - start) / last as f64;
            (0..count)
                .map(|i| {
                    if i == last {
                        end
                    } else {
                        #[allow(clippy::cast_precision_loss)]
                        let offset = span * i as f64;
                        start + offset
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn interval_is_uniform_with_exact_ends() {
        let domain = Domain::interval(4, 1.0, 3.0).expect("valid domain");

        assert_eq!(domain.elements(), 4);
        assert_eq!(domain.nodes().len(), 5);
        assert_eq!(domain.base(), 1.0);
        assert_eq!(domain.lens(), 3.0);
        assert_relative_eq!(domain.nodes()[2], 2.0);
        assert_relative_eq!(domain.element(1).width(), 0.5);
    }

    #[test]
    fn interval_rejects_bad_input() {
        assert_eq!(Domain::interval(0, 0.0, 1.0), Err(DomainError::NoElements));
        assert!(matches!(
            Domain::interval(3, 1.0, 1.0),
            Err(DomainError::Inverted { .. })
        ));
        assert!(matches!(
            Domain::interval(3, 0.0, f64::NAN),
            Err(DomainError::NonFiniteBounds { .. })
        ));
    }

    #[test]
    fn locate_prefers_left_element_on_nodes() {
        let domain = Domain::interval(4, 0.0, 4.0).expect("valid domain");

        assert_eq!(domain.locate(0.0).index(), 0);
        assert_eq!(domain.locate(0.5).index(), 0);
        assert_eq!(domain.locate(1.0).index(), 0);
        assert_eq!(domain.locate(1.5).index(), 1);
        assert_eq!(domain.locate(4.0).index(), 3);
        assert_eq!(domain.locate(9.0).index(), 3);
        assert_eq!(domain.locate(-1.0).index(), 0);
    }

    #[test]
    fn stretch_moves_lens_and_keeps_base() {
        let mut domain = Domain::interval(4, 1.0, 5.0).expect("valid domain");
        domain.stretch(0.4).expect("should stretch");

        assert_eq!(domain.base(), 1.0);
        assert_relative_eq!(domain.lens(), 5.4);
        assert_relative_eq!(domain.nodes()[2], 3.2);
    }

    #[test]
    fn stretch_rejects_collapse() {
        let mut domain = Domain::interval(2, 0.0, 1.0).expect("valid domain");
        let before = domain.clone();

        let result = domain.stretch(-1.0);

        assert!(matches!(result, Err(DomainError::Collapsed { .. })));
        assert_eq!(domain, before);
    }

    #[test]
    fn iter_elements_covers_domain() {
        let domain = Domain::interval(3, 0.0, 3.0).expect("valid domain");
        let total: f64 = domain.iter_elements().map(|e| e.width()).sum();

        assert_eq!(domain.iter_elements().count(), 3);
        assert_relative_eq!(total, 3.0);
    }
}
