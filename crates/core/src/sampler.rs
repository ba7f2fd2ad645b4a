use crate::{Domain, Field, FieldPoint};

/// Values of a field (or an expression of it) at ordered positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub positions: Vec<f64>,
    pub values: Vec<f64>,
}

impl Samples {
    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the index and value of the smallest sample.
    ///
    /// The first occurrence wins on ties. NaN samples are skipped; `None` is
    /// returned if no sample is comparable.
    #[must_use]
    pub fn min(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((i, v)),
            })
    }

    /// Returns the sample at the upper end.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Maps fields onto a fixed set of sample positions.
///
/// Samplers return `domain.elements() + 1` samples ordered from base to lens,
/// with the first and last sample exactly on the domain ends.
pub trait Sampler {
    /// Samples a pointwise expression of `field`.
    fn sample_with<F>(&self, domain: &Domain, field: &Field, expr: F) -> Samples
    where
        F: Fn(&FieldPoint) -> f64;

    /// Samples the field itself.
    fn sample(&self, domain: &Domain, field: &Field) -> Samples {
        self.sample_with(domain, field, |point| point.value)
    }
}

impl<S: Sampler + ?Sized> Sampler for &S {
    fn sample_with<F>(&self, domain: &Domain, field: &Field, expr: F) -> Samples
    where
        F: Fn(&FieldPoint) -> f64,
    {
        (**self).sample_with(domain, field, expr)
    }

    fn sample(&self, domain: &Domain, field: &Field) -> Samples {
        (**self).sample(domain, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: Vec<f64>) -> Samples {
        Samples {
            positions: (0..values.len()).map(|i| i as f64).collect(),
            values,
        }
    }

    #[test]
    fn min_picks_first_smallest() {
        let s = samples(vec![2.0, 0.5, 1.0, 0.5]);
        assert_eq!(s.min(), Some((1, 0.5)));
        assert_eq!(s.last(), Some(0.5));
    }

    #[test]
    fn min_skips_nan() {
        let s = samples(vec![f64::NAN, 3.0, 1.0]);
        assert_eq!(s.min(), Some((2, 1.0)));

        let empty = samples(vec![]);
        assert_eq!(empty.min(), None);
        assert!(empty.is_empty());
    }
}
