use frost_core::{Domain, DomainError, Field};
use thiserror::Error;

use crate::{ConfigError, TimeGridError};

/// Errors that prevent a simulation from starting.
///
/// Failure to converge is not an error; it is reported by the returned
/// [`Series`](crate::Series) or [`Initialization`](crate::Initialization).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid time grid: {0}")]
    TimeGrid(#[from] TimeGridError),

    #[error("invalid domain: {0}")]
    Domain(#[from] DomainError),

    #[error("regularization eps must be positive and finite, got {0}")]
    Eps(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("initial field has {found} values but the domain has {expected} nodes")]
    FieldLength { expected: usize, found: usize },
}

impl Error {
    /// Checks that `field` has one value per node of `domain`.
    pub(crate) fn check_field(domain: &Domain, field: &Field) -> Result<(), Self> {
        let expected = domain.nodes().len();
        if field.len() == expected {
            Ok(())
        } else {
            Err(Self::FieldLength {
                expected,
                found: field.len(),
            })
        }
    }
}
