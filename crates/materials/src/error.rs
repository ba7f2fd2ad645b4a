use ninterp::error::ValidateError;
use thiserror::Error;

/// Errors that can occur when building a material.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("reference porosity must lie in (0, 1), got {0}")]
    Porosity(f64),

    #[error("compaction scale must be positive and finite, got {0}")]
    CompactionScale(f64),

    #[error("premelting exponent must be positive and finite, got {0}")]
    PremeltingExponent(f64),

    #[error("permeability exponent must be non-negative and finite, got {0}")]
    PermeabilityExponent(f64),

    #[error("temperature gradient and reference must be finite")]
    NonFiniteProfile,

    #[error("temperature table needs matching depths and values with at least two entries")]
    TableShape,

    #[error("invalid temperature table")]
    Table(#[from] ValidateError),
}
