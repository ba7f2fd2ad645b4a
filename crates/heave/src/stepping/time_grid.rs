use thiserror::Error;

/// Relative tolerance on the spacing of a uniform time grid.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Errors that can occur when validating a time grid.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimeGridError {
    #[error("a time grid needs at least two entries, got {0}")]
    TooShort(usize),

    #[error("time entry {index} is not finite")]
    NonFinite { index: usize },

    #[error("time entry {index} does not increase")]
    NotIncreasing { index: usize },

    #[error("spacing {spacing} before entry {index} differs from dt = {dt}")]
    NonUniform { index: usize, spacing: f64, dt: f64 },
}

/// Returns the step of a strictly increasing, uniformly spaced time grid.
///
/// The first two entries define the step; every later spacing must match it
/// to a relative tolerance of `1e-6`.
pub(crate) fn time_step(times: &[f64]) -> Result<f64, TimeGridError> {
    if times.len() < 2 {
        return Err(TimeGridError::TooShort(times.len()));
    }
    if let Some(index) = times.iter().position(|t| !t.is_finite()) {
        return Err(TimeGridError::NonFinite { index });
    }

    let dt = times[1] - times[0];
    for (i, pair) in times.windows(2).enumerate() {
        let index = i + 1;
        let spacing = pair[1] - pair[0];
        if spacing <= 0.0 {
            return Err(TimeGridError::NotIncreasing { index });
        }
        if (spacing - dt).abs() > SPACING_TOLERANCE * dt {
            return Err(TimeGridError::NonUniform { index, spacing, dt });
        }
    }

    Ok(dt)
}
