use std::fmt;

use frost_core::Samples;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Indicates how a time-stepping run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every entry of the time grid was stepped.
    Complete,

    /// The run stopped at `step`, whose row is not a valid solution.
    Diverged { step: usize, cause: Divergence },

    /// An observer stopped the run after `step`.
    StoppedByObserver { step: usize },
}

/// What ended a diverged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divergence {
    /// The step solve did not converge or produced no finite stress.
    Solve,
    /// A lens nucleated where no domain can be built below it.
    Nucleation,
    /// The continuation on a rebuilt domain did not converge.
    Initialization,
    /// Mesh advection would have collapsed the domain.
    Advection,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Solve => "step solve did not converge",
            Self::Nucleation => "lens nucleated at the base",
            Self::Initialization => "continuation on the new domain did not converge",
            Self::Advection => "mesh advection collapsed the domain",
        })
    }
}

/// Time series of a run, one row per entry of the time grid.
///
/// Rows past [`Series::steps`] were never solved. After a divergence they are
/// zero, except for the stress which is raised to the configured floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Sampled effective stress.
    pub stress: Array2<f64>,
    /// Sample positions.
    pub position: Array2<f64>,
    /// Sampled heave rate, zero on nucleation rows.
    pub heave: Array2<f64>,
    /// One where a lens nucleated.
    pub new_lens: Array1<u8>,
    pub converged: bool,
    pub status: Status,
    /// Number of valid rows.
    pub steps: usize,
}

impl Series {
    pub(crate) fn zeros(rows: usize, samples: usize) -> Self {
        Self {
            stress: Array2::zeros((rows, samples)),
            position: Array2::zeros((rows, samples)),
            heave: Array2::zeros((rows, samples)),
            new_lens: Array1::zeros(rows),
            converged: true,
            status: Status::Complete,
            steps: 0,
        }
    }

    /// Returns the lens position at every step.
    #[must_use]
    pub fn lens_positions(&self) -> ArrayView1<'_, f64> {
        self.position
            .index_axis(Axis(1), self.position.ncols().saturating_sub(1))
    }

    /// Returns the number of lenses that nucleated.
    #[must_use]
    pub fn lens_count(&self) -> usize {
        self.new_lens.iter().map(|&flag| usize::from(flag)).sum()
    }

    pub(crate) fn record(&mut self, step: usize, samples: &Samples) {
        copy_row(&mut self.stress, step, &samples.values);
        copy_row(&mut self.position, step, &samples.positions);
    }

    pub(crate) fn record_heave(&mut self, step: usize, samples: &Samples) {
        copy_row(&mut self.heave, step, &samples.values);
    }

    /// Replaces NaN by zero and infinities by the largest finite values.
    pub(crate) fn sanitize(&mut self) {
        self.stress.mapv_inplace(finite_or_zero);
        self.heave.mapv_inplace(finite_or_zero);
    }

    pub(crate) fn clamp_stress(&mut self, floor: f64) {
        self.stress.mapv_inplace(|n| n.max(floor));
    }
}

fn copy_row(array: &mut Array2<f64>, row: usize, values: &[f64]) {
    for (slot, value) in array.row_mut(row).iter_mut().zip(values) {
        *slot = *value;
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(f64::MIN, f64::MAX)
    }
}
