/// A square tridiagonal matrix.
///
/// `lower[i]` holds entry `(i, i - 1)` and `upper[i]` holds `(i, i + 1)`;
/// `lower[0]` and `upper[n - 1]` are unused.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Tridiagonal {
    lower: Vec<f64>,
    diag: Vec<f64>,
    upper: Vec<f64>,
}

impl Tridiagonal {
    pub(super) fn zeros(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Sets entry `(row, col)`; entries outside the band are ignored.
    pub(super) fn set(&mut self, row: usize, col: usize, value: f64) {
        if row == col {
            self.diag[row] = value;
        } else if col + 1 == row {
            self.lower[row] = value;
        } else if row + 1 == col {
            self.upper[row] = value;
        }
    }

    /// Solves `A x = rhs` with the Thomas algorithm.
    ///
    /// Returns `None` if a pivot vanishes or the result is not finite.
    pub(super) fn solve(&self, rhs: &[f64]) -> Option<Vec<f64>> {
        let n = self.diag.len();
        if n == 0 {
            return Some(Vec::new());
        }

        let mut b = self.diag.clone();
        let mut d = rhs.to_vec();

        // Forward sweep
        for i in 1..n {
            if !is_pivot(b[i - 1]) {
                return None;
            }
            let w = self.lower[i] / b[i - 1];
            b[i] -= w * self.upper[i - 1];
            d[i] -= w * d[i - 1];
        }

        // Back substitution
        if !is_pivot(b[n - 1]) {
            return None;
        }
        d[n - 1] /= b[n - 1];
        for i in (0..n - 1).rev() {
            d[i] = (d[i] - self.upper[i] * d[i + 1]) / b[i];
        }

        d.iter().all(|x| x.is_finite()).then_some(d)
    }
}

fn is_pivot(value: f64) -> bool {
    value.is_finite() && value.abs() > 1e-300
}
