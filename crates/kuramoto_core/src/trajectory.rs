use crate::error::{invalid, KuramotoError, Result};
use nalgebra::DMatrix;

/// Phases of N oscillators over T time steps.
///
/// Row `i`, column `n` holds θ_i(n·dt). Storage is column-major, so each time
/// column is contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTrajectory {
    phases: DMatrix<f64>,
    dt: f64,
}

impl PhaseTrajectory {
    pub fn new(phases: DMatrix<f64>, dt: f64) -> Result<Self> {
        if phases.nrows() == 0 {
            invalid!("trajectory must contain at least one oscillator");
        }
        if phases.ncols() == 0 {
            invalid!("trajectory must contain at least one time step");
        }
        if !dt.is_finite() || dt <= 0.0 {
            invalid!("dt must be positive and finite, got {}", dt);
        }
        Ok(Self { phases, dt })
    }

    /// Builds a trajectory from time columns, each holding one phase per oscillator.
    pub fn from_columns(columns: &[Vec<f64>], dt: f64) -> Result<Self> {
        let oscillators = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|c| c.len() != oscillators) {
            invalid!("all trajectory columns must have the same length");
        }
        let data: Vec<f64> = columns.iter().flatten().copied().collect();
        Self::new(
            DMatrix::from_column_slice(oscillators, columns.len(), &data),
            dt,
        )
    }

    pub fn oscillators(&self) -> usize {
        self.phases.nrows()
    }

    pub fn steps(&self) -> usize {
        self.phases.ncols()
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Phases at step `n` as a contiguous slice.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.steps()`.
    pub fn phases_at(&self, n: usize) -> &[f64] {
        let rows = self.oscillators();
        &self.phases.as_slice()[n * rows..(n + 1) * rows]
    }

    /// Phases at the final step.
    pub fn final_phases(&self) -> &[f64] {
        self.phases_at(self.steps() - 1)
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.phases
    }

    /// Flattens the matrix in row-major order (oscillator by oscillator).
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.phases.len());
        for row in self.phases.row_iter() {
            out.extend(row.iter().copied());
        }
        out
    }

    pub(crate) fn ensure_finite(&self) -> Result<()> {
        if let Some(pos) = self.phases.iter().position(|v| !v.is_finite()) {
            let rows = self.oscillators();
            return Err(KuramotoError::NumericInstability(format!(
                "phase of oscillator {} became non-finite at step {}",
                pos % rows,
                pos / rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_and_rows_index_as_expected() {
        let trajectory =
            PhaseTrajectory::from_columns(&[vec![0.0, 1.0, 2.0], vec![0.5, 1.5, 2.5]], 0.1)
                .expect("trajectory");
        assert_eq!(trajectory.oscillators(), 3);
        assert_eq!(trajectory.steps(), 2);
        assert_eq!(trajectory.phases_at(1), &[0.5, 1.5, 2.5]);
        assert_eq!(trajectory.final_phases(), &[0.5, 1.5, 2.5]);
        assert_eq!(trajectory.as_matrix()[(1, 1)], 1.5);
        assert_eq!(trajectory.to_row_major(), vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);
    }

    #[test]
    #[should_panic]
    fn phases_past_the_last_step_panic() {
        let trajectory =
            PhaseTrajectory::from_columns(&[vec![0.0, 1.0], vec![0.5, 1.5]], 0.1)
                .expect("trajectory");
        let _ = trajectory.phases_at(2);
    }

    #[test]
    fn rejects_empty_shapes() {
        assert!(PhaseTrajectory::from_columns(&[], 0.1).is_err());
        assert!(PhaseTrajectory::from_columns(&[vec![]], 0.1).is_err());
        assert!(PhaseTrajectory::from_columns(&[vec![1.0], vec![1.0, 2.0]], 0.1).is_err());
        assert!(PhaseTrajectory::from_columns(&[vec![1.0]], 0.0).is_err());
    }

    #[test]
    fn ensure_finite_reports_location() {
        let trajectory =
            PhaseTrajectory::from_columns(&[vec![0.0, 1.0], vec![f64::NAN, 1.0]], 0.1)
                .expect("trajectory");
        match trajectory.ensure_finite() {
            Err(KuramotoError::NumericInstability(message)) => {
                assert!(message.contains("oscillator 0"));
                assert!(message.contains("step 1"));
            }
            other => panic!("expected instability, got {other:?}"),
        }
    }
}
