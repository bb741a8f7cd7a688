//! Post-processing of phase trajectories: long-run synchronization level,
//! drift frequencies, unit-circle projections and stability checks.

use crate::config::{validate_fraction, SimulationConfig};
use crate::error::{invalid, Result};
use crate::order_parameter::order_parameter;
use crate::trajectory::PhaseTrajectory;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Number of trailing columns covered by `fraction` of `steps`, at least one.
pub fn trailing_window(steps: usize, fraction: f64) -> usize {
    let raw = fraction * steps as f64;
    let rounded = raw.round();
    // 0.7 * 100 evaluates to 70.00000000000001; treat that as 70.
    let window = if (raw - rounded).abs() < 1e-9 {
        rounded
    } else {
        raw.ceil()
    };
    (window as usize).clamp(1, steps.max(1))
}

/// Mean of the trailing `ceil(fraction · len)` entries of `series`.
pub fn long_run_mean(series: &[f64], fraction: f64) -> Result<f64> {
    validate_fraction(fraction)?;
    if series.is_empty() {
        invalid!("series must contain at least one value");
    }
    let window = trailing_window(series.len(), fraction);
    let tail = &series[series.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}

/// Average order parameter magnitude over the trailing `fraction` of the run.
pub fn long_run_order_parameter(trajectory: &PhaseTrajectory, fraction: f64) -> Result<f64> {
    validate_fraction(fraction)?;
    let series = order_parameter(trajectory)?;
    long_run_mean(&series.r, fraction)
}

/// Mean angular velocity `Δθ_i / Δt` of each oscillator over the trailing
/// `fraction` of the run. Frequency-locked oscillators share one value.
pub fn effective_frequencies(trajectory: &PhaseTrajectory, fraction: f64) -> Result<Vec<f64>> {
    validate_fraction(fraction)?;
    let steps = trajectory.steps();
    if steps < 2 {
        invalid!("effective frequencies need at least two time steps");
    }
    let span = trailing_window(steps, fraction).max(2) - 1;
    let start = trajectory.phases_at(steps - 1 - span);
    let end = trajectory.final_phases();
    let elapsed = span as f64 * trajectory.dt();
    Ok(start
        .iter()
        .zip(end)
        .map(|(a, b)| (b - a) / elapsed)
        .collect())
}

/// Oscillator positions on the unit circle and their centroid per time step.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCirclePositions {
    /// `cos θ`, same shape as the trajectory.
    pub x: DMatrix<f64>,
    /// `sin θ`, same shape as the trajectory.
    pub y: DMatrix<f64>,
    pub mean_x: Vec<f64>,
    pub mean_y: Vec<f64>,
}

pub fn unit_circle_positions(trajectory: &PhaseTrajectory) -> UnitCirclePositions {
    let x = trajectory.as_matrix().map(f64::cos);
    let y = trajectory.as_matrix().map(f64::sin);
    let mean_x = x.row_mean().iter().copied().collect();
    let mean_y = y.row_mean().iter().copied().collect();
    UnitCirclePositions {
        x,
        y,
        mean_x,
        mean_y,
    }
}

/// Maps frequencies linearly onto `[0, 1]` by their min and max, for colour
/// coding. A constant population maps to `0.5`.
pub fn normalized_frequencies(frequencies: &[f64]) -> Vec<f64> {
    let (lo, hi) = frequencies
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| {
            (lo.min(w), hi.max(w))
        });
    let range = hi - lo;
    frequencies
        .iter()
        .map(|&w| {
            if range > 0.0 {
                (w - lo) / range
            } else {
                0.5
            }
        })
        .collect()
}

/// Critical coupling `K_c = 2 / (π g(0))` for normally distributed natural
/// frequencies with standard deviation `std_omega`, i.e. `σ·sqrt(8/π)`.
pub fn gaussian_critical_coupling(std_omega: f64) -> Result<f64> {
    if !std_omega.is_finite() || std_omega < 0.0 {
        invalid!(
            "standard_deviation_omega must be finite and non-negative, got {}",
            std_omega
        );
    }
    Ok(std_omega * (8.0 / PI).sqrt())
}

/// Phase increments per step above this risk aliasing on the circle.
const MAX_SAFE_INCREMENT: f64 = PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityAdvisory {
    pub max_phase_increment: f64,
    pub message: String,
}

/// Flags step sizes for which a single Euler update can advance a phase by
/// more than half a turn. Advisory only; integration proceeds regardless.
///
/// The frequency bound uses `|mean| + 4σ`, which covers all but a tiny
/// fraction of normally distributed draws.
pub fn stability_advisory(config: &SimulationConfig) -> Option<StabilityAdvisory> {
    let omega_bound = config.mean_omega.abs() + 4.0 * config.standard_deviation_omega;
    let max_phase_increment = config.dt * (omega_bound + config.coupling.abs());
    if max_phase_increment.is_nan() || max_phase_increment <= MAX_SAFE_INCREMENT {
        return None;
    }
    Some(StabilityAdvisory {
        max_phase_increment,
        message: format!(
            "dt = {} allows phase increments up to {:.3} rad per step; results may alias",
            config.dt, max_phase_increment
        ),
    })
}
