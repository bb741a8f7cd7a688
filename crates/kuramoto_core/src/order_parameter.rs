//! Kuramoto order parameter `r·e^{iψ} = (1/N) Σ_j e^{iθ_j}`.

use crate::error::{invalid, Result};
use crate::trajectory::PhaseTrajectory;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Order parameter magnitude and mean phase for every time column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParameterSeries {
    pub r: Vec<f64>,
    pub psi: Vec<f64>,
}

impl OrderParameterSeries {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// Average of the unit phasors `e^{iθ_j}`.
pub(crate) fn mean_phasor(phases: &[f64]) -> Complex<f64> {
    let sum: Complex<f64> = phases.iter().map(|&theta| Complex::from_polar(1.0, theta)).sum();
    sum / phases.len() as f64
}

/// Splits a mean phasor into `(r, ψ)` with `r ∈ [0, 1]` and `ψ ∈ (−π, π]`.
pub(crate) fn polar_parts(z: Complex<f64>) -> (f64, f64) {
    let r = z.norm().min(1.0);
    let psi = z.im.atan2(z.re);
    (r, if psi <= -PI { PI } else { psi })
}

/// Order parameter of a single set of phases.
pub fn order_parameter_of(phases: &[f64]) -> Result<(f64, f64)> {
    if phases.is_empty() {
        invalid!("order parameter requires at least one oscillator");
    }
    Ok(polar_parts(mean_phasor(phases)))
}

/// Order parameter for every column of a trajectory.
pub fn order_parameter(trajectory: &PhaseTrajectory) -> Result<OrderParameterSeries> {
    if trajectory.oscillators() == 0 {
        invalid!("order parameter requires at least one oscillator");
    }

    let (r, psi): (Vec<f64>, Vec<f64>) = (0..trajectory.steps())
        .map(|n| polar_parts(mean_phasor(trajectory.phases_at(n))))
        .unzip();

    Ok(OrderParameterSeries { r, psi })
}
