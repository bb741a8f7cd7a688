//! Run configuration for single simulations and coupling sweeps.

use crate::error::{invalid, Result};
use serde::{Deserialize, Serialize};

/// Fraction of trailing time columns averaged by the long-run estimator.
pub const DEFAULT_LONG_RUN_FRACTION: f64 = 0.2;

/// Parameters that fully determine a run up to the random initial draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub oscillators: usize,
    pub coupling: f64,
    pub mean_omega: f64,
    pub standard_deviation_omega: f64,
    pub dt: f64,
    pub steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            oscillators: 32,
            coupling: 0.0,
            mean_omega: 1.0,
            standard_deviation_omega: 0.1,
            dt: 0.1,
            steps: 1000,
        }
    }
}

impl SimulationConfig {
    pub fn with_coupling(mut self, coupling: f64) -> Self {
        self.coupling = coupling;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.oscillators == 0 {
            invalid!("oscillator count must be at least 1");
        }
        if self.steps == 0 {
            invalid!("step count must be at least 1");
        }
        if !self.coupling.is_finite() {
            invalid!("coupling must be finite, got {}", self.coupling);
        }
        validate_distribution(self.mean_omega, self.standard_deviation_omega)?;
        validate_dt(self.dt)
    }
}

/// Parameters shared by every run of a bifurcation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub oscillators: usize,
    pub mean_omega: f64,
    pub standard_deviation_omega: f64,
    pub dt: f64,
    pub steps: usize,
    #[serde(default = "default_fraction")]
    pub fraction: f64,
    /// Base seed for the per-run generators. `None` draws one from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_fraction() -> f64 {
    DEFAULT_LONG_RUN_FRACTION
}

impl Default for SweepConfig {
    fn default() -> Self {
        let base = SimulationConfig::default();
        Self {
            oscillators: base.oscillators,
            mean_omega: base.mean_omega,
            standard_deviation_omega: base.standard_deviation_omega,
            dt: base.dt,
            steps: base.steps,
            fraction: DEFAULT_LONG_RUN_FRACTION,
            seed: None,
        }
    }
}

impl SweepConfig {
    /// The single-run configuration for one coupling value.
    pub fn simulation(&self, coupling: f64) -> SimulationConfig {
        SimulationConfig {
            oscillators: self.oscillators,
            coupling,
            mean_omega: self.mean_omega,
            standard_deviation_omega: self.standard_deviation_omega,
            dt: self.dt,
            steps: self.steps,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.oscillators == 0 {
            invalid!("oscillator count must be at least 1");
        }
        if self.steps == 0 {
            invalid!("step count must be at least 1");
        }
        validate_distribution(self.mean_omega, self.standard_deviation_omega)?;
        validate_dt(self.dt)?;
        validate_fraction(self.fraction)
    }
}

pub(crate) fn validate_distribution(mean: f64, std_dev: f64) -> Result<()> {
    if !mean.is_finite() {
        invalid!("mean_omega must be finite, got {}", mean);
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        invalid!(
            "standard_deviation_omega must be finite and non-negative, got {}",
            std_dev
        );
    }
    Ok(())
}

fn validate_dt(dt: f64) -> Result<()> {
    if !dt.is_finite() || dt <= 0.0 {
        invalid!("dt must be positive and finite, got {}", dt);
    }
    Ok(())
}

pub(crate) fn validate_fraction(fraction: f64) -> Result<()> {
    // NaN fails both comparisons, so test the accepted range directly.
    if !(fraction > 0.0 && fraction <= 1.0) {
        invalid!("fraction must lie in (0, 1], got {}", fraction);
    }
    Ok(())
}
