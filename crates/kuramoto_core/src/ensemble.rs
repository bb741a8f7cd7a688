//! Natural frequencies and initial phases of an oscillator population.

use crate::config::validate_distribution;
use crate::error::{invalid, KuramotoError, Result};
use rand::Rng;
use rand::SeedableRng;
pub use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Deterministic generator for reproducible runs.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ensemble {
    pub frequencies: Vec<f64>,
    pub phases: Vec<f64>,
}

impl Ensemble {
    /// Draws `oscillators` frequencies from `Normal(mean_omega, std_omega)` and
    /// the same number of phases uniformly from `[0, 2π)`.
    ///
    /// All frequencies are drawn before any phase.
    pub fn draw<R: Rng + ?Sized>(
        oscillators: usize,
        mean_omega: f64,
        std_omega: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if oscillators == 0 {
            invalid!("oscillator count must be at least 1");
        }
        validate_distribution(mean_omega, std_omega)?;

        let normal = Normal::new(mean_omega, std_omega)
            .map_err(|e| KuramotoError::InvalidParameter(format!("frequency distribution: {e}")))?;
        let uniform = Uniform::new(0.0, TAU);

        let frequencies: Vec<f64> = (0..oscillators).map(|_| normal.sample(rng)).collect();
        let phases: Vec<f64> = (0..oscillators).map(|_| uniform.sample(rng)).collect();

        Ok(Self {
            frequencies,
            phases,
        })
    }

    /// Builds an ensemble from caller-chosen initial conditions.
    pub fn from_parts(frequencies: Vec<f64>, phases: Vec<f64>) -> Result<Self> {
        if frequencies.is_empty() {
            invalid!("ensemble must contain at least one oscillator");
        }
        if frequencies.len() != phases.len() {
            invalid!(
                "ensemble length mismatch: {} frequencies, {} phases",
                frequencies.len(),
                phases.len()
            );
        }
        if frequencies.iter().chain(&phases).any(|v| !v.is_finite()) {
            invalid!("ensemble frequencies and phases must be finite");
        }
        Ok(Self {
            frequencies,
            phases,
        })
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}
