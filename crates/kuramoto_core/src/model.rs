//! Kuramoto vector fields.
//!
//! Both models describe `dθ_i/dt = ω_i + (K/N) Σ_j sin(θ_j − θ_i)`.
//! [`DirectKuramoto`] evaluates the pairwise sum as a dense N×N matrix;
//! [`MeanFieldKuramoto`] uses the identity
//! `(1/N) Σ_j sin(θ_j − θ_i) = r·sin(ψ − θ_i)`, which costs O(N).

use crate::order_parameter::{mean_phasor, polar_parts};
use crate::traits::{DynamicalSystem, PhaseModel};
use nalgebra::{DMatrix, DVector};

/// All-to-all coupling evaluated pair by pair.
#[derive(Debug, Clone)]
pub struct DirectKuramoto {
    frequencies: DVector<f64>,
    coupling: f64,
}

impl DirectKuramoto {
    pub fn new(frequencies: &[f64], coupling: f64) -> Self {
        Self {
            frequencies: DVector::from_column_slice(frequencies),
            coupling,
        }
    }

    /// `Σ_j sin(θ_j − θ_i)` for every `i`.
    fn interaction(x: &[f64]) -> DVector<f64> {
        let n = x.len();
        // D_ij = θ_j − θ_i, then sum each row of sin(D).
        let differences = DMatrix::from_fn(n, n, |i, j| x[j] - x[i]);
        differences.map(f64::sin).column_sum()
    }
}

impl DynamicalSystem<f64> for DirectKuramoto {
    fn dimension(&self) -> usize {
        self.frequencies.len()
    }

    fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        let scale = self.coupling / x.len() as f64;
        let rates = &self.frequencies + Self::interaction(x) * scale;
        out.copy_from_slice(rates.as_slice());
    }
}

impl PhaseModel for DirectKuramoto {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn frequencies(&self) -> &[f64] {
        self.frequencies.as_slice()
    }

    fn coupling(&self) -> f64 {
        self.coupling
    }
}

/// All-to-all coupling through the order parameter.
#[derive(Debug, Clone)]
pub struct MeanFieldKuramoto {
    frequencies: Vec<f64>,
    coupling: f64,
}

impl MeanFieldKuramoto {
    pub fn new(frequencies: &[f64], coupling: f64) -> Self {
        Self {
            frequencies: frequencies.to_vec(),
            coupling,
        }
    }
}

impl DynamicalSystem<f64> for MeanFieldKuramoto {
    fn dimension(&self) -> usize {
        self.frequencies.len()
    }

    fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        let (r, psi) = polar_parts(mean_phasor(x));
        let strength = self.coupling * r;
        for ((o, &omega), &theta) in out.iter_mut().zip(&self.frequencies).zip(x) {
            *o = omega + strength * (psi - theta).sin();
        }
    }
}

impl PhaseModel for MeanFieldKuramoto {
    fn name(&self) -> &'static str {
        "mean_field"
    }

    fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    fn coupling(&self) -> f64 {
        self.coupling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rates(system: &impl DynamicalSystem<f64>, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; x.len()];
        system.apply(0.0, x, &mut out);
        out
    }

    #[test]
    fn direct_matches_pairwise_sum() {
        let omega = [1.0, 0.9, 1.2, 1.05];
        let x = [0.1, 2.0, -1.3, 4.4];
        let k = 0.7;
        let system = DirectKuramoto::new(&omega, k);
        let got = rates(&system, &x);
        for i in 0..4 {
            let pair: f64 = (0..4).map(|j| (x[j] - x[i]).sin()).sum();
            assert_relative_eq!(got[i], omega[i] + k / 4.0 * pair, epsilon = 1e-14);
        }
    }

    #[test]
    fn mean_field_matches_direct_rates() {
        let omega = [1.0, 0.9, 1.2, 1.05, 0.8];
        let x = [0.1, 2.0, -1.3, 4.4, 7.9];
        let direct = rates(&DirectKuramoto::new(&omega, 0.5), &x);
        let mean_field = rates(&MeanFieldKuramoto::new(&omega, 0.5), &x);
        for (a, b) in direct.iter().zip(&mean_field) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_coupling_reduces_to_natural_frequencies() {
        let omega = [1.0, -2.0, 0.5];
        let x = [0.3, 1.1, 2.9];
        assert_eq!(rates(&DirectKuramoto::new(&omega, 0.0), &x), omega.to_vec());
        assert_eq!(rates(&MeanFieldKuramoto::new(&omega, 0.0), &x), omega.to_vec());
    }

    #[test]
    fn models_report_population_and_parameters() {
        let direct = DirectKuramoto::new(&[1.0, 2.0, 3.0], 0.4);
        assert_eq!(direct.dimension(), 3);
        assert_eq!(direct.frequencies(), &[1.0, 2.0, 3.0]);
        assert_eq!(direct.coupling(), 0.4);
        assert_eq!(direct.name(), "direct");

        let mean_field = MeanFieldKuramoto::new(&[1.0; 7], 1.5);
        assert_eq!(mean_field.dimension(), 7);
        assert_eq!(mean_field.coupling(), 1.5);
        assert_eq!(mean_field.name(), "mean_field");
    }
}
