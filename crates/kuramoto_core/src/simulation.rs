//! Fixed-step integration drivers producing [`PhaseTrajectory`] matrices.

use crate::analysis::stability_advisory;
use crate::config::SimulationConfig;
use crate::ensemble::Ensemble;
use crate::error::{invalid, Result};
use crate::model::{DirectKuramoto, MeanFieldKuramoto};
use crate::solvers::Euler;
use crate::traits::{PhaseModel, Steppable};
use crate::trajectory::PhaseTrajectory;
use nalgebra::DMatrix;
use rand::Rng;
use tracing::{debug, warn};

/// Simulates the pairwise model from freshly drawn initial conditions.
///
/// Returns the trajectory and the natural frequencies used.
pub fn simulate_direct<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<(PhaseTrajectory, Vec<f64>)> {
    let ensemble = draw_for(config, rng)?;
    let trajectory = simulate_direct_from(config, &ensemble)?;
    Ok((trajectory, ensemble.frequencies))
}

/// Simulates the mean-field model from freshly drawn initial conditions.
pub fn simulate_mean_field<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<(PhaseTrajectory, Vec<f64>)> {
    let ensemble = draw_for(config, rng)?;
    let trajectory = simulate_mean_field_from(config, &ensemble)?;
    Ok((trajectory, ensemble.frequencies))
}

/// Pairwise model from explicit initial conditions. O(N²) per step.
pub fn simulate_direct_from(
    config: &SimulationConfig,
    ensemble: &Ensemble,
) -> Result<PhaseTrajectory> {
    check_ensemble(config, ensemble)?;
    let system = DirectKuramoto::new(&ensemble.frequencies, config.coupling);
    integrate(&system, config, &ensemble.phases)
}

/// Mean-field model from explicit initial conditions. O(N) per step.
pub fn simulate_mean_field_from(
    config: &SimulationConfig,
    ensemble: &Ensemble,
) -> Result<PhaseTrajectory> {
    check_ensemble(config, ensemble)?;
    let system = MeanFieldKuramoto::new(&ensemble.frequencies, config.coupling);
    integrate(&system, config, &ensemble.phases)
}

fn draw_for<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Ensemble> {
    config.validate()?;
    Ensemble::draw(
        config.oscillators,
        config.mean_omega,
        config.standard_deviation_omega,
        rng,
    )
}

fn check_ensemble(config: &SimulationConfig, ensemble: &Ensemble) -> Result<()> {
    config.validate()?;
    if ensemble.len() != config.oscillators {
        invalid!(
            "ensemble size mismatch. Expected {}, got {}",
            config.oscillators,
            ensemble.len()
        );
    }
    if ensemble.phases.len() != ensemble.frequencies.len() {
        invalid!("ensemble phases and frequencies differ in length");
    }
    Ok(())
}

fn integrate(
    system: &impl PhaseModel,
    config: &SimulationConfig,
    initial_phases: &[f64],
) -> Result<PhaseTrajectory> {
    if let Some(advisory) = stability_advisory(config) {
        warn!(
            max_increment = advisory.max_phase_increment,
            dt = config.dt,
            coupling = config.coupling,
            "{}",
            advisory.message
        );
    }
    debug!(
        model = system.name(),
        oscillators = system.dimension(),
        coupling = system.coupling(),
        steps = config.steps,
        "starting integration"
    );

    let dim = system.dimension();
    let mut phases = DMatrix::zeros(dim, config.steps);
    let mut state = initial_phases.to_vec();
    phases.column_mut(0).copy_from_slice(&state);

    let mut solver = Euler::new(dim);
    let mut t = 0.0;
    for n in 1..config.steps {
        solver.step(system, &mut t, &mut state, config.dt);
        phases.column_mut(n).copy_from_slice(&state);
    }

    let trajectory = PhaseTrajectory::new(phases, config.dt)?;
    trajectory.ensure_finite()?;
    debug!(model = system.name(), t_final = t, "integration finished");
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::seeded_rng;
    use crate::error::KuramotoError;
    use crate::order_parameter::order_parameter;
    use approx::assert_relative_eq;

    fn small_config(coupling: f64) -> SimulationConfig {
        SimulationConfig {
            oscillators: 16,
            coupling,
            steps: 100,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn trajectory_has_requested_shape_and_initial_column() {
        let config = small_config(0.3);
        let ensemble = Ensemble::draw(16, 1.0, 0.1, &mut seeded_rng(11)).expect("ensemble");
        let trajectory = simulate_direct_from(&config, &ensemble).expect("trajectory");
        assert_eq!(trajectory.oscillators(), 16);
        assert_eq!(trajectory.steps(), 100);
        assert_eq!(trajectory.phases_at(0), ensemble.phases.as_slice());
    }

    #[test]
    fn single_step_returns_initial_phases() {
        let config = SimulationConfig {
            steps: 1,
            ..small_config(1.0)
        };
        let (trajectory, frequencies) =
            simulate_mean_field(&config, &mut seeded_rng(2)).expect("trajectory");
        assert_eq!(trajectory.steps(), 1);
        assert_eq!(frequencies.len(), 16);
        let tau = std::f64::consts::TAU;
        assert!(trajectory.final_phases().iter().all(|&p| (0.0..tau).contains(&p)));
    }

    #[test]
    fn first_step_is_explicit_euler_update() {
        let config = SimulationConfig {
            oscillators: 3,
            coupling: 0.9,
            dt: 0.05,
            steps: 2,
            ..SimulationConfig::default()
        };
        let ensemble =
            Ensemble::from_parts(vec![1.0, 1.1, 0.95], vec![0.2, 1.7, 3.0]).expect("ensemble");
        let trajectory = simulate_direct_from(&config, &ensemble).expect("trajectory");
        let x = &ensemble.phases;
        for i in 0..3 {
            let pair: f64 = (0..3).map(|j| (x[j] - x[i]).sin()).sum();
            let expected = x[i] + 0.05 * (ensemble.frequencies[i] + 0.9 / 3.0 * pair);
            assert_relative_eq!(trajectory.phases_at(1)[i], expected, epsilon = 1e-14);
        }
    }

    #[test]
    fn phases_are_not_wrapped() {
        let config = SimulationConfig {
            oscillators: 4,
            coupling: 0.0,
            mean_omega: 10.0,
            standard_deviation_omega: 0.0,
            dt: 0.1,
            steps: 50,
        };
        let (trajectory, _) = simulate_mean_field(&config, &mut seeded_rng(5)).expect("run");
        let start = trajectory.phases_at(0);
        let end = trajectory.final_phases();
        for (a, b) in start.iter().zip(end) {
            assert_relative_eq!(b - a, 49.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_oscillator_stays_synchronized() {
        let config = SimulationConfig {
            oscillators: 1,
            ..small_config(2.0)
        };
        let (trajectory, _) = simulate_direct(&config, &mut seeded_rng(9)).expect("run");
        let series = order_parameter(&trajectory).expect("series");
        assert!(series.r.iter().all(|&r| (r - 1.0).abs() < 1e-12));
    }

    #[test]
    fn direct_and_mean_field_agree_from_identical_initial_conditions() {
        let config = small_config(0.8);
        let ensemble = Ensemble::draw(16, 1.0, 0.1, &mut seeded_rng(42)).expect("ensemble");
        let direct = simulate_direct_from(&config, &ensemble).expect("direct");
        let mean_field = simulate_mean_field_from(&config, &ensemble).expect("mean field");
        let max_diff = (direct.as_matrix() - mean_field.as_matrix()).amax();
        assert!(max_diff < 1e-6, "max abs difference {max_diff}");
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = small_config(0.4);
        let (a, wa) = simulate_mean_field(&config, &mut seeded_rng(1)).expect("a");
        let (b, wb) = simulate_mean_field(&config, &mut seeded_rng(1)).expect("b");
        assert_eq!(a, b);
        assert_eq!(wa, wb);
    }

    #[test]
    fn rejects_invalid_configuration_before_running() {
        let mut rng = seeded_rng(0);
        let bad = SimulationConfig {
            oscillators: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            simulate_direct(&bad, &mut rng),
            Err(KuramotoError::InvalidParameter(_))
        ));
        let bad = SimulationConfig {
            steps: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            simulate_mean_field(&bad, &mut rng),
            Err(KuramotoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_ensemble_size_mismatch() {
        let ensemble = Ensemble::from_parts(vec![1.0; 3], vec![0.0; 3]).expect("ensemble");
        let err = simulate_direct_from(&small_config(0.1), &ensemble).expect_err("mismatch");
        assert!(err.to_string().contains("ensemble size mismatch"));
    }

    #[test]
    fn divergent_run_reports_instability() {
        let config = SimulationConfig {
            oscillators: 2,
            coupling: 0.0,
            mean_omega: 1.0e308,
            standard_deviation_omega: 0.0,
            dt: 10.0,
            steps: 3,
        };
        let err = simulate_mean_field(&config, &mut seeded_rng(0)).expect_err("overflow");
        assert!(matches!(err, KuramotoError::NumericInstability(_)));
    }
}
