//! Batch simulations returning full trajectories for playback.

use anyhow::{bail, Context};
use kuramoto_core::analysis::{normalized_frequencies, unit_circle_positions};
use kuramoto_core::config::SimulationConfig;
use kuramoto_core::ensemble::{seeded_rng, ChaCha8Rng};
use kuramoto_core::order_parameter::order_parameter;
use kuramoto_core::simulation::{simulate_direct, simulate_mean_field};
use kuramoto_core::trajectory::PhaseTrajectory;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Everything a renderer needs to animate a run.
#[derive(Debug, Serialize)]
pub(crate) struct TrajectoryPayload {
    pub(crate) oscillators: usize,
    pub(crate) steps: usize,
    pub(crate) dt: f64,
    /// Row-major: oscillator `i` occupies `phases[i * steps..(i + 1) * steps]`.
    pub(crate) phases: Vec<f64>,
    pub(crate) frequencies: Vec<f64>,
    pub(crate) frequency_weights: Vec<f64>,
    pub(crate) r: Vec<f64>,
    pub(crate) psi: Vec<f64>,
    pub(crate) mean_x: Vec<f64>,
    pub(crate) mean_y: Vec<f64>,
}

pub(crate) fn build_payload(
    trajectory: &PhaseTrajectory,
    frequencies: Vec<f64>,
) -> anyhow::Result<TrajectoryPayload> {
    let series = order_parameter(trajectory).context("Order parameter computation failed")?;
    let positions = unit_circle_positions(trajectory);
    Ok(TrajectoryPayload {
        oscillators: trajectory.oscillators(),
        steps: trajectory.steps(),
        dt: trajectory.dt(),
        phases: trajectory.to_row_major(),
        frequency_weights: normalized_frequencies(&frequencies),
        frequencies,
        r: series.r,
        psi: series.psi,
        mean_x: positions.mean_x,
        mean_y: positions.mean_y,
    })
}

/// Rebuilds a trajectory from the row-major layout used in payloads.
pub(crate) fn trajectory_from_row_major(
    phases: &[f64],
    oscillators: usize,
    dt: f64,
) -> anyhow::Result<PhaseTrajectory> {
    if oscillators == 0 {
        bail!("Oscillator count must be positive.");
    }
    if phases.is_empty() || phases.len() % oscillators != 0 {
        bail!(
            "Phase buffer of length {} does not divide into {} oscillators.",
            phases.len(),
            oscillators
        );
    }
    let steps = phases.len() / oscillators;
    let columns: Vec<Vec<f64>> = (0..steps)
        .map(|n| (0..oscillators).map(|i| phases[i * steps + n]).collect())
        .collect();
    PhaseTrajectory::from_columns(&columns, dt).context("Invalid trajectory")
}

/// Runs full simulations for a fixed configuration. Each call draws a new
/// population; the `n`-th run of a given seed is reproducible.
#[wasm_bindgen]
pub struct WasmSimulation {
    config: SimulationConfig,
    seed: u64,
    runs: u64,
}

#[wasm_bindgen]
impl WasmSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(config_val: JsValue, seed: u32) -> Result<WasmSimulation, JsValue> {
        console_error_panic_hook::set_once();

        let config: SimulationConfig = from_value(config_val)
            .map_err(|e| JsValue::from_str(&format!("Invalid simulation config: {}", e)))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&format!("Invalid simulation config: {}", e)))?;

        Ok(WasmSimulation {
            config,
            seed: seed as u64,
            runs: 0,
        })
    }

    pub fn set_coupling(&mut self, coupling: f64) {
        self.config.coupling = coupling;
    }

    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        to_value(&self.config).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn simulate_direct(&mut self) -> Result<JsValue, JsValue> {
        let mut rng = self.next_rng();
        let (trajectory, frequencies) = simulate_direct(&self.config, &mut rng)
            .map_err(|e| JsValue::from_str(&format!("Simulation failed: {}", e)))?;
        Self::respond(&trajectory, frequencies)
    }

    pub fn simulate_mean_field(&mut self) -> Result<JsValue, JsValue> {
        let mut rng = self.next_rng();
        let (trajectory, frequencies) = simulate_mean_field(&self.config, &mut rng)
            .map_err(|e| JsValue::from_str(&format!("Simulation failed: {}", e)))?;
        Self::respond(&trajectory, frequencies)
    }
}

impl WasmSimulation {
    fn next_rng(&mut self) -> ChaCha8Rng {
        let mut rng = seeded_rng(self.seed);
        rng.set_stream(self.runs);
        self.runs += 1;
        rng
    }

    fn respond(trajectory: &PhaseTrajectory, frequencies: Vec<f64>) -> Result<JsValue, JsValue> {
        let payload = build_payload(trajectory, frequencies)
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
        to_value(&payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
